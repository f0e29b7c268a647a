//! Collaborative-filtering recommender over like/dislike review data.
//!
//! A pure per-request pipeline: interaction sets → peer neighborhood →
//! similarity coefficients → unreviewed candidates → aggregated scores →
//! ranked page. Nothing is cached across requests; every stage rereads
//! the store, so a concurrent write simply lands in the next request.

pub mod interactions;
pub mod similarity;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    db::ReviewStore,
    error::AppResult,
    models::{Recommendation, ResourceId, UserId},
};

use interactions::{InteractionReader, InteractionSets};

/// Recommendations are served in fixed-size pages
pub const PAGE_SIZE: usize = 20;

/// Per-user recommendation pipeline over an injected review store
pub struct RecommenderService {
    store: Arc<dyn ReviewStore>,
}

impl RecommenderService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    /// Runs the full pipeline for one user and returns one page of
    /// recommendations, best first. `page` is 1-indexed; values past the
    /// end yield an empty page.
    pub async fn recommendations_for(
        &self,
        user_id: UserId,
        page: usize,
    ) -> AppResult<Vec<Recommendation>> {
        let reader = InteractionReader::new(self.store.as_ref());
        let target = reader.user_likes_dislikes(user_id).await?;

        let peers = self.similar_peers(&target, user_id).await?;
        let similarities =
            similarity::similarities_with_peers(self.store.as_ref(), &peers, &target).await?;

        let candidates = self.unreviewed_resources(&target).await?;
        let scores = self
            .recommendation_probabilities(&candidates, &similarities)
            .await;

        tracing::debug!(
            user_id,
            peer_count = peers.len(),
            candidate_count = candidates.len(),
            scored_count = scores.len(),
            "Recommendation pipeline complete"
        );

        Ok(self.ranked_page(scores, page, PAGE_SIZE).await)
    }

    /// Users who reviewed at least one resource the target has rated
    ///
    /// Deduplicated, and never contains the target itself. Users with zero
    /// overlap are never considered, which bounds the similarity batch to
    /// a relevant neighborhood instead of the whole user base.
    async fn similar_peers(
        &self,
        target: &InteractionSets,
        exclude: UserId,
    ) -> AppResult<HashSet<UserId>> {
        let reader = InteractionReader::new(self.store.as_ref());

        let mut peers = HashSet::new();
        for &resource_id in target.liked.iter().chain(target.disliked.iter()) {
            peers.extend(reader.reviewers_of(resource_id).await?);
        }
        peers.remove(&exclude);

        Ok(peers)
    }

    /// Catalog minus everything the user has already reviewed
    ///
    /// A user is never recommended a resource they have rated, liked or
    /// disliked alike.
    async fn unreviewed_resources(
        &self,
        target: &InteractionSets,
    ) -> AppResult<HashSet<ResourceId>> {
        let reviewed = target.reviewed();
        let all_ids = self.store.list_resource_ids().await?;

        Ok(all_ids
            .into_iter()
            .filter(|id| !reviewed.contains(id))
            .collect())
    }

    /// Aggregates peer similarity into one score per candidate resource
    ///
    /// For each candidate: sum the similarity of scored peers who liked it
    /// (ZL over ML users) and who disliked it (ZD over MD users), then
    /// score (ZL − ZD) / (ML + MD). A candidate no scored peer has
    /// reviewed is dropped, not scored zero. A reviewer-lookup failure
    /// skips that one candidate with a warning; the structural reads
    /// elsewhere in the pipeline stay fail-fast.
    async fn recommendation_probabilities(
        &self,
        candidates: &HashSet<ResourceId>,
        similarities: &HashMap<UserId, f64>,
    ) -> HashMap<ResourceId, f64> {
        let reader = InteractionReader::new(self.store.as_ref());
        let mut probabilities = HashMap::new();

        for &resource_id in candidates {
            let (likers, dislikers) = match reader.likers_dislikers_of(resource_id).await {
                Ok(split) => split,
                Err(error) => {
                    tracing::warn!(resource_id, %error, "Skipping candidate: reviewer lookup failed");
                    continue;
                }
            };

            let mut liked_sum = 0.0;
            let mut liked_count = 0usize;
            for liker in &likers {
                if let Some(similarity) = similarities.get(liker) {
                    liked_sum += similarity;
                    liked_count += 1;
                }
            }

            let mut disliked_sum = 0.0;
            let mut disliked_count = 0usize;
            for disliker in &dislikers {
                if let Some(similarity) = similarities.get(disliker) {
                    disliked_sum += similarity;
                    disliked_count += 1;
                }
            }

            if liked_count + disliked_count == 0 {
                continue;
            }

            let probability =
                (liked_sum - disliked_sum) / (liked_count + disliked_count) as f64;
            probabilities.insert(resource_id, probability);
        }

        probabilities
    }

    /// Pairs every scored candidate with its resource record, orders by
    /// score descending with ascending resource id as the tie-break, and
    /// slices out the requested 1-indexed page
    ///
    /// A resource whose record cannot be fetched is skipped with a
    /// warning. A page past the end is an empty list, not an error.
    async fn ranked_page(
        &self,
        scores: HashMap<ResourceId, f64>,
        page: usize,
        per_page: usize,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::with_capacity(scores.len());
        for (resource_id, probability) in scores {
            match self.store.get_resource(resource_id).await {
                Ok(resource) => recommendations.push(Recommendation {
                    resource,
                    probability,
                }),
                Err(error) => {
                    tracing::warn!(resource_id, %error, "Skipping recommendation: resource fetch failed");
                }
            }
        }

        recommendations.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.resource.id.cmp(&b.resource.id))
        });

        let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
        if start >= recommendations.len() {
            return Vec::new();
        }
        let end = (start + per_page).min(recommendations.len());
        recommendations[start..end].to_vec()
    }
}
