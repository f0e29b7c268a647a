use std::collections::HashSet;

use crate::{
    db::ReviewStore,
    error::AppResult,
    models::{ResourceId, UserId},
};

/// Minimum star rating for a review to count as a like
pub const LIKE_THRESHOLD: i16 = 4;

/// A user's review history split into liked and disliked resource sets
///
/// Derived fresh from review rows on every request: a review rated at or
/// above [`LIKE_THRESHOLD`] lands in `liked`, anything lower in `disliked`.
/// Set containers make deduplication structural rather than something
/// each call site has to remember.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionSets {
    pub liked: HashSet<ResourceId>,
    pub disliked: HashSet<ResourceId>,
}

impl InteractionSets {
    /// Every resource the user has reviewed, liked or not
    pub fn reviewed(&self) -> HashSet<ResourceId> {
        self.liked.union(&self.disliked).copied().collect()
    }
}

/// Extracts like/dislike interaction sets out of raw review rows
pub struct InteractionReader<'a> {
    store: &'a dyn ReviewStore,
}

impl<'a> InteractionReader<'a> {
    pub fn new(store: &'a dyn ReviewStore) -> Self {
        Self { store }
    }

    /// Splits a user's reviews into liked and disliked resource ids
    ///
    /// A user with no reviews yields two empty sets, not an error.
    /// Storage failures propagate unmodified.
    pub async fn user_likes_dislikes(&self, user_id: UserId) -> AppResult<InteractionSets> {
        let reviews = self.store.find_reviews_by_user(user_id).await?;

        let mut sets = InteractionSets::default();
        for review in reviews {
            if review.rating >= LIKE_THRESHOLD {
                sets.liked.insert(review.resource_id);
            } else {
                sets.disliked.insert(review.resource_id);
            }
        }

        Ok(sets)
    }

    /// Everyone who has reviewed `resource_id`, regardless of rating
    pub async fn reviewers_of(&self, resource_id: ResourceId) -> AppResult<HashSet<UserId>> {
        let reviews = self.store.find_reviews_by_resource(resource_id).await?;
        Ok(reviews.into_iter().map(|r| r.user_id).collect())
    }

    /// Reviewers of `resource_id` partitioned into likers and dislikers
    pub async fn likers_dislikers_of(
        &self,
        resource_id: ResourceId,
    ) -> AppResult<(HashSet<UserId>, HashSet<UserId>)> {
        let likers = self
            .store
            .find_reviews_by_resource_min_rating(resource_id, LIKE_THRESHOLD)
            .await?
            .into_iter()
            .map(|r| r.user_id)
            .collect();

        let dislikers = self
            .store
            .find_reviews_by_resource_below_rating(resource_id, LIKE_THRESHOLD)
            .await?
            .into_iter()
            .map(|r| r.user_id)
            .collect();

        Ok((likers, dislikers))
    }
}
