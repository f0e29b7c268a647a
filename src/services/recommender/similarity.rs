use std::collections::{HashMap, HashSet};

use crate::{db::ReviewStore, error::AppResult, models::UserId};

use super::interactions::{InteractionReader, InteractionSets};

/// Coefficients are reported at three decimal places
const PRECISION: f64 = 1000.0;

/// Modified Jaccard similarity between two users' interaction sets
///
/// S(U1, U2) = (|L1∩L2| + |D1∩D2| − |L1∩D2| − |L2∩D1|) / |L1∪L2∪D1∪D2|
///
/// Shared likes and shared dislikes push the coefficient up; a resource
/// one user liked and the other disliked pushes it down. Each resource in
/// the union contributes (a−c)(b−d) ∈ {−1, 0, 1} to the numerator (where
/// a, c mark membership in the first user's liked/disliked sets and b, d
/// the second's), so the quotient stays within [−1, 1] without clamping.
pub fn user_similarity(target: &InteractionSets, other: &InteractionSets) -> f64 {
    let agreed_likes = intersection_size(&target.liked, &other.liked);
    let agreed_dislikes = intersection_size(&target.disliked, &other.disliked);
    let target_liked_other_disliked = intersection_size(&target.liked, &other.disliked);
    let other_liked_target_disliked = intersection_size(&other.liked, &target.disliked);

    let numerator = (agreed_likes + agreed_dislikes) as f64
        - (target_liked_other_disliked + other_liked_target_disliked) as f64;

    // Zero agreement short-circuits before the division, which also covers
    // the degenerate all-empty case without dividing by zero.
    if numerator == 0.0 {
        return 0.0;
    }

    let denominator = union_size(&[
        &target.liked,
        &target.disliked,
        &other.liked,
        &other.disliked,
    ]) as f64;

    round3(numerator / denominator)
}

/// Computes one similarity coefficient per peer, keyed by peer id
///
/// Reads each peer's interaction sets from the store; any storage failure
/// aborts the whole batch.
pub async fn similarities_with_peers(
    store: &dyn ReviewStore,
    peers: &HashSet<UserId>,
    target: &InteractionSets,
) -> AppResult<HashMap<UserId, f64>> {
    let reader = InteractionReader::new(store);

    let mut similarities = HashMap::with_capacity(peers.len());
    for &peer_id in peers {
        let peer_sets = reader.user_likes_dislikes(peer_id).await?;
        similarities.insert(peer_id, user_similarity(target, &peer_sets));
    }

    Ok(similarities)
}

fn intersection_size<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> usize {
    a.intersection(b).count()
}

fn union_size<T: std::hash::Hash + Eq + Copy>(sets: &[&HashSet<T>]) -> usize {
    let mut union = HashSet::new();
    for set in sets {
        union.extend(set.iter().copied());
    }
    union.len()
}

/// Rounds to three decimal places, halves away from zero
fn round3(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockReviewStore;
    use crate::error::AppError;
    use crate::models::{ResourceId, Review};
    use chrono::Utc;

    fn sets(liked: &[ResourceId], disliked: &[ResourceId]) -> InteractionSets {
        InteractionSets {
            liked: liked.iter().copied().collect(),
            disliked: disliked.iter().copied().collect(),
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let user = sets(&[1, 2], &[3]);
        // (2 + 1 − 0 − 0) / 3
        assert_eq!(user_similarity(&user, &user), 1.0);
    }

    #[test]
    fn test_identical_histories_are_maximally_similar() {
        let a = sets(&[10, 11], &[12]);
        let b = sets(&[10, 11], &[12]);
        assert_eq!(user_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_opposite_histories_are_maximally_dissimilar() {
        let a = sets(&[10, 11], &[12]);
        let b = sets(&[12], &[10, 11]);
        // (0 + 0 − 2 − 1) / 3
        assert_eq!(user_similarity(&a, &b), -1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = sets(&[10], &[12]);
        let b = sets(&[10, 20], &[21]);
        // (1 + 0 − 0 − 0) / |{10, 12, 20, 21}|
        assert_eq!(user_similarity(&a, &b), 0.25);
    }

    #[test]
    fn test_zero_numerator_short_circuits_to_zero() {
        // Entirely disjoint histories: union is non-empty but agreement
        // and disagreement are both zero.
        let a = sets(&[1], &[2]);
        let b = sets(&[3], &[4]);
        assert_eq!(user_similarity(&a, &b), 0.0);

        // Both empty: would divide by zero if the short-circuit ran after
        // the division.
        let empty = sets(&[], &[]);
        assert_eq!(user_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let a = sets(&[1, 2, 3], &[4, 5]);
        let b = sets(&[2, 4], &[1, 6]);

        let first = user_similarity(&a, &b);
        let second = user_similarity(&a, &b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let a = sets(&[1], &[]);
        let b = sets(&[1], &[2, 3]);
        // 1/3 rounds to 0.333
        assert_eq!(user_similarity(&a, &b), 0.333);

        let c = sets(&[1], &[]);
        let d = sets(&[1], &[2, 3, 4, 5, 6]);
        // 1/6 = 0.1666… rounds half away from zero to 0.167
        assert_eq!(user_similarity(&c, &d), 0.167);
    }

    #[test]
    fn test_coefficient_stays_in_unit_range() {
        // Exhaustive sweep over all like/dislike memberships of a
        // three-resource universe for both users. Covers one-sided and
        // tiny overlaps, where the quotient comes closest to ±1.
        let resources = [1, 2, 3];

        for a_mask in 0u32..3u32.pow(3) {
            for b_mask in 0u32..3u32.pow(3) {
                let a = sets_from_mask(&resources, a_mask);
                let b = sets_from_mask(&resources, b_mask);

                let coefficient = user_similarity(&a, &b);
                assert!(
                    (-1.0..=1.0).contains(&coefficient),
                    "similarity {} out of range for masks {} / {}",
                    coefficient,
                    a_mask,
                    b_mask
                );
            }
        }
    }

    // Ternary digit per resource: 0 = unreviewed, 1 = liked, 2 = disliked.
    fn sets_from_mask(resources: &[ResourceId], mut mask: u32) -> InteractionSets {
        let mut sets = InteractionSets::default();
        for &resource in resources {
            match mask % 3 {
                1 => {
                    sets.liked.insert(resource);
                }
                2 => {
                    sets.disliked.insert(resource);
                }
                _ => {}
            }
            mask /= 3;
        }
        sets
    }

    fn review(user_id: i64, resource_id: ResourceId, rating: i16) -> Review {
        Review {
            id: 0,
            resource_id,
            user_id,
            content: String::new(),
            rating,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_batch_scores_every_peer() {
        let mut store = MockReviewStore::new();
        store.expect_find_reviews_by_user().returning(|user_id| {
            Ok(match user_id {
                2 => vec![review(2, 10, 5), review(2, 12, 1)],
                3 => vec![review(3, 12, 5)],
                _ => vec![],
            })
        });

        let target = sets(&[10], &[12]);
        let peers = HashSet::from([2, 3]);

        let similarities = similarities_with_peers(&store, &peers, &target)
            .await
            .unwrap();

        assert_eq!(similarities.len(), 2);
        // Peer 2 agrees on both resources: (1 + 1) / 2
        assert_eq!(similarities[&2], 1.0);
        // Peer 3 liked what the target disliked: (0 − 1) / 2
        assert_eq!(similarities[&3], -0.5);
    }

    #[tokio::test]
    async fn test_batch_aborts_on_first_storage_failure() {
        let mut store = MockReviewStore::new();
        store
            .expect_find_reviews_by_user()
            .returning(|_| Err(AppError::Internal("store offline".to_string())));

        let target = sets(&[10], &[]);
        let peers = HashSet::from([2]);

        let result = similarities_with_peers(&store, &peers, &target).await;
        assert!(result.is_err());
    }
}
