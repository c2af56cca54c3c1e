mod common;

use house_finder::core::evaluator::{EvaluatedListing, ObjectiveScore};
use house_finder::core::pareto::{dominates, front_indices, front_indices_with, DominanceRule, ParetoFront};
use house_finder::core::ranker::{rank_tiers, tier_indices, RankedListings};
use house_finder::domain::model::Score;

fn evaluated(id: &str, values: &[f64]) -> EvaluatedListing {
    let scores = values
        .iter()
        .enumerate()
        .map(|(i, v)| ObjectiveScore {
            objective: format!("objective-{}", i),
            score: Some(Score::new(*v, v.to_string())),
        })
        .collect();
    EvaluatedListing::new(common::listing(id, 51.0, 1000), scores, Vec::new())
}

fn ids(listings: &[EvaluatedListing]) -> Vec<&str> {
    listings.iter().map(|e| e.listing().id.as_str()).collect()
}

/// 固定種子的線性同餘產生器，產生可重現的測試資料
fn generated_points(seed: u64, count: usize, dims: usize) -> Vec<Vec<f64>> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) % 10) as f64
    };
    (0..count).map(|_| (0..dims).map(|_| next()).collect()).collect()
}

#[test]
fn test_corner_square_front() {
    let points = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];

    // (1,1) 在兩種規則下都不在前緣
    let strict = front_indices_with(DominanceRule::Strict, &points);
    assert_eq!(strict, vec![0, 1, 2]);

    // 弱支配下 (0,0) 同時支配 (1,0) 與 (0,1)
    let pareto = front_indices(&points);
    assert_eq!(pareto, vec![0]);
    assert!(!pareto.contains(&3));
}

#[test]
fn test_two_layer_ranking() {
    let listings = vec![
        evaluated("a", &[1.0, 5.0]),
        evaluated("b", &[3.0, 3.0]),
        evaluated("c", &[5.0, 1.0]),
        evaluated("d", &[4.0, 4.0]),
        evaluated("e", &[6.0, 2.0]),
    ];

    let tiers = rank_tiers(DominanceRule::Pareto, listings);
    assert_eq!(tiers.len(), 2);
    assert_eq!(ids(&tiers[0]), vec!["a", "b", "c"]);
    assert_eq!(ids(&tiers[1]), vec!["d", "e"]);
}

#[test]
fn test_ranked_listings_iterates_in_tier_order() {
    let listings = vec![
        evaluated("slow", &[9.0, 9.0]),
        evaluated("fast", &[1.0, 1.0]),
        evaluated("mid", &[5.0, 5.0]),
    ];

    let ranked = RankedListings::new(Vec::new(), rank_tiers(DominanceRule::Pareto, listings));
    let order: Vec<(usize, &str)> = ranked
        .iter()
        .map(|(tier, e)| (tier, e.listing().id.as_str()))
        .collect();

    assert_eq!(order, vec![(0, "fast"), (1, "mid"), (2, "slow")]);
    assert_eq!(ids(ranked.best()), vec!["fast"]);
    assert_eq!(ranked.len(), 3);
}

#[test]
fn test_front_is_idempotent() {
    for seed in 1..20 {
        let points = generated_points(seed, 30, 3);
        let front = front_indices(&points);
        let front_points: Vec<Vec<f64>> = front.iter().map(|&i| points[i].clone()).collect();

        let again = front_indices(&front_points);
        assert_eq!(again, (0..front_points.len()).collect::<Vec<_>>(), "seed {}", seed);
    }
}

#[test]
fn test_front_is_non_empty_and_non_dominated() {
    for seed in 1..20 {
        let points = generated_points(seed, 25, 2);
        let front = front_indices(&points);
        assert!(!front.is_empty());

        for &i in &front {
            assert!(points.iter().all(|p| !dominates(p, &points[i])), "seed {}", seed);
        }
        for i in (0..points.len()).filter(|i| !front.contains(i)) {
            assert!(front.iter().any(|&f| dominates(&points[f], &points[i])), "seed {}", seed);
        }
    }
}

#[test]
fn test_tiers_partition_input_exactly() {
    for rule in [DominanceRule::Pareto, DominanceRule::Strict] {
        for seed in 1..20 {
            let points = generated_points(seed, 40, 3);
            let tiers = tier_indices(rule, &points);

            assert!(tiers.iter().all(|tier| !tier.is_empty()));

            let mut seen: Vec<usize> = tiers.iter().flatten().copied().collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..points.len()).collect::<Vec<_>>(), "seed {}", seed);
        }
    }
}

#[test]
fn test_later_tiers_are_dominated_by_earlier_ones() {
    let points = generated_points(42, 40, 2);
    let tiers = tier_indices(DominanceRule::Pareto, &points);

    for window in tiers.windows(2) {
        for &worse in &window[1] {
            assert!(window[0].iter().any(|&better| dominates(&points[better], &points[worse])));
        }
    }
}

#[test]
fn test_identical_score_vectors_share_a_tier() {
    let listings = vec![
        evaluated("twin-a", &[2.0, 2.0]),
        evaluated("other", &[3.0, 1.0]),
        evaluated("twin-b", &[2.0, 2.0]),
    ];

    let front = ParetoFront::of(&listings);
    assert_eq!(ids(front.members()), vec!["twin-a", "other", "twin-b"]);
}

#[test]
fn test_absent_score_ranks_last() {
    let partial = EvaluatedListing::new(
        common::listing("partial", 51.0, 1000),
        vec![
            ObjectiveScore {
                objective: "objective-0".to_string(),
                score: Some(Score::new(1.0, "1")),
            },
            ObjectiveScore {
                objective: "objective-1".to_string(),
                score: None,
            },
        ],
        Vec::new(),
    );

    let tiers = rank_tiers(
        DominanceRule::Pareto,
        vec![partial, evaluated("complete", &[1.0, 50.0])],
    );
    assert_eq!(ids(&tiers[0]), vec!["complete"]);
    assert_eq!(ids(&tiers[1]), vec!["partial"]);
}
