use palmer_stats::{HistoryList, MISSING, kth_smallest, select_kth};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

// ---------------------------------------------------------------------------
// Selection agrees with a full sort
// ---------------------------------------------------------------------------

#[test]
fn kth_matches_sorted_for_random_permutations() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut values: Vec<f64> = (0..37).map(|i| (i as f64) * 0.75 - 9.0).collect();
    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    for _ in 0..25 {
        values.shuffle(&mut rng);
        for k in 1..=values.len() {
            assert_eq!(
                kth_smallest(&values, k),
                Some(sorted[k - 1]),
                "k={k} disagrees with sorted order"
            );
        }
    }
}

#[test]
fn select_partitions_around_kth() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut base: Vec<f64> = (0..50).map(|i| ((i * 13) % 17) as f64).collect();
    for k in [1, 10, 25, 49, 50] {
        base.shuffle(&mut rng);
        let mut v = base.clone();
        select_kth(&mut v, k);
        let pivot = v[k - 1];
        assert!(v[..k - 1].iter().all(|&x| x <= pivot));
        assert!(v[k..].iter().all(|&x| x >= pivot));
    }
}

// ---------------------------------------------------------------------------
// History list percentiles
// ---------------------------------------------------------------------------

#[test]
fn percentile_is_order_independent() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut values: Vec<f64> = (1..=200).map(f64::from).collect();
    values.extend([MISSING; 20]);
    let mut previous = None;
    for _ in 0..5 {
        values.shuffle(&mut rng);
        let list = HistoryList::from(values.clone());
        let p98 = list.percentile(0.98);
        assert_eq!(p98, Some(196.0));
        if let Some(prev) = previous {
            assert_eq!(p98, prev);
        }
        previous = Some(p98);
    }
}
