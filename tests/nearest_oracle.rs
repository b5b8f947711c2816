//! k-th nearest queries checked against brute force

use std::sync::Mutex;
use std::thread;

use quickcheck::{quickcheck, TestResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use splitree::naive::{generate_sequence, sort_all, sort_k};
use splitree::util::{abs_distance, left_separator, leq, midpoint};
use splitree::{Error, Side, SplitTree};


#[test]
fn scenario_tie_prefers_smaller_value() {
    let mut tree = SplitTree::generate_tree(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], left_separator
    ).unwrap();
    let nearest = tree.query_k_nearest(1, &3.5, leq, abs_distance).unwrap();
    assert_eq!(nearest.value, 3.0);
    assert_eq!(nearest.index, 2);
}

#[test]
fn scenario_uneven_gaps() {
    let items = vec![1, 4, 7, 8, 10, 12, 13, 18];
    let mut tree = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
    // ordered by distance to 5 the elements read 4, 7, 8, 1, 10, ...
    assert_eq!(tree.query_k_nearest(2, &5, leq, abs_distance).unwrap().value, 7);
    assert_eq!(tree.query_k_nearest(3, &5, leq, abs_distance).unwrap().value, 8);
    for k in 1..=items.len() {
        let expected = *sort_all(&items, k, &5, abs_distance).unwrap().1;
        assert_eq!(tree.query_k_nearest(k, &5, leq, abs_distance).unwrap().value, expected);
    }
}

#[test]
fn scenario_single_element() {
    let mut tree = SplitTree::generate_tree(vec![42], left_separator).unwrap();
    for q in [-7, 42, 1000] {
        assert_eq!(tree.query_tree(&q, leq).len(), 1);
        assert_eq!(tree.query_k_nearest(1, &q, leq, abs_distance).unwrap().value, 42);
    }
    assert_eq!(
        tree.query_k_nearest(2, &0, leq, abs_distance),
        Err(Error::OutOfRange { k: 2, len: 1 })
    );
}

#[test]
fn boundaries_nearest_and_farthest() {
    let items: Vec<i32> = (0..20).map(|i| i * i).collect();
    let mut tree = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
    let n = items.len();
    for q in [-5, 0, 17, 100, 361, 999] {
        let nearest = tree.query_k_nearest(1, &q, leq, abs_distance).unwrap();
        let farthest = tree.query_k_nearest(n, &q, leq, abs_distance).unwrap();
        assert_eq!(nearest.value, *sort_all(&items, 1, &q, abs_distance).unwrap().1);
        assert_eq!(farthest.value, *sort_all(&items, n, &q, abs_distance).unwrap().1);
        assert!(matches!(
            tree.query_k_nearest(0, &q, leq, abs_distance),
            Err(Error::OutOfRange { k: 0, .. })
        ));
        assert!(matches!(
            tree.query_k_nearest(n + 1, &q, leq, abs_distance),
            Err(Error::OutOfRange { .. })
        ));
    }
}

#[test]
fn exhaustive_small_trees() {
    for n in 1..=24 {
        // spaced by two so that odd queries fall between elements
        let items: Vec<i32> = (0..n).map(|i| 2 * i).collect();
        let mut tree = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
        for q in -3..=(2 * n + 2) {
            for k in 1..=items.len() {
                let expected = sort_all(&items, k, &q, abs_distance).unwrap();
                let found = tree.query_k_nearest(k, &q, leq, abs_distance).unwrap();
                assert_eq!(found.value, *expected.1, "n = {}, q = {}, k = {}", n, q, k);
                assert_eq!(found.index, expected.0, "n = {}, q = {}, k = {}", n, q, k);
            }
        }
        assert!(!tree.is_split());
    }
}

#[test]
fn exhaustive_with_duplicates() {
    let items = vec![1, 1, 2, 3, 3, 3, 5, 8, 8, 13];
    let mut tree = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
    for q in 0..15 {
        for k in 1..=items.len() {
            let expected = *sort_all(&items, k, &q, abs_distance).unwrap().1;
            let found = tree.query_k_nearest(k, &q, leq, abs_distance).unwrap();
            assert_eq!(found.value, expected, "q = {}, k = {}", q, k);
            assert_eq!(items[found.index], found.value);
        }
    }
}

#[test]
fn random_floats_with_midpoint_separators() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let n = rng.gen_range(1..200);
        let items = generate_sequence(&mut rng, -50.0, 50.0, n);
        let mut tree = SplitTree::generate_tree_checked(items.clone(), midpoint, leq).unwrap();
        for _ in 0..50 {
            let q = rng.gen_range(-60.0..60.0);
            let k = rng.gen_range(1..=n);
            let expected = *sort_k(&items, k, &q, abs_distance).unwrap().1;
            let found = tree.query_k_nearest(k, &q, leq, abs_distance).unwrap();
            assert_eq!(found.value, expected);
        }
    }
}

#[test]
fn queries_do_not_leak_state() {
    let items: Vec<i32> = vec![-9, -4, 0, 3, 11, 12, 20, 31, 32, 40, 52];
    let mut shared = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
    let queries = [(3, 10), (1, -20), (7, 33), (11, 0), (2, 12), (5, 60)];
    for &(k, q) in queries.iter() {
        let mut fresh = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
        let independent = fresh.query_k_nearest(k, &q, leq, abs_distance).unwrap();
        let consecutive = shared.query_k_nearest(k, &q, leq, abs_distance).unwrap();
        assert_eq!(consecutive, independent);
    }
}

#[test]
fn window_is_contiguous_neighbourhood() {
    let items = vec![1, 4, 7, 8, 10, 12, 13, 18];
    let mut tree = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
    let nearest = tree.query_k_nearest(5, &9, leq, abs_distance).unwrap();
    // 8 and 10 tie at distance 1, then 7, 12 and 13 follow
    assert_eq!((nearest.value, nearest.index, nearest.side), (13, 6, Side::Right));
    assert_eq!(&items[nearest.window(5)], &[7, 8, 10, 12, 13]);
    let tied = tree.query_k_nearest(2, &9, leq, abs_distance).unwrap();
    assert_eq!((tied.value, tied.side), (10, Side::Right));
    assert_eq!(&items[tied.window(2)], &[8, 10]);
}

#[test]
fn tree_matches_naive() {
    fn tree_matches_naive(items: Vec<i32>, k: usize, q: i32) -> TestResult {
        if items.is_empty() {
            return TestResult::discard();
        }
        let mut items: Vec<i64> = items.into_iter().map(i64::from).collect();
        items.sort();
        let q = i64::from(q);
        let k = k % items.len() + 1;
        let expected = sort_all(&items, k, &q, abs_distance).unwrap();
        let mut tree = SplitTree::generate_tree(items.clone(), left_separator).unwrap();
        let found = tree.query_k_nearest(k, &q, leq, abs_distance).unwrap();
        TestResult::from_bool(found.value == *expected.1 && !tree.is_split())
    }
    quickcheck(tree_matches_naive as fn(Vec<i32>, usize, i32) -> TestResult);
}

#[test]
fn shared_behind_mutex() {
    let items: Vec<i64> = (0..500).map(|i| i * 3).collect();
    let tree = Mutex::new(SplitTree::generate_tree(items.clone(), left_separator).unwrap());
    thread::scope(|scope| {
        for worker in 0..4i64 {
            let tree = &tree;
            let items = &items;
            scope.spawn(move || {
                for step in 0..100i64 {
                    let q = worker * 373 + step * 7 - 50;
                    let k = (step as usize % items.len()) + 1;
                    let found = tree.lock().unwrap().query_k_nearest(k, &q, leq, abs_distance).unwrap();
                    assert_eq!(found.value, *sort_all(items, k, &q, abs_distance).unwrap().1);
                }
            });
        }
    });
    assert!(!tree.into_inner().unwrap().is_split());
}
