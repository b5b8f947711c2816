//! Brute-force reference implementations.
//!
//! These answer the same queries as a split tree by sorting, and serve as
//! oracles for testing and as baselines for measurements.

use std::cmp::Ordering;

use itertools::Itertools;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

#[cfg(any(test, feature = "arbitrary"))]
use quickcheck::TestResult;

#[cfg(any(test, feature = "arbitrary"))]
use crate::tree::SplitTree;
#[cfg(any(test, feature = "arbitrary"))]
use crate::util::{abs_distance, left_separator, leq};


/// Sort all elements by `(distance, value)` and return the indices in order
fn by_distance<'a, T, D, N>(items: &'a [T], q: &T, distance: &D) -> impl Iterator<Item = (usize, &'a T)>
    where T: PartialOrd,
          D: Fn(&T, &T) -> N,
          N: PartialOrd,
{
    items.iter()
        .enumerate()
        .map(|(i, x)| (distance(q, x), i, x))
        .sorted_by(|(da, _, a), (db, _, b)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        })
        .map(|(_, i, x)| (i, x))
}


/// k-th nearest element by sorting every element
///
/// Elements at equal distance are ordered by value. Returns the sorted index
/// and the element, or `None` if `k` is not in `[1, items.len()]`.
pub fn sort_all<'a, T, D, N>(items: &'a [T], k: usize, q: &T, distance: D) -> Option<(usize, &'a T)>
    where T: PartialOrd,
          D: Fn(&T, &T) -> N,
          N: PartialOrd,
{
    if k == 0 {
        return None;
    }
    by_distance(items, q, &distance).nth(k - 1)
}


/// k-th nearest element by sorting a window around `q`
///
/// A binary search locates `q` in the sorted `items`, then only the `k`
/// elements on either side are sorted. Same contract as `sort_all`.
pub fn sort_k<'a, T, D, N>(items: &'a [T], k: usize, q: &T, distance: D) -> Option<(usize, &'a T)>
    where T: PartialOrd,
          D: Fn(&T, &T) -> N,
          N: PartialOrd,
{
    if k == 0 || k > items.len() {
        return None;
    }
    let split = items.partition_point(|x| x < q);
    let start = split.saturating_sub(k);
    let end = (split + k).min(items.len());
    by_distance(&items[start..end], q, &distance)
        .nth(k - 1)
        .map(|(i, x)| (start + i, x))
}


/// Indices of the `k` nearest elements, in ascending order
pub fn k_nearest_indices<T, D, N>(items: &[T], k: usize, q: &T, distance: D) -> Vec<usize>
    where T: PartialOrd,
          D: Fn(&T, &T) -> N,
          N: PartialOrd,
{
    by_distance(items, q, &distance)
        .take(k)
        .map(|(i, _)| i)
        .sorted()
        .collect()
}


/// Draw `count` uniform values from `[min, max)`, sorted ascending
///
/// # Panics
///
/// Panics if `min >= max`.
pub fn generate_sequence<R: Rng>(rng: &mut R, min: f64, max: f64, count: usize) -> Vec<f64> {
    let range = Uniform::new(min, max);
    let mut items: Vec<f64> = (0..count).map(|_| range.sample(rng)).collect();
    items.sort_by(f64::total_cmp);
    items
}


/// Agreement with the oracle
///
/// For any sorted input, rank and query value, the split tree must find an
/// element equal to the one `sort_all` finds.
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_matches_naive(items: Vec<i16>, k: usize, q: i16) -> TestResult {
    if items.is_empty() {
        return TestResult::discard();
    }
    let items: Vec<i64> = items.into_iter().map(i64::from).sorted().collect();
    let q = i64::from(q);
    let k = k % items.len() + 1;
    let expected = sort_all(&items, k, &q, abs_distance).map(|(_, &x)| x);
    let mut tree = match SplitTree::generate_tree(items, left_separator) {
        Ok(tree) => tree,
        Err(_) => return TestResult::failed(),
    };
    let found = tree.query_k_nearest(k, &q, leq, abs_distance).ok().map(|nearest| nearest.value);
    TestResult::from_bool(found.is_some() && found == expected)
}


/// Agreement of the result window with the oracle's k nearest elements
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_window_matches_naive(items: Vec<i16>, k: usize, q: i16) -> TestResult {
    if items.is_empty() {
        return TestResult::discard();
    }
    let items: Vec<i64> = items.into_iter().map(i64::from).sorted().collect();
    let q = i64::from(q);
    let k = k % items.len() + 1;
    let expected: Vec<i64> = k_nearest_indices(&items, k, &q, abs_distance)
        .into_iter()
        .map(|i| items[i])
        .collect();
    let mut tree = match SplitTree::generate_tree(items.clone(), left_separator) {
        Ok(tree) => tree,
        Err(_) => return TestResult::failed(),
    };
    match tree.query_k_nearest(k, &q, leq, abs_distance) {
        Ok(nearest) => TestResult::from_bool(items[nearest.window(k)] == expected[..]),
        Err(_) => TestResult::failed(),
    }
}


/// A query leaves the tree exactly as it found it
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_query_is_net_zero(items: Vec<i16>, k: usize, q: i16) -> TestResult {
    if items.is_empty() {
        return TestResult::discard();
    }
    let items: Vec<i16> = items.into_iter().sorted().collect();
    let k = k % items.len() + 1;
    let mut tree = match SplitTree::generate_tree(items, left_separator) {
        Ok(tree) => tree,
        Err(_) => return TestResult::failed(),
    };
    let before = tree.clone();
    let _ = tree.query_k_nearest(k, &q, leq, |a: &i16, b: &i16| (i32::from(*a) - i32::from(*b)).abs());
    TestResult::from_bool((0..tree.nodes.len()).all(|i| tree.nodes[i] == before.nodes[i]))
}
