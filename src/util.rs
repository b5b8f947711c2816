//! Ready-made ordering, distance and combiner functions.

use itertools::Itertools;
use num_traits::{Float, Signed};


/// The natural `<=` ordering
pub fn leq<T: PartialOrd>(a: &T, b: &T) -> bool {
    a <= b
}


/// Absolute difference of two numbers
///
/// ```
/// use splitree::util::abs_distance;
/// assert_eq!(abs_distance(&3, &-4), 7);
/// assert_eq!(abs_distance(&1.5, &0.25), 1.25);
/// ```
pub fn abs_distance<N: Signed + Copy>(a: &N, b: &N) -> N {
    (*a - *b).abs()
}


/// Combiner that uses the greatest element left of a cut as separator
pub fn left_separator<T: Clone>(a: &T, _: &T) -> T {
    a.clone()
}


/// Combiner that separates at the midpoint between both sides of a cut
pub fn midpoint<N: Float>(a: &N, b: &N) -> N {
    let two = N::one() + N::one();
    (*a / two + *b / two).max(*a).min(*b)
}


/// Position of the first adjacent pair `(a, b)` with `!leq(a, b)`
///
/// Returns `None` for sorted input.
pub fn first_unsorted<T, L>(items: &[T], leq: L) -> Option<usize>
    where L: Fn(&T, &T) -> bool,
{
    items.iter()
        .tuple_windows()
        .position(|(a, b)| !leq(a, b))
}
