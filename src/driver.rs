//! Hybrid quicksort driver.
//!
//! Recursively partitions with the unrolled kernel and prunes a side as
//! soon as the pivot equals the range extremum on that side. Ranges at or
//! below the network threshold go to the bitonic sorter; an introspective
//! recursion budget of `2 * log2(len)` bounds stack depth and hands
//! adversarial pivot patterns to a worst-case `O(n log n)` comparison sort.

use crate::{kernel, nan, network, pivot, Sortable, SimdVector};

pub(crate) fn qsort<T, const N: usize, V>(data: &mut [T], max_iters: i64)
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    /*
     * Resort to the comparison sort if quicksort isnt making any progress
     */
    if max_iters <= 0 {
        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        return;
    }
    /*
     * Base case: bitonic networks sort ranges up to the threshold
     */
    if data.len() <= V::NETWORK_SORT_THRESHOLD {
        network::sort_small::<T, N, V>(data);
        return;
    }

    let pivot = pivot::get_pivot::<T, N, V>(data);
    let mut smallest = T::MAX_VALUE;
    let mut biggest = T::MIN_VALUE;
    let p = kernel::partition_unrolled::<T, N, V>(data, pivot, &mut smallest, &mut biggest);

    let (lo, hi) = data.split_at_mut(p);
    if pivot != smallest {
        qsort::<T, N, V>(lo, max_iters - 1);
    }
    if pivot != biggest {
        qsort::<T, N, V>(hi, max_iters - 1);
    }
}

pub(crate) fn qselect<T, const N: usize, V>(data: &mut [T], pos: usize, max_iters: i64)
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    if max_iters <= 0 {
        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        return;
    }
    if data.len() <= V::NETWORK_SORT_THRESHOLD {
        network::sort_small::<T, N, V>(data);
        return;
    }

    let pivot = pivot::get_pivot::<T, N, V>(data);
    let mut smallest = T::MAX_VALUE;
    let mut biggest = T::MIN_VALUE;
    let p = kernel::partition_unrolled::<T, N, V>(data, pivot, &mut smallest, &mut biggest);

    // Only the side holding the target position is worth descending into.
    if pivot != smallest && pos < p {
        qselect::<T, N, V>(&mut data[..p], pos, max_iters - 1);
    } else if pivot != biggest && pos >= p {
        qselect::<T, N, V>(&mut data[p..], pos - p, max_iters - 1);
    }
}

pub(crate) fn sort<T, const N: usize, V>(data: &mut [T])
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    if data.len() <= 1 {
        return;
    }
    let nan_count = if T::IS_FLOAT {
        nan::replace_nan_with_inf::<T, N, V>(data)
    } else {
        0
    };
    let max_iters = 2 * (data.len() | 1).ilog2() as i64;
    qsort::<T, N, V>(data, max_iters);
    if nan_count > 0 {
        nan::replace_inf_with_nan(data, nan_count);
    }
}

pub(crate) fn select<T, const N: usize, V>(data: &mut [T], k: usize, has_nan: bool)
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    if data.is_empty() {
        return;
    }
    let mut last = data.len() - 1;
    if T::IS_FLOAT && has_nan {
        let nan_count = nan::move_nans_to_end_of_array(data);
        if nan_count == data.len() {
            return;
        }
        last = data.len() - 1 - nan_count;
    }
    if k <= last && last > 0 {
        let max_iters = 2 * (last | 1).ilog2() as i64;
        qselect::<T, N, V>(&mut data[..=last], k, max_iters);
    }
}

pub(crate) fn partial_sort<T, const N: usize, V>(data: &mut [T], k: usize, has_nan: bool)
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let k = k.min(data.len());
    if k == 0 {
        return;
    }
    select::<T, N, V>(data, k - 1, has_nan);
    sort::<T, N, V>(&mut data[..k - 1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn exhausted_budget_falls_back_to_comparison_sort() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut data: Vec<i64> = (0..4000).map(|_| rng.gen()).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        qsort::<i64, 8, [i64; 8]>(&mut data, 0);
        assert_eq!(data, expected);
    }

    #[test]
    fn near_exhausted_budget_still_sorts() {
        let mut rng = StdRng::seed_from_u64(6);
        for budget in [1i64, 2, 3] {
            let mut data: Vec<i64> = (0..4000).map(|_| rng.gen_range(0..100)).collect();
            let mut expected = data.clone();
            expected.sort_unstable();
            qsort::<i64, 8, [i64; 8]>(&mut data, budget);
            assert_eq!(data, expected, "budget {}", budget);
        }
    }

    #[test]
    fn select_beyond_last_valid_index_is_a_noop() {
        let original: Vec<f32> = vec![2.0, f32::NAN, 1.0, f32::NAN];
        let mut data = original.clone();
        // Two non-NaN elements; k = 3 is outside the effective range.
        select::<f32, 16, [f32; 16]>(&mut data, 3, true);
        assert_eq!(data.iter().filter(|x| x.is_nan()).count(), 2);
    }

    #[test]
    fn sorts_presorted_and_sawtooth_patterns() {
        let ascending: Vec<i32> = (0..5000).collect();
        let mut data = ascending.clone();
        sort::<i32, 16, [i32; 16]>(&mut data);
        assert_eq!(data, ascending);

        let mut data: Vec<i32> = (0..5000).rev().collect();
        sort::<i32, 16, [i32; 16]>(&mut data);
        assert_eq!(data, ascending);

        let mut data: Vec<i32> = (0..5000).map(|i| i % 17).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        sort::<i32, 16, [i32; 16]>(&mut data);
        assert_eq!(data, expected);
    }

    #[test]
    fn select_matches_full_sort_order_statistics() {
        let mut rng = StdRng::seed_from_u64(8);
        let original: Vec<u16> = (0..3000).map(|_| rng.gen()).collect();
        let mut expected = original.clone();
        expected.sort_unstable();
        for k in [0usize, 1, 1499, 2998, 2999] {
            let mut data = original.clone();
            select::<u16, 32, [u16; 32]>(&mut data, k, false);
            assert_eq!(data[k], expected[k], "k {}", k);
        }
    }
}
