//! NaN displacement for the float paths.
//!
//! IEEE comparisons are only a total order once NaNs are out of the way.
//! The sort path swaps them for positive infinity up front and rewrites the
//! tail afterwards; the select path compacts them to the tail and shrinks
//! the working range instead.

use crate::{Sortable, SimdVector};

/// Replaces every NaN with `T::MAX_VALUE` (positive infinity for floats)
/// and returns how many lanes were replaced.
pub(crate) fn replace_nan_with_inf<T, const N: usize, V>(data: &mut [T]) -> usize
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let len = data.len();
    let mut nan_count = 0;
    let mut i = 0;
    while i < len {
        let chunk = if len - i < N {
            V::mask_loadu(V::partial_loadmask(len - i), &data[i..])
        } else {
            V::loadu(&data[i..])
        };
        let nanmask = V::nan_mask(chunk);
        nan_count += V::mask_popcount(nanmask);
        V::mask_storeu(V::set1(T::MAX_VALUE), nanmask, &mut data[i..]);
        i += N;
    }
    nan_count
}

/// Rewrites the last `nan_count` slots with quiet NaNs, undoing
/// [`replace_nan_with_inf`] after the sort has pushed the substitutes to
/// the tail.
pub(crate) fn replace_inf_with_nan<T: Sortable>(data: &mut [T], nan_count: usize) {
    for slot in data.iter_mut().rev().take(nan_count) {
        *slot = T::quiet_nan();
    }
}

/// Swaps every NaN to the end of the array and returns how many there were.
pub(crate) fn move_nans_to_end_of_array<T: Sortable>(data: &mut [T]) -> usize {
    if data.is_empty() {
        return 0;
    }
    let mut i = 0;
    let mut j = data.len() - 1;
    let mut count = 0;
    while i < j {
        if data[i].is_nan() {
            data.swap(i, j);
            j -= 1;
            count += 1;
        } else {
            i += 1;
        }
    }
    /* the element where the fingers met has not been checked */
    if data[i].is_nan() {
        count += 1;
    }
    count
}

/// Returns true if `data` contains a NaN; stops at the first hit.
pub(crate) fn has_nan<T, const N: usize, V>(data: &[T]) -> bool
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let len = data.len();
    let mut i = 0;
    while i < len {
        let chunk = if len - i < N {
            V::mask_loadu(V::partial_loadmask(len - i), &data[i..])
        } else {
            V::loadu(&data[i..])
        };
        if V::mask_any(V::nan_mask(chunk)) {
            return true;
        }
        i += N;
    }
    false
}
