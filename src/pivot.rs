//! Median-of-samples pivot selection.

use crate::{Sortable, SimdVector};

/// Picks a pivot as the median lane of one register gathered at a fixed
/// stride across the range. The stride sampling keeps the register cheap to
/// fill while still spanning the whole range; sorting it in-register makes
/// the median a single lane extract.
///
/// The range must be longer than one register and free of NaNs.
pub(crate) fn get_pivot<T, const N: usize, V>(data: &[T]) -> T
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    debug_assert!(data.len() > N);
    let stride = (data.len() - 1) / N;
    let mut samples = [T::MAX_VALUE; N];
    for (i, sample) in samples.iter_mut().enumerate() {
        *sample = data[(i + 1) * stride];
    }
    let sorted = V::sort_vec(V::loadu(&samples));
    V::extract(sorted, N / 2)
}
