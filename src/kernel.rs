//! Partitioning kernel.
//!
//! Splits a range around a pivot in one streaming pass: lanes below the
//! pivot are compress-stored at the left write cursor, lanes at or above it
//! are packed at the far end of the still-unpartitioned window. Two register
//! holdouts (one per end) are loaded up front so that every slot is read
//! before it can be overwritten; the side with fewer unwritten reserved
//! slots is always the next to be loaded.

use crate::{Sortable, SimdVector};

/// Upper bound on `UNROLL * N` across all backends; sizes the stack scratch
/// buffer of the unrolled kernel.
const MAX_SCRATCH: usize = 256;

/// Registers held per holdout batch in the unrolled kernel.
const MAX_UNROLL: usize = 8;

#[inline]
fn prefetch_read<T>(data: &[T], index: usize) {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        use core::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch(data.as_ptr().wrapping_add(index) as *const i8, _MM_HINT_T0);
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = (data, index);
    }
}

/// Partition one register and store it on both sides of the range.
#[inline]
fn partition_vec<T, const N: usize, V>(
    data: &mut [T],
    l_store: &mut usize,
    unpartitioned: &mut usize,
    curr: V,
    pivot: V,
    smallest: &mut V,
    biggest: &mut V,
) where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let ge_mask = V::ge(curr, pivot);
    let amount_ge = V::mask_popcount(ge_mask);
    V::mask_compressstoreu(&mut data[*l_store..], V::mask_not(ge_mask), curr);
    *l_store += N - amount_ge;
    V::mask_compressstoreu(&mut data[*l_store + *unpartitioned..], ge_mask, curr);
    // The very last call of a partition drives this below zero; the wrapped
    // value is never read.
    *unpartitioned = unpartitioned.wrapping_sub(N);
    *smallest = V::min(curr, *smallest);
    *biggest = V::max(curr, *biggest);
}

/// Partitions `data` around `pivot` in place and returns the index of the
/// first element greater than or equal to the pivot.
///
/// `smallest` and `biggest` must arrive seeded (`T::MAX_VALUE` and
/// `T::MIN_VALUE` for a fresh range) and leave folded with the extrema of
/// the whole range.
pub(crate) fn partition<T, const N: usize, V>(
    data: &mut [T],
    pivot: T,
    smallest: &mut T,
    biggest: &mut T,
) -> usize
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let mut left = 0usize;
    let mut right = data.len();

    // Scalar prologue: shorten the range to a multiple of N.
    for _ in 0..(right - left) % N {
        if data[left] < *smallest {
            *smallest = data[left];
        }
        if data[left] > *biggest {
            *biggest = data[left];
        }
        if !(data[left] < pivot) {
            right -= 1;
            data.swap(left, right);
        } else {
            left += 1;
        }
    }

    if left == right {
        return left; /* fewer than N elements in the range */
    }

    let pivot_vec = V::set1(pivot);
    let mut min_vec = V::set1(*smallest);
    let mut max_vec = V::set1(*biggest);

    if right - left == N {
        let curr = V::loadu(&data[left..]);
        let mut l_store = left;
        let mut unpartitioned = 0usize;
        partition_vec(
            data,
            &mut l_store,
            &mut unpartitioned,
            curr,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
        );
        *smallest = V::reducemin(min_vec);
        *biggest = V::reducemax(max_vec);
        return l_store;
    }

    // The first and last register are held out and flushed after the loop.
    let vec_left = V::loadu(&data[left..]);
    let vec_right = V::loadu(&data[right - N..]);
    let mut unpartitioned = right - left - N;
    let mut l_store = left;
    left += N;
    right -= N;
    while right != left {
        let curr;
        // Load from whichever side has fewer unwritten reserved slots, so
        // the slots written this round have already been read.
        if (l_store + unpartitioned + N) - right < left - l_store {
            right -= N;
            curr = V::loadu(&data[right..]);
        } else {
            curr = V::loadu(&data[left..]);
            left += N;
        }
        partition_vec(
            data,
            &mut l_store,
            &mut unpartitioned,
            curr,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
        );
    }

    partition_vec(
        data,
        &mut l_store,
        &mut unpartitioned,
        vec_left,
        pivot_vec,
        &mut min_vec,
        &mut max_vec,
    );
    partition_vec(
        data,
        &mut l_store,
        &mut unpartitioned,
        vec_right,
        pivot_vec,
        &mut min_vec,
        &mut max_vec,
    );
    *smallest = V::reducemin(min_vec);
    *biggest = V::reducemax(max_vec);
    l_store
}

/// Unrolled variant of [`partition`]: processes `V::UNROLL` registers per
/// round and prefetches the next batch on the side being read.
///
/// Ranges too small to carry two `UNROLL`-wide holdout batches are delegated
/// to the plain kernel, which also covers the empty and single-register
/// edge cases.
pub(crate) fn partition_unrolled<T, const N: usize, V>(
    data: &mut [T],
    pivot: T,
    smallest: &mut T,
    biggest: &mut T,
) -> usize
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let unroll = V::UNROLL;
    if unroll <= 1 || data.len() <= 2 * unroll * N + N {
        return partition::<T, N, V>(data, pivot, smallest, biggest);
    }
    debug_assert!(unroll <= MAX_UNROLL);
    debug_assert!(unroll * N <= MAX_SCRATCH);

    let mut left = 0usize;
    let mut right = data.len();

    // Scalar prologue: shorten the range to a multiple of N.
    for _ in 0..(right - left) % N {
        if data[left] < *smallest {
            *smallest = data[left];
        }
        if data[left] > *biggest {
            *biggest = data[left];
        }
        if !(data[left] < pivot) {
            right -= 1;
            data.swap(left, right);
        } else {
            left += 1;
        }
    }

    let pivot_vec = V::set1(pivot);
    let mut min_vec = V::set1(*smallest);
    let mut max_vec = V::set1(*biggest);

    // Orphan registers that do not fill a whole batch. Their below-pivot
    // lanes go straight to the left cursor; their at-or-above lanes are
    // parked in a scratch buffer, because storing them on the right would
    // overwrite data that has no copy anywhere else.
    let orphan_vecs = ((right - left) / N) % unroll;
    let mut scratch = [T::MAX_VALUE; MAX_SCRATCH];
    let mut buffered = 0usize;
    let mut l_store = left;
    for i in 0..orphan_vecs {
        let curr = V::loadu(&data[left + i * N..]);
        let ge_mask = V::ge(curr, pivot_vec);
        let amount_ge = V::mask_popcount(ge_mask);
        V::mask_compressstoreu(&mut data[l_store..], V::mask_not(ge_mask), curr);
        V::mask_compressstoreu(&mut scratch[buffered..], ge_mask, curr);
        min_vec = V::min(curr, min_vec);
        max_vec = V::max(curr, max_vec);
        buffered += amount_ge;
        l_store += N - amount_ge;
    }

    // The unread elements at the far right move into the gap the orphans
    // left behind; the buffered at-or-above lanes take their place at the
    // very end of the range. Both copies are element-exact.
    data.copy_within(right - buffered..right, l_store);
    data[right - buffered..right].copy_from_slice(&scratch[..buffered]);
    left += orphan_vecs * N - buffered;
    right -= buffered;
    debug_assert!(l_store == left);
    debug_assert!((right - left) % (unroll * N) == 0);

    // Two batch-wide holdouts, flushed after the loop.
    let mut vec_left = [pivot_vec; MAX_UNROLL];
    let mut vec_right = [pivot_vec; MAX_UNROLL];
    for i in 0..unroll {
        vec_left[i] = V::loadu(&data[left + i * N..]);
        vec_right[i] = V::loadu(&data[right - N * (unroll - i)..]);
    }
    let mut unpartitioned = right - left - N;
    left += unroll * N;
    right -= unroll * N;
    while right != left {
        let mut curr = [pivot_vec; MAX_UNROLL];
        if (l_store + unpartitioned + N) - right < left - l_store {
            right -= unroll * N;
            for i in 0..unroll {
                curr[i] = V::loadu(&data[right + i * N..]);
                prefetch_read(data, right + i * N - unroll * N);
            }
        } else {
            for i in 0..unroll {
                curr[i] = V::loadu(&data[left + i * N..]);
                prefetch_read(data, left + i * N + unroll * N);
            }
            left += unroll * N;
        }
        for &reg in curr.iter().take(unroll) {
            partition_vec(
                data,
                &mut l_store,
                &mut unpartitioned,
                reg,
                pivot_vec,
                &mut min_vec,
                &mut max_vec,
            );
        }
    }

    for &reg in vec_left.iter().take(unroll) {
        partition_vec(
            data,
            &mut l_store,
            &mut unpartitioned,
            reg,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
        );
    }
    for &reg in vec_right.iter().take(unroll) {
        partition_vec(
            data,
            &mut l_store,
            &mut unpartitioned,
            reg,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
        );
    }
    *smallest = V::reducemin(min_vec);
    *biggest = V::reducemax(max_vec);
    l_store
}
