//! Small-array sorter built on bitonic merging networks.
//!
//! A range of up to `16 * N` elements is loaded into registers (the tail
//! through a masked load, unused registers pinned to `MAX_VALUE`), each
//! register is sorted on its own, and sorted register groups are then merged
//! pairwise into groups of 2, 4, 8 and finally 16 registers.

use crate::{Sortable, SimdVector};

/// Compare and exchange two registers by swapping min and max lanes.
#[inline]
pub(crate) fn coex<T, const N: usize, V>(a: &mut V, b: &mut V)
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let temp = *a;
    *a = V::min(*a, *b);
    *b = V::max(temp, *b);
}

/// Merges two sorted halves of `regs` into one sorted run.
///
/// First step of a merging network: min/max against the reversed opposite
/// register. A compare-exchange cascade at halving distances then cleans
/// each half, and a half cleaner inside every register finishes the merge.
fn bitonic_merge_regs<T, const N: usize, V>(regs: &mut [V])
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let n = regs.len();
    debug_assert!(n.is_power_of_two());
    let half = n / 2;

    for i in 0..half {
        let rev = V::reverse(regs[n - 1 - i]);
        let lo = V::min(regs[i], rev);
        let hi = V::max(regs[i], rev);
        regs[i] = lo;
        regs[n - 1 - i] = V::reverse(hi);
    }

    let mut dist = half / 2;
    while dist > 0 {
        for block in 0..n / (2 * dist) {
            let base = block * 2 * dist;
            for j in base..base + dist {
                let (head, tail) = regs.split_at_mut(j + dist);
                coex::<T, N, V>(&mut head[j], &mut tail[0]);
            }
        }
        dist /= 2;
    }

    for reg in regs.iter_mut() {
        *reg = V::bitonic_merge(*reg);
    }
}

/// Sorts `data` in place; `data.len()` must not exceed
/// `V::NETWORK_SORT_THRESHOLD`.
pub(crate) fn sort_small<T, const N: usize, V>(data: &mut [T])
where
    T: Sortable,
    V: SimdVector<T, N>,
{
    let len = data.len();
    if len <= 1 {
        return;
    }
    debug_assert!(len <= V::NETWORK_SORT_THRESHOLD);

    let full = len / N;
    let partial = len % N;
    let occupied = full + (partial != 0) as usize;
    let nregs = occupied.next_power_of_two();

    let mut regs = [V::set1(T::MAX_VALUE); 16];
    for i in 0..full {
        regs[i] = V::loadu(&data[i * N..]);
    }
    if partial != 0 {
        regs[full] = V::mask_loadu(V::partial_loadmask(partial), &data[full * N..]);
    }

    for reg in regs.iter_mut().take(nregs) {
        *reg = V::sort_vec(*reg);
    }
    let mut width = 2;
    while width <= nregs {
        for group in regs[..nregs].chunks_mut(width) {
            bitonic_merge_regs::<T, N, V>(group);
        }
        width *= 2;
    }

    for i in 0..full {
        V::storeu(regs[i], &mut data[i * N..]);
    }
    if partial != 0 {
        V::mask_storeu(regs[full], V::partial_loadmask(partial), &mut data[full * N..]);
    }
}
