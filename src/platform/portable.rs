//! Portable backend.
//!
//! Implements the register contract on plain `[T; N]` arrays with `u64`
//! lane masks, so every element type runs on every host. Hardware backends
//! replace it where the platform module compiles them in.

use paste::paste;

use crate::{driver, Sortable, SimdVector};

impl<T: Sortable, const N: usize> SimdVector<T, N> for [T; N] {
    type OpMask = u64;

    const UNROLL: usize = 4;

    #[inline]
    fn set1(value: T) -> Self {
        [value; N]
    }

    #[inline]
    fn loadu(data: &[T]) -> Self {
        let mut reg = [T::MAX_VALUE; N];
        reg.copy_from_slice(&data[..N]);
        reg
    }

    #[inline]
    fn storeu(v: Self, data: &mut [T]) {
        data[..N].copy_from_slice(&v);
    }

    #[inline]
    fn partial_loadmask(n: usize) -> u64 {
        debug_assert!(n <= N);
        (1u64 << n) - 1
    }

    #[inline]
    fn mask_loadu(mask: u64, data: &[T]) -> Self {
        let mut reg = [T::MAX_VALUE; N];
        for (i, slot) in reg.iter_mut().enumerate() {
            if mask & (1 << i) != 0 {
                *slot = data[i];
            }
        }
        reg
    }

    #[inline]
    fn mask_storeu(v: Self, mask: u64, data: &mut [T]) {
        for (i, lane) in v.iter().enumerate() {
            if mask & (1 << i) != 0 {
                data[i] = *lane;
            }
        }
    }

    #[inline]
    fn mask_compressstoreu(data: &mut [T], mask: u64, v: Self) {
        debug_assert!(mask.count_ones() as usize <= data.len());
        let mut out = 0;
        for (i, lane) in v.iter().enumerate() {
            if mask & (1 << i) != 0 {
                data[out] = *lane;
                out += 1;
            }
        }
    }

    #[inline]
    fn ge(a: Self, b: Self) -> u64 {
        let mut mask = 0;
        for i in 0..N {
            mask |= ((a[i] >= b[i]) as u64) << i;
        }
        mask
    }

    #[inline]
    fn eq(a: Self, b: Self) -> u64 {
        let mut mask = 0;
        for i in 0..N {
            mask |= ((a[i] == b[i]) as u64) << i;
        }
        mask
    }

    #[inline]
    fn min(a: Self, b: Self) -> Self {
        let mut out = a;
        for (lane, other) in out.iter_mut().zip(b.iter()) {
            if *other < *lane {
                *lane = *other;
            }
        }
        out
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        let mut out = a;
        for (lane, other) in out.iter_mut().zip(b.iter()) {
            if *other > *lane {
                *lane = *other;
            }
        }
        out
    }

    #[inline]
    fn mask_not(mask: u64) -> u64 {
        !mask & ((1u64 << N) - 1)
    }

    #[inline]
    fn mask_popcount(mask: u64) -> usize {
        mask.count_ones() as usize
    }

    #[inline]
    fn mask_any(mask: u64) -> bool {
        mask != 0
    }

    #[inline]
    fn reducemin(v: Self) -> T {
        let mut out = v[0];
        for lane in &v[1..] {
            if *lane < out {
                out = *lane;
            }
        }
        out
    }

    #[inline]
    fn reducemax(v: Self) -> T {
        let mut out = v[0];
        for lane in &v[1..] {
            if *lane > out {
                out = *lane;
            }
        }
        out
    }

    #[inline]
    fn nan_mask(v: Self) -> u64 {
        let mut mask = 0;
        for (i, lane) in v.iter().enumerate() {
            mask |= (lane.is_nan() as u64) << i;
        }
        mask
    }

    #[inline]
    fn extract(v: Self, lane: usize) -> T {
        v[lane]
    }

    #[inline]
    fn sort_vec(mut v: Self) -> Self {
        for i in 1..N {
            let mut j = i;
            while j > 0 && v[j] < v[j - 1] {
                v.swap(j, j - 1);
                j -= 1;
            }
        }
        v
    }

    #[inline]
    fn bitonic_merge(v: Self) -> Self {
        Self::sort_vec(v)
    }

    #[inline]
    fn reverse(mut v: Self) -> Self {
        v.reverse();
        v
    }
}

macro_rules! portable_backend {
    ($ty:ident, $lanes:literal) => {
        paste! {
            pub fn [<portable_sort_ $ty>](data: &mut [$ty]) {
                driver::sort::<$ty, $lanes, [$ty; $lanes]>(data);
            }

            pub fn [<portable_select_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                driver::select::<$ty, $lanes, [$ty; $lanes]>(data, k, has_nan);
            }

            pub fn [<portable_partial_sort_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                driver::partial_sort::<$ty, $lanes, [$ty; $lanes]>(data, k, has_nan);
            }
        }
    };
}

portable_backend!(i16, 32);
portable_backend!(u16, 32);
portable_backend!(i32, 16);
portable_backend!(u32, 16);
portable_backend!(f32, 16);
portable_backend!(i64, 8);
portable_backend!(u64, 8);
portable_backend!(f64, 8);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    type I64x8 = [i64; 8];

    #[test]
    fn test_loadu_storeu() {
        let mut data = [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let reg = I64x8::loadu(&data);
        assert_eq!(reg, [1, 2, 3, 4, 5, 6, 7, 8]);
        I64x8::storeu(reg, &mut data[2..]);
        assert_eq!(data, [1, 2, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_partial_loadmask() {
        assert_eq!(I64x8::partial_loadmask(0), 0);
        assert_eq!(I64x8::partial_loadmask(3), 0b111);
        assert_eq!(I64x8::partial_loadmask(8), 0xFF);
        assert_eq!(<[u16; 32]>::partial_loadmask(32), 0xFFFF_FFFF);
    }

    #[test]
    fn test_mask_loadu_fills_with_max() {
        let data = [5i64, 6];
        let reg = I64x8::mask_loadu(0b11, &data);
        assert_eq!(reg[..2], [5, 6]);
        assert!(reg[2..].iter().all(|&x| x == i64::MAX));
    }

    #[test]
    fn test_mask_storeu() {
        let mut data = [0i64; 8];
        I64x8::mask_storeu([1, 2, 3, 4, 5, 6, 7, 8], 0b1010_0001, &mut data);
        assert_eq!(data, [1, 0, 0, 0, 0, 6, 0, 8]);
    }

    #[test]
    fn test_ge_and_eq() {
        let a = [1i64, 20, 3, 40, 5, 60, 7, 80];
        let b = [10i64, 2, 30, 40, 50, 6, 70, 80];
        assert_eq!(SimdVector::ge(a, b), 0b1010_1010);
        assert_eq!(SimdVector::eq(a, b), 0b1000_1000);
    }

    #[test]
    fn test_ge_is_false_on_nan_lanes() {
        let a = [f64::NAN; 8];
        let b = [0.0f64; 8];
        assert_eq!(SimdVector::ge(a, b), 0);
    }

    #[test]
    fn test_mask_not_is_bounded_to_lanes() {
        assert_eq!(I64x8::mask_not(0b1010_1010), 0b0101_0101);
        assert_eq!(<[u32; 16]>::mask_not(0), 0xFFFF);
    }

    #[test]
    fn test_compress_store() {
        let reg = [1i64, 2, 3, 4, 5, 6, 7, 8];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..64 {
            let mask: u64 = rng.gen_range(0..256);
            let mut data = [0i64; 8];
            I64x8::mask_compressstoreu(&mut data, mask, reg);
            let expected: Vec<i64> = (0..8usize)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| reg[i])
                .collect();
            assert_eq!(&data[..expected.len()], expected.as_slice());
        }
    }

    #[test]
    fn test_min_max_reduce() {
        let a = [5i64, 6, 3, 4, 1, 2, 9, 8];
        let b = [1i64, 7, 2, 9, 3, 0, 4, 8];
        assert_eq!(SimdVector::min(a, b), [1, 6, 2, 4, 1, 0, 4, 8]);
        assert_eq!(SimdVector::max(a, b), [5, 7, 3, 9, 3, 2, 9, 8]);
        assert_eq!(I64x8::reducemin(a), 1);
        assert_eq!(I64x8::reducemax(a), 9);
    }

    #[test]
    fn test_nan_mask() {
        let mut v = [0.0f32; 16];
        v[1] = f32::NAN;
        v[15] = f32::NAN;
        assert_eq!(<[f32; 16]>::nan_mask(v), (1 << 1) | (1 << 15));
        assert_eq!(<[i32; 16]>::nan_mask([7i32; 16]), 0);
    }

    #[test]
    fn test_sort_vec_and_reverse() {
        let v = [5i64, 1, 7, 3, 8, 2, 6, 4];
        assert_eq!(I64x8::sort_vec(v), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(
            I64x8::reverse([1, 2, 3, 4, 5, 6, 7, 8]),
            [8, 7, 6, 5, 4, 3, 2, 1]
        );
        assert_eq!(I64x8::extract(v, 2), 7);
    }

    #[test]
    fn test_bitonic_merge_sorts_bitonic_input() {
        let v = [1i64, 3, 5, 7, 8, 6, 4, 2];
        assert_eq!(I64x8::bitonic_merge(v), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    macro_rules! test_sort_e2e {
        ($ty:ident, $lanes:literal) => {
            paste! {
                #[test]
                fn [<test_sort_e2e_ $ty>]() {
                    let mut rng = StdRng::seed_from_u64(13);
                    for &len in &[0usize, 1, 2, $lanes - 1, $lanes, $lanes + 1, 100, 1000] {
                        let mut data: Vec<$ty> = (0..len).map(|_| rng.gen()).collect();
                        let mut expected = data.clone();
                        expected.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
                        [<portable_sort_ $ty>](&mut data);
                        assert_eq!(data, expected, "len {}", len);
                    }
                }
            }
        };
    }

    test_sort_e2e!(i16, 32);
    test_sort_e2e!(u16, 32);
    test_sort_e2e!(i32, 16);
    test_sort_e2e!(u32, 16);
    test_sort_e2e!(f32, 16);
    test_sort_e2e!(i64, 8);
    test_sort_e2e!(u64, 8);
    test_sort_e2e!(f64, 8);
}
