//! AVX-512 backend for 64-bit element types.
//!
//! One `SimdVector` implementation per element type on the 512-bit register
//! types, with the 8-lane bitonic network expressed through
//! `vpermq`/`vshufpd` lane permutations shared by the three impls.

pub(crate) mod f64_impl;
pub(crate) mod i64_impl;
pub(crate) mod u64_impl;

use std::arch::x86_64::{
    __m512i, __mmask8, _mm512_permutexvar_epi64, _mm512_set_epi64, _MM_PERM_ENUM,
};

use crate::driver;

const fn shuffle_mask(a: [_MM_PERM_ENUM; 4]) -> _MM_PERM_ENUM {
    (a[0] << 6) | (a[1] << 4) | (a[2] << 2) | a[3]
}

pub(crate) const SHUFFLE1_1_1_1: _MM_PERM_ENUM = shuffle_mask([1, 1, 1, 1]);

pub(crate) const SWIZZLE2_0XAA_MASK: __mmask8 = 0xAA;
pub(crate) const SWIZZLE2_0XCC_MASK: __mmask8 = 0xCC;
pub(crate) const SWIZZLE2_0XF0_MASK: __mmask8 = 0xF0;

//   ZMM                    7, 6, 5, 4, 3, 2, 1, 0
/// #define NETWORK_64BIT_1 4, 5, 6, 7, 0, 1, 2, 3
pub(crate) fn network64bit1_idx() -> __m512i {
    unsafe { _mm512_set_epi64(4, 5, 6, 7, 0, 1, 2, 3) }
}

//   ZMM                    7, 6, 5, 4, 3, 2, 1, 0
/// #define NETWORK_64BIT_2 0, 1, 2, 3, 4, 5, 6, 7
pub(crate) fn network64bit2_idx() -> __m512i {
    unsafe { _mm512_set_epi64(0, 1, 2, 3, 4, 5, 6, 7) }
}

//   ZMM                    7, 6, 5, 4, 3, 2, 1, 0
/// #define NETWORK_64BIT_3 5, 4, 7, 6, 1, 0, 3, 2
pub(crate) fn network64bit3_idx() -> __m512i {
    unsafe { _mm512_set_epi64(5, 4, 7, 6, 1, 0, 3, 2) }
}

//   ZMM                    7, 6, 5, 4, 3, 2, 1, 0
/// #define NETWORK_64BIT_4 3, 2, 1, 0, 7, 6, 5, 4
pub(crate) fn network64bit4_idx() -> __m512i {
    unsafe { _mm512_set_epi64(3, 2, 1, 0, 7, 6, 5, 4) }
}

pub(crate) fn permutexvar_m512(idx: __m512i, a: __m512i) -> __m512i {
    unsafe { _mm512_permutexvar_epi64(idx, a) }
}

pub fn avx512_sort_i64(data: &mut [i64]) {
    driver::sort::<i64, 8, __m512i>(data)
}

pub fn avx512_select_i64(data: &mut [i64], k: usize, has_nan: bool) {
    driver::select::<i64, 8, __m512i>(data, k, has_nan)
}

pub fn avx512_partial_sort_i64(data: &mut [i64], k: usize, has_nan: bool) {
    driver::partial_sort::<i64, 8, __m512i>(data, k, has_nan)
}

pub fn avx512_sort_u64(data: &mut [u64]) {
    driver::sort::<u64, 8, __m512i>(data)
}

pub fn avx512_select_u64(data: &mut [u64], k: usize, has_nan: bool) {
    driver::select::<u64, 8, __m512i>(data, k, has_nan)
}

pub fn avx512_partial_sort_u64(data: &mut [u64], k: usize, has_nan: bool) {
    driver::partial_sort::<u64, 8, __m512i>(data, k, has_nan)
}

pub fn avx512_sort_f64(data: &mut [f64]) {
    driver::sort::<f64, 8, std::arch::x86_64::__m512d>(data)
}

pub fn avx512_select_f64(data: &mut [f64], k: usize, has_nan: bool) {
    driver::select::<f64, 8, std::arch::x86_64::__m512d>(data, k, has_nan)
}

pub fn avx512_partial_sort_f64(data: &mut [f64], k: usize, has_nan: bool) {
    driver::partial_sort::<f64, 8, std::arch::x86_64::__m512d>(data, k, has_nan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimdVector;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_sort_vec_i64() {
        let data = [5i64, 1, 7, 3, 8, 2, 6, 4];
        let sorted = <__m512i as SimdVector<i64, 8>>::sort_vec(<__m512i as SimdVector<i64, 8>>::loadu(&data));
        let mut out = [0i64; 8];
        <__m512i as SimdVector<i64, 8>>::storeu(sorted, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_ge_mask_i64() {
        let a = <__m512i as SimdVector<i64, 8>>::loadu(&[1i64, 20, 3, 40, 5, 60, 7, 80]);
        let b = <__m512i as SimdVector<i64, 8>>::loadu(&[10i64, 2, 30, 40, 50, 6, 70, 80]);
        assert_eq!(<__m512i as SimdVector<i64, 8>>::ge(a, b), 0b1010_1010);
    }

    #[test]
    fn test_sort_e2e_i64() {
        let mut rng = StdRng::seed_from_u64(17);
        for &len in &[0usize, 1, 9, 128, 129, 1000, 10_000] {
            let mut data: Vec<i64> = (0..len).map(|_| rng.gen()).collect();
            let mut expected = data.clone();
            expected.sort_unstable();
            avx512_sort_i64(&mut data);
            assert_eq!(data, expected);
        }
    }

    #[test]
    fn test_sort_e2e_u64() {
        let mut rng = StdRng::seed_from_u64(18);
        for &len in &[0usize, 1, 9, 128, 129, 1000, 10_000] {
            let mut data: Vec<u64> = (0..len).map(|_| rng.gen()).collect();
            let mut expected = data.clone();
            expected.sort_unstable();
            avx512_sort_u64(&mut data);
            assert_eq!(data, expected);
        }
    }

    #[test]
    fn test_sort_e2e_f64_with_nans() {
        let mut rng = StdRng::seed_from_u64(19);
        for &len in &[9usize, 129, 1000] {
            let mut data: Vec<f64> = (0..len).map(|_| rng.gen::<f64>() - 0.5).collect();
            data[len / 2] = f64::NAN;
            data[len - 1] = f64::NAN;
            avx512_sort_f64(&mut data);
            assert!(data[..len - 2].windows(2).all(|w| w[0] <= w[1]));
            assert!(data[len - 2..].iter().all(|x| x.is_nan()));
        }
    }
}
