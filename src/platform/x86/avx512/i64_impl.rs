use core::slice;
use std::{
    arch::x86_64::{
        __m512i, __mmask8, _mm512_castpd_si512, _mm512_castsi512_pd, _mm512_cmp_epi64_mask,
        _mm512_loadu_si512, _mm512_mask_compressstoreu_epi64, _mm512_mask_loadu_epi64,
        _mm512_mask_mov_epi64, _mm512_mask_storeu_epi64, _mm512_max_epi64, _mm512_min_epi64,
        _mm512_reduce_max_epi64, _mm512_reduce_min_epi64, _mm512_set1_epi64, _mm512_shuffle_pd,
        _mm512_storeu_si512, _MM_CMPINT_EQ, _MM_CMPINT_NLT, _MM_PERM_ENUM,
    },
    mem,
};

use super::{
    network64bit1_idx, network64bit2_idx, network64bit3_idx, network64bit4_idx, permutexvar_m512,
    SHUFFLE1_1_1_1, SWIZZLE2_0XAA_MASK, SWIZZLE2_0XCC_MASK, SWIZZLE2_0XF0_MASK,
};
use crate::SimdVector;

fn shuffle_m512<const MASK: _MM_PERM_ENUM>(zmm: __m512i) -> __m512i {
    unsafe {
        let temp = _mm512_castsi512_pd(zmm);
        _mm512_castpd_si512(_mm512_shuffle_pd::<MASK>(temp, temp))
    }
}

fn cmp_merge(in1: __m512i, in2: __m512i, mask: __mmask8) -> __m512i {
    unsafe {
        let min_values = _mm512_min_epi64(in2, in1);
        let max_values = _mm512_max_epi64(in2, in1);
        _mm512_mask_mov_epi64(min_values, mask, max_values) // 0 -> min, 1 -> max
    }
}

impl SimdVector<i64, 8> for __m512i {
    type OpMask = __mmask8;

    const UNROLL: usize = 8;

    fn set1(value: i64) -> Self {
        unsafe { _mm512_set1_epi64(value) }
    }

    fn loadu(data: &[i64]) -> Self {
        unsafe { _mm512_loadu_si512(mem::transmute(data.as_ptr())) }
    }

    fn storeu(v: Self, data: &mut [i64]) {
        unsafe { _mm512_storeu_si512(mem::transmute(data.as_mut_ptr()), v) }
    }

    fn partial_loadmask(n: usize) -> __mmask8 {
        debug_assert!(n <= 8);
        ((1u16 << n) - 1) as __mmask8
    }

    fn mask_loadu(mask: __mmask8, data: &[i64]) -> Self {
        unsafe {
            let max_zmm = _mm512_set1_epi64(i64::MAX);
            _mm512_mask_loadu_epi64(max_zmm, mask, mem::transmute(data.as_ptr()))
        }
    }

    fn mask_storeu(v: Self, mask: __mmask8, data: &mut [i64]) {
        unsafe { _mm512_mask_storeu_epi64(mem::transmute(data.as_mut_ptr()), mask, v) }
    }

    fn mask_compressstoreu(data: &mut [i64], mask: __mmask8, v: Self) {
        unsafe { _mm512_mask_compressstoreu_epi64(mem::transmute(data.as_mut_ptr()), mask, v) }
    }

    fn ge(a: Self, b: Self) -> __mmask8 {
        unsafe { _mm512_cmp_epi64_mask::<_MM_CMPINT_NLT>(a, b) }
    }

    fn eq(a: Self, b: Self) -> __mmask8 {
        unsafe { _mm512_cmp_epi64_mask::<_MM_CMPINT_EQ>(a, b) }
    }

    fn min(a: Self, b: Self) -> Self {
        unsafe { _mm512_min_epi64(a, b) }
    }

    fn max(a: Self, b: Self) -> Self {
        unsafe { _mm512_max_epi64(a, b) }
    }

    fn mask_not(mask: __mmask8) -> __mmask8 {
        !mask
    }

    fn mask_popcount(mask: __mmask8) -> usize {
        mask.count_ones() as usize
    }

    fn mask_any(mask: __mmask8) -> bool {
        mask != 0
    }

    fn reducemin(v: Self) -> i64 {
        unsafe { _mm512_reduce_min_epi64(v) }
    }

    fn reducemax(v: Self) -> i64 {
        unsafe { _mm512_reduce_max_epi64(v) }
    }

    fn nan_mask(_v: Self) -> __mmask8 {
        0
    }

    fn extract(v: Self, lane: usize) -> i64 {
        unsafe { slice::from_raw_parts(mem::transmute(&v), 8)[lane] }
    }

    fn sort_vec(v: Self) -> Self {
        let mut zmm = v;
        zmm = cmp_merge(zmm, shuffle_m512::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512(network64bit1_idx(), zmm), SWIZZLE2_0XCC_MASK);
        zmm = cmp_merge(zmm, shuffle_m512::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512(network64bit2_idx(), zmm), SWIZZLE2_0XF0_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512(network64bit3_idx(), zmm), SWIZZLE2_0XCC_MASK);
        zmm = cmp_merge(zmm, shuffle_m512::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm
    }

    fn bitonic_merge(v: Self) -> Self {
        // 1) half_cleaner[8]: compare 0-4, 1-5, 2-6, 3-7
        let mut zmm = cmp_merge(v, permutexvar_m512(network64bit4_idx(), v), SWIZZLE2_0XF0_MASK);
        // 2) half_cleaner[4]
        zmm = cmp_merge(zmm, permutexvar_m512(network64bit3_idx(), zmm), SWIZZLE2_0XCC_MASK);
        // 3) half_cleaner[1]
        zmm = cmp_merge(zmm, shuffle_m512::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm
    }

    fn reverse(v: Self) -> Self {
        permutexvar_m512(network64bit2_idx(), v)
    }
}
