use core::slice;
use std::{
    arch::x86_64::{
        __m512d, __m512i, __mmask8, _mm512_cmp_pd_mask, _mm512_fpclass_pd_mask, _mm512_loadu_pd,
        _mm512_mask_compressstoreu_pd, _mm512_mask_loadu_pd, _mm512_mask_mov_pd,
        _mm512_mask_storeu_pd, _mm512_max_pd, _mm512_min_pd, _mm512_permutexvar_pd,
        _mm512_reduce_max_pd, _mm512_reduce_min_pd, _mm512_set1_pd, _mm512_shuffle_pd,
        _mm512_storeu_pd, _CMP_EQ_OQ, _CMP_GE_OQ, _MM_PERM_ENUM,
    },
    mem,
};

use super::{
    network64bit1_idx, network64bit2_idx, network64bit3_idx, network64bit4_idx, SHUFFLE1_1_1_1,
    SWIZZLE2_0XAA_MASK, SWIZZLE2_0XCC_MASK, SWIZZLE2_0XF0_MASK,
};
use crate::SimdVector;

fn permutexvar_m512d(idx: __m512i, a: __m512d) -> __m512d {
    unsafe { _mm512_permutexvar_pd(idx, a) }
}

fn shuffle_m512d<const MASK: _MM_PERM_ENUM>(zmm: __m512d) -> __m512d {
    unsafe { _mm512_shuffle_pd::<MASK>(zmm, zmm) }
}

fn cmp_merge(in1: __m512d, in2: __m512d, mask: __mmask8) -> __m512d {
    unsafe {
        let min_values = _mm512_min_pd(in2, in1);
        let max_values = _mm512_max_pd(in2, in1);
        _mm512_mask_mov_pd(min_values, mask, max_values) // 0 -> min, 1 -> max
    }
}

impl SimdVector<f64, 8> for __m512d {
    type OpMask = __mmask8;

    const UNROLL: usize = 8;

    fn set1(value: f64) -> Self {
        unsafe { _mm512_set1_pd(value) }
    }

    fn loadu(data: &[f64]) -> Self {
        unsafe { _mm512_loadu_pd(mem::transmute(data.as_ptr())) }
    }

    fn storeu(v: Self, data: &mut [f64]) {
        unsafe { _mm512_storeu_pd(mem::transmute(data.as_mut_ptr()), v) }
    }

    fn partial_loadmask(n: usize) -> __mmask8 {
        debug_assert!(n <= 8);
        ((1u16 << n) - 1) as __mmask8
    }

    fn mask_loadu(mask: __mmask8, data: &[f64]) -> Self {
        unsafe {
            let max_zmm = _mm512_set1_pd(f64::INFINITY);
            _mm512_mask_loadu_pd(max_zmm, mask, mem::transmute(data.as_ptr()))
        }
    }

    fn mask_storeu(v: Self, mask: __mmask8, data: &mut [f64]) {
        unsafe { _mm512_mask_storeu_pd(mem::transmute(data.as_mut_ptr()), mask, v) }
    }

    fn mask_compressstoreu(data: &mut [f64], mask: __mmask8, v: Self) {
        unsafe { _mm512_mask_compressstoreu_pd(mem::transmute(data.as_mut_ptr()), mask, v) }
    }

    fn ge(a: Self, b: Self) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask::<_CMP_GE_OQ>(a, b) }
    }

    fn eq(a: Self, b: Self) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask::<_CMP_EQ_OQ>(a, b) }
    }

    fn min(a: Self, b: Self) -> Self {
        unsafe { _mm512_min_pd(a, b) }
    }

    fn max(a: Self, b: Self) -> Self {
        unsafe { _mm512_max_pd(a, b) }
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

    fn reducemin(v: Self) -> f64 {
        unsafe { _mm512_reduce_min_pd(v) }
    }

    fn reducemax(v: Self) -> f64 {
        unsafe { _mm512_reduce_max_pd(v) }
    }

    fn nan_mask(v: Self) -> __mmask8 {
        // QNAN | SNAN lane classes
        unsafe { _mm512_fpclass_pd_mask::<{ 0x01 | 0x80 }>(v) }
    }

    fn extract(v: Self, lane: usize) -> f64 {
        unsafe { slice::from_raw_parts(mem::transmute(&v), 8)[lane] }
    }

    fn sort_vec(v: Self) -> Self {
        let mut zmm = v;
        zmm = cmp_merge(zmm, shuffle_m512d::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512d(network64bit1_idx(), zmm), SWIZZLE2_0XCC_MASK);
        zmm = cmp_merge(zmm, shuffle_m512d::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512d(network64bit2_idx(), zmm), SWIZZLE2_0XF0_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512d(network64bit3_idx(), zmm), SWIZZLE2_0XCC_MASK);
        zmm = cmp_merge(zmm, shuffle_m512d::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm
    }

    fn bitonic_merge(v: Self) -> Self {
        let mut zmm = cmp_merge(v, permutexvar_m512d(network64bit4_idx(), v), SWIZZLE2_0XF0_MASK);
        zmm = cmp_merge(zmm, permutexvar_m512d(network64bit3_idx(), zmm), SWIZZLE2_0XCC_MASK);
        zmm = cmp_merge(zmm, shuffle_m512d::<SHUFFLE1_1_1_1>(zmm), SWIZZLE2_0XAA_MASK);
        zmm
    }

    fn reverse(v: Self) -> Self {
        permutexvar_m512d(network64bit2_idx(), v)
    }
}
