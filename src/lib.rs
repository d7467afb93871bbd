#![cfg_attr(
    feature = "nightly",
    feature(stdarch_x86_avx512, avx512_target_feature)
)]

//! Vectorized in-place sorting for slices of primitive numeric types.
//!
//! The partition kernel streams the slice through SIMD registers and splits
//! it around a pivot with mask-compress-stores; ranges small enough to fit a
//! handful of registers are finished by a bitonic sorting network. Floating
//! point slices are sorted with every NaN placed after every non-NaN value.

pub(crate) mod driver;
pub(crate) mod kernel;
pub(crate) mod nan;
pub(crate) mod network;
pub(crate) mod pivot;
pub mod platform;

use std::fmt::Debug;

use paste::paste;

/// Element types the sorters operate on.
///
/// `MAX_VALUE` and `MIN_VALUE` seed the running extrema of the partition
/// kernel and pad partial registers in the network sorter. For floats they
/// are the infinities, so padding sorts after any finite value.
pub trait Sortable: Copy + PartialOrd + Debug {
    const MAX_VALUE: Self;
    const MIN_VALUE: Self;
    const IS_FLOAT: bool;

    fn is_nan(self) -> bool;
    fn quiet_nan() -> Self;
}

macro_rules! int_sortable {
    ($($ty:ident),*) => {
        $(
            impl Sortable for $ty {
                const MAX_VALUE: Self = $ty::MAX;
                const MIN_VALUE: Self = $ty::MIN;
                const IS_FLOAT: bool = false;

                #[inline]
                fn is_nan(self) -> bool {
                    false
                }

                #[inline]
                fn quiet_nan() -> Self {
                    $ty::MAX
                }
            }
        )*
    };
}

int_sortable!(i16, u16, i32, u32, i64, u64);

macro_rules! float_sortable {
    ($($ty:ident),*) => {
        $(
            impl Sortable for $ty {
                const MAX_VALUE: Self = $ty::INFINITY;
                const MIN_VALUE: Self = $ty::NEG_INFINITY;
                const IS_FLOAT: bool = true;

                #[inline]
                fn is_nan(self) -> bool {
                    $ty::is_nan(self)
                }

                #[inline]
                fn quiet_nan() -> Self {
                    $ty::NAN
                }
            }
        )*
    };
}

float_sortable!(f32, f64);

/// One SIMD register of `N` lanes of `T`, as consumed by the partition
/// kernel, the network sorter and pivot selection.
///
/// Lane 0 of a register corresponds to the lowest address of a load or
/// store; masks carry one bit per lane with lane 0 in the least significant
/// bit.
pub trait SimdVector<T: Sortable, const N: usize>: Copy {
    type OpMask: Copy + PartialEq + Debug;

    /// Largest range handed to the bitonic network sorter.
    const NETWORK_SORT_THRESHOLD: usize = 16 * N;

    /// Batch width of the unrolled partition kernel, in registers. Must
    /// satisfy `2 * UNROLL * N <= NETWORK_SORT_THRESHOLD` so the two holdout
    /// batches of the unrolled kernel never alias.
    const UNROLL: usize;

    fn set1(value: T) -> Self;
    fn loadu(data: &[T]) -> Self;
    fn storeu(v: Self, data: &mut [T]);

    /// Mask selecting the low `n` lanes.
    fn partial_loadmask(n: usize) -> Self::OpMask;
    /// Load the selected lanes from `data`; unselected lanes hold
    /// `T::MAX_VALUE`.
    fn mask_loadu(mask: Self::OpMask, data: &[T]) -> Self;
    fn mask_storeu(v: Self, mask: Self::OpMask, data: &mut [T]);
    /// Pack the selected lanes of `v` to the front of `data`.
    fn mask_compressstoreu(data: &mut [T], mask: Self::OpMask, v: Self);

    fn ge(a: Self, b: Self) -> Self::OpMask;
    fn eq(a: Self, b: Self) -> Self::OpMask;
    fn min(a: Self, b: Self) -> Self;
    fn max(a: Self, b: Self) -> Self;

    fn mask_not(mask: Self::OpMask) -> Self::OpMask;
    fn mask_popcount(mask: Self::OpMask) -> usize;
    fn mask_any(mask: Self::OpMask) -> bool;

    fn reducemin(v: Self) -> T;
    fn reducemax(v: Self) -> T;

    /// Lanes holding a NaN; the empty mask for integer elements.
    fn nan_mask(v: Self) -> Self::OpMask;

    fn extract(v: Self, lane: usize) -> T;

    /// Sort the lanes of one register.
    fn sort_vec(v: Self) -> Self;
    /// Sort a register whose lanes form a bitonic sequence.
    fn bitonic_merge(v: Self) -> Self;
    fn reverse(v: Self) -> Self;
}

macro_rules! public_api {
    ($ty:ident) => {
        paste! {
            /// Sorts `data` in ascending order. NaNs sort after every
            /// non-NaN value.
            pub fn [<sort_ $ty>](data: &mut [$ty]) {
                platform::[<sort_ $ty>](data);
            }

            /// Places the `k`-th smallest element of `data` at index `k`,
            /// with smaller elements before it and greater or equal elements
            /// after it.
            ///
            /// `has_nan` indicates that `data` may contain NaNs (meaningful
            /// for float elements only); they are compacted to the tail and
            /// excluded from the selection.
            pub fn [<select_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                platform::[<select_ $ty>](data, k, has_nan);
            }

            /// Sorts the `k` smallest elements of `data` into `data[..k]`;
            /// the order of the remainder is unspecified.
            ///
            /// `has_nan` is interpreted as for the selection operation.
            pub fn [<partial_sort_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                platform::[<partial_sort_ $ty>](data, k, has_nan);
            }
        }
    };
}

public_api!(i16);
public_api!(u16);
public_api!(i32);
public_api!(u32);
public_api!(i64);
public_api!(u64);
public_api!(f32);
public_api!(f64);

macro_rules! float_scan_api {
    ($ty:ident, $lanes:literal) => {
        paste! {
            /// Returns true if `data` contains a NaN.
            pub fn [<has_nan_ $ty>](data: &[$ty]) -> bool {
                nan::has_nan::<$ty, $lanes, [$ty; $lanes]>(data)
            }
        }
    };
}

float_scan_api!(f32, 16);
float_scan_api!(f64, 8);

/// Slice extension over all supported element types.
pub trait VexSort {
    /// See the per-type `sort_*` functions.
    fn vexsort(&mut self);
    /// See the per-type `select_*` functions.
    fn vexselect(&mut self, k: usize, has_nan: bool);
    /// See the per-type `partial_sort_*` functions.
    fn vexsort_partial(&mut self, k: usize, has_nan: bool);
}

macro_rules! impl_vexsort {
    ($($ty:ident),*) => {
        $(
            paste! {
                impl VexSort for [$ty] {
                    fn vexsort(&mut self) {
                        [<sort_ $ty>](self);
                    }

                    fn vexselect(&mut self, k: usize, has_nan: bool) {
                        [<select_ $ty>](self, k, has_nan);
                    }

                    fn vexsort_partial(&mut self, k: usize, has_nan: bool) {
                        [<partial_sort_ $ty>](self, k, has_nan);
                    }
                }
            }
        )*
    };
}

impl_vexsort!(i16, u16, i32, u32, i64, u64, f32, f64);
