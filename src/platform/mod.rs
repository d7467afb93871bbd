//! Backend selection.
//!
//! The portable backend is always available; hardware backends are chosen at
//! compile time when the target supports them. 64-bit element types route to
//! the AVX-512 backend when it is compiled in.

pub mod portable;

#[cfg(target_arch = "x86_64")]
pub mod x86;

use paste::paste;

#[cfg(all(
    target_arch = "x86_64",
    feature = "nightly",
    target_feature = "avx512f",
    target_feature = "avx512dq"
))]
macro_rules! dispatch_64bit {
    ($ty:ident) => {
        paste! {
            pub(crate) fn [<sort_ $ty>](data: &mut [$ty]) {
                x86::avx512::[<avx512_sort_ $ty>](data)
            }

            pub(crate) fn [<select_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                x86::avx512::[<avx512_select_ $ty>](data, k, has_nan)
            }

            pub(crate) fn [<partial_sort_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                x86::avx512::[<avx512_partial_sort_ $ty>](data, k, has_nan)
            }
        }
    };
}

#[cfg(not(all(
    target_arch = "x86_64",
    feature = "nightly",
    target_feature = "avx512f",
    target_feature = "avx512dq"
)))]
macro_rules! dispatch_64bit {
    ($ty:ident) => {
        dispatch_portable!($ty);
    };
}

macro_rules! dispatch_portable {
    ($ty:ident) => {
        paste! {
            pub(crate) fn [<sort_ $ty>](data: &mut [$ty]) {
                portable::[<portable_sort_ $ty>](data)
            }

            pub(crate) fn [<select_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                portable::[<portable_select_ $ty>](data, k, has_nan)
            }

            pub(crate) fn [<partial_sort_ $ty>](data: &mut [$ty], k: usize, has_nan: bool) {
                portable::[<portable_partial_sort_ $ty>](data, k, has_nan)
            }
        }
    };
}

dispatch_portable!(i16);
dispatch_portable!(u16);
dispatch_portable!(i32);
dispatch_portable!(u32);
dispatch_portable!(f32);
dispatch_64bit!(i64);
dispatch_64bit!(u64);
dispatch_64bit!(f64);
