#[cfg(all(
    feature = "nightly",
    target_feature = "avx512f",
    target_feature = "avx512dq"
))]
pub mod avx512;
