pub mod dates;
pub mod error;
pub mod types;

#[cfg(feature = "fixed_asset")]
pub mod fixed_asset;

#[cfg(feature = "analytic")]
pub mod analytic;

pub use error::FixedAssetError;
pub use types::*;

/// Standard result type for all fixed-asset operations
pub type FixedAssetResult<T> = Result<T, FixedAssetError>;
