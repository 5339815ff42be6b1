//! Result type used throughout release-helper.
//!
//! Errors are reported through `color-eyre`, which gives colorized output,
//! context chains and optional backtraces. Add context as errors propagate
//! with `.wrap_err()`:
//!
//! ```rust,ignore
//! use color_eyre::eyre::WrapErr;
//! use crate::result::Result;
//!
//! async fn read_asset(path: &Path) -> Result<Vec<u8>> {
//!     let data = tokio::fs::read(path)
//!         .await
//!         .wrap_err_with(|| format!("failed to read {}", path.display()))?;
//!     Ok(data)
//! }
//! ```
//!
//! Typed failures from [`crate::error::ReleaseHelperError`] convert into the
//! report with `?` and can be recovered with `report.downcast_ref()`.

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout release-helper.
pub type Result<T> = EyreResult<T>;
