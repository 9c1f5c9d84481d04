use thiserror::Error;

use crate::TrackingScope;

/// Errors that can occur when configuring the tracking registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The process-wide tracking scope was already fixed, either by an
    /// earlier [`set_tracking_scope`][crate::set_tracking_scope] call or by
    /// the first tracking operation reading it.
    #[error("tracking scope is already fixed to {current:?} and can no longer be changed")]
    ScopeAlreadyFixed {
        /// The scope the process is fixed to.
        current: TrackingScope,
    },
}

/// A specialized `Result` type for tracking configuration operations,
/// returning the crate's [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
