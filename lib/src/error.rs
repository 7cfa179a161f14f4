// Copyright (C) Microsoft Corporation. All rights reserved.

use std::fmt::Debug;

use thiserror::Error;

/// Signet bridge error.
///
/// A signature that fails to verify is not represented here: verification
/// outcomes are booleans, and this type only carries genuine failures.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum SigError {
    /// Allocation failed.
    #[error("out of memory")]
    OutOfMemory,

    /// Key handle is stale, absent, or of the wrong type.
    #[error("key unavailable")]
    KeyUnavailable,

    /// Native context creation or startup failed.
    #[error("unable to create signature context")]
    ContextUnavailable,

    /// RSA-PSS parameter construction failed.
    #[error("unable to create signature algorithm parameters")]
    PssParamsFailed,

    /// Feeding data into the context failed.
    #[error("update failed")]
    UpdateFailed,

    /// The signing operation failed.
    #[error("signing operation failed")]
    SignFailed,

    /// Verification failed for a reason other than a signature mismatch.
    #[error("failed to complete verification operation")]
    VerifyFailed,

    /// Offset/length pair does not fit the supplied buffer.
    #[error("index out of bounds")]
    IndexOutOfBounds,

    /// Operation does not match the context kind.
    #[error("context kind mismatch")]
    WrongContextKind,

    /// The context behind this proxy has already been released.
    #[error("context already released")]
    ContextReleased,

    /// Handle does not refer to a live object.
    #[error("invalid handle")]
    InvalidHandle,

    /// Argument failed validation.
    #[error("invalid argument")]
    InvalidArgument,

    /// Caller-provided output buffer is too small.
    #[error("buffer too small")]
    BufferTooSmall,
}

pub(crate) trait SigErrorMapper<T, E> {
    /// Maps a lower-layer error to a bridge error, logging the original.
    fn map_sig_err(self, err: SigError) -> Result<T, SigError>;
}

impl<T, E: Debug> SigErrorMapper<T, E> for Result<T, E> {
    fn map_sig_err(self, err: SigError) -> Result<T, SigError> {
        match self {
            Ok(t) => Ok(t),
            Err(source) => {
                tracing::error!("mapping error {:?} to bridge error {:?}", source, err);
                Err(err)
            }
        }
    }
}
