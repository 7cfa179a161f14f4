// Copyright (C) Microsoft Corporation. All rights reserved.

use thiserror::Error;

/// Errors reported by the native crypto layer.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature did not match the accumulated data.
    ///
    /// This is the one failure callers are expected to treat as a normal
    /// outcome rather than an error; every verification path reports a
    /// mismatch through this variant and nothing else.
    #[error("bad signature")]
    BadSignature,

    /// Algorithm tag is not usable through this entry point.
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,

    /// Digest length does not correspond to any supported hash.
    #[error("unsupported digest length")]
    UnsupportedDigestLength,

    /// Key type does not match the requested algorithm.
    #[error("key type mismatch")]
    KeyTypeMismatch,

    /// Context was used before `begin`.
    #[error("context not started")]
    ContextNotStarted,

    /// Digest accumulator operation failed.
    #[error("digest operation failed")]
    DigestFailed,

    /// Signing operation failed.
    #[error("sign operation failed")]
    SignFailed,

    /// Verification failed for a reason other than a signature mismatch.
    #[error("verify operation failed")]
    VerifyFailed,

    /// RSA-PSS parameter synthesis failed.
    #[error("parameter synthesis failed")]
    ParamSynthesisFailed,

    /// Key generation failed.
    #[error("key generate failed")]
    KeyGenerateFailed,

    /// DER decoding failed.
    #[error("key decode failed")]
    KeyDecodeFailed,

    /// DER encoding failed.
    #[error("key encode failed")]
    KeyEncodeFailed,
}
