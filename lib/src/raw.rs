// Copyright (C) Microsoft Corporation. All rights reserved.

//! Single-shot operations over pre-computed digests.
//!
//! These bypass the streaming context entirely: no lifecycle, no proxy,
//! no accumulator. The caller has already digested its message; the
//! digest algorithm is recovered from the digest length.

use signet_crypto::CryptoError;
use signet_crypto::PrivateKey;
use signet_crypto::PublicKey;

use crate::SigError;

/// Signs an already-computed digest.
pub fn raw_sign(key: &PrivateKey, digest: &[u8]) -> Result<Vec<u8>, SigError> {
    match signet_crypto::sign_digest(key, digest) {
        Ok(signature) => Ok(signature),
        Err(CryptoError::UnsupportedDigestLength) => Err(SigError::InvalidArgument),
        Err(source) => {
            tracing::error!(?source, "raw signing operation failed");
            Err(SigError::SignFailed)
        }
    }
}

/// Verifies a signature over an already-computed digest.
///
/// Shares the mismatch rule with
/// [`SigContext::finalize_verify`](crate::SigContext::finalize_verify):
/// a bad signature is `Ok(false)`, not an error.
pub fn raw_verify(key: &PublicKey, digest: &[u8], signature: &[u8]) -> Result<bool, SigError> {
    match signet_crypto::verify_digest(key, digest, signature) {
        Ok(()) => Ok(true),
        Err(CryptoError::BadSignature) => Ok(false),
        Err(CryptoError::UnsupportedDigestLength) => Err(SigError::InvalidArgument),
        Err(source) => {
            tracing::error!(?source, "raw verification operation failed");
            Err(SigError::VerifyFailed)
        }
    }
}
