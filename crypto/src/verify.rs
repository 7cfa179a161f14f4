// Copyright (C) Microsoft Corporation. All rights reserved.

//! Streaming verification contexts and the raw digest-verify operation.

use openssl::hash::Hasher;
use openssl::pkey_ctx::PkeyCtx;
use openssl::rsa::Padding;

use crate::AlgorithmId;
use crate::AlgorithmTag;
use crate::CryptoError;
use crate::HashKind;
use crate::PublicKey;
use crate::sign::Scheme;

/// Accumulator state for one streaming verification operation.
///
/// Mirrors [`crate::SignContext`]: data is digested incrementally and the
/// public-key operation happens once, in
/// [`end_with_signature`](Self::end_with_signature). A signature mismatch
/// is reported as [`CryptoError::BadSignature`] and nothing else, so
/// callers can tell the expected negative outcome apart from failures.
pub struct VerifyContext {
    key: PublicKey,
    scheme: Scheme,
    hasher: Option<Hasher>,
}

impl VerifyContext {
    /// Creates a verification context for a fixed (non-parametric)
    /// algorithm.
    pub fn new(tag: AlgorithmTag, key: &PublicKey) -> Result<Self, CryptoError> {
        let scheme = Scheme::from_tag(tag, key.is_rsa())?;
        let ctx = Self {
            key: key.clone(),
            scheme,
            hasher: None,
        };
        #[cfg(feature = "testhooks")]
        crate::counters::context_created();
        Ok(ctx)
    }

    /// Creates a verification context from a constructed algorithm
    /// identifier.
    ///
    /// # Safety
    ///
    /// `alg` and the parameter record it references must stay valid and
    /// unmoved for the whole lifetime of the returned context. In
    /// practice both are allocated from an [`crate::Arena`] owned by the
    /// same object that owns this context, with the context dropped
    /// first.
    #[allow(unsafe_code)]
    pub unsafe fn with_algorithm_id(
        alg: *const AlgorithmId,
        key: &PublicKey,
    ) -> Result<Self, CryptoError> {
        // SAFETY: forwarded caller contract.
        let scheme = unsafe { Scheme::from_algorithm_id(alg, key.is_rsa())? };
        let ctx = Self {
            key: key.clone(),
            scheme,
            hasher: None,
        };
        #[cfg(feature = "testhooks")]
        crate::counters::context_created();
        Ok(ctx)
    }

    /// Starts the operation with an empty accumulator.
    pub fn begin(&mut self) -> Result<(), CryptoError> {
        let hasher =
            Hasher::new(self.scheme.digest().message_digest()).map_err(|openssl_error_stack| {
                tracing::error!(?openssl_error_stack);
                CryptoError::DigestFailed
            })?;
        self.hasher = Some(hasher);
        Ok(())
    }

    /// Feeds data into the accumulator.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        let hasher = self.hasher.as_mut().ok_or(CryptoError::ContextNotStarted)?;
        hasher.update(data).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::DigestFailed
        })
    }

    /// Finishes the digest and checks the candidate signature.
    pub fn end_with_signature(&mut self, signature: &[u8]) -> Result<(), CryptoError> {
        let mut hasher = self.hasher.take().ok_or(CryptoError::ContextNotStarted)?;
        let digest = hasher.finish().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::DigestFailed
        })?;

        let mut ctx = PkeyCtx::new(self.key.pkey()).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::VerifyFailed
        })?;
        ctx.verify_init().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::VerifyFailed
        })?;
        self.scheme
            .configure(&mut ctx)
            .map_err(|openssl_error_stack| {
                tracing::error!(?openssl_error_stack);
                CryptoError::VerifyFailed
            })?;

        match ctx.verify(&digest, signature) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CryptoError::BadSignature),
            Err(openssl_error_stack) => {
                tracing::error!(?openssl_error_stack);
                Err(CryptoError::VerifyFailed)
            }
        }
    }
}

#[cfg(feature = "testhooks")]
impl Drop for VerifyContext {
    fn drop(&mut self) {
        crate::counters::context_dropped();
    }
}

/// Verifies a signature over an already-computed digest in a single
/// operation.
///
/// Counterpart of [`crate::sign_digest`]; the digest algorithm is
/// recovered from the digest length. A mismatch is reported as
/// [`CryptoError::BadSignature`].
pub fn verify_digest(
    key: &PublicKey,
    digest: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let hash = HashKind::from_digest_len(digest.len())?;

    let mut ctx = PkeyCtx::new(key.pkey()).map_err(|openssl_error_stack| {
        tracing::error!(?openssl_error_stack);
        CryptoError::VerifyFailed
    })?;
    ctx.verify_init().map_err(|openssl_error_stack| {
        tracing::error!(?openssl_error_stack);
        CryptoError::VerifyFailed
    })?;
    if key.is_rsa() {
        ctx.set_rsa_padding(Padding::PKCS1)
            .map_err(|openssl_error_stack| {
                tracing::error!(?openssl_error_stack);
                CryptoError::VerifyFailed
            })?;
    }
    ctx.set_signature_md(hash.md())
        .map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::VerifyFailed
        })?;

    match ctx.verify(digest, signature) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CryptoError::BadSignature),
        Err(openssl_error_stack) => {
            tracing::error!(?openssl_error_stack);
            Err(CryptoError::VerifyFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use openssl::hash::MessageDigest;
    use openssl::hash::hash;
    use test_log::test;

    use super::*;
    use crate::PrivateKey;
    use crate::sign::SignContext;
    use crate::sign_digest;

    #[test]
    fn streaming_round_trip_rsa() {
        let (private, public) = PrivateKey::generate_rsa(2048).unwrap();

        let mut sign = SignContext::new(AlgorithmTag::RsaSha256, &private).unwrap();
        sign.begin().unwrap();
        sign.update(b"hello ").unwrap();
        sign.update(b"world").unwrap();
        let signature = sign.end().unwrap();

        let mut verify = VerifyContext::new(AlgorithmTag::RsaSha256, &public).unwrap();
        verify.begin().unwrap();
        verify.update(b"hello world").unwrap();
        verify.end_with_signature(&signature).unwrap();
    }

    #[test]
    fn mismatch_is_bad_signature() {
        let (private, public) = PrivateKey::generate_rsa(2048).unwrap();

        let mut sign = SignContext::new(AlgorithmTag::RsaSha256, &private).unwrap();
        sign.begin().unwrap();
        sign.update(b"message").unwrap();
        let mut signature = sign.end().unwrap();
        signature[0] ^= 0x01;

        let mut verify = VerifyContext::new(AlgorithmTag::RsaSha256, &public).unwrap();
        verify.begin().unwrap();
        verify.update(b"message").unwrap();
        let result = verify.end_with_signature(&signature);
        assert_eq!(result.unwrap_err(), CryptoError::BadSignature);
    }

    #[test]
    fn raw_round_trip_matches_streaming() {
        let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
        let digest = hash(MessageDigest::sha256(), b"raw message").unwrap();

        let signature = sign_digest(&private, &digest).unwrap();
        verify_digest(&public, &digest, &signature).unwrap();

        // The raw signature carries the same encoding the streaming
        // verifier expects.
        let mut verify = VerifyContext::new(AlgorithmTag::RsaSha256, &public).unwrap();
        verify.begin().unwrap();
        verify.update(b"raw message").unwrap();
        verify.end_with_signature(&signature).unwrap();
    }
}
