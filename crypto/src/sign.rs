// Copyright (C) Microsoft Corporation. All rights reserved.

//! Streaming signing contexts and the raw digest-signing operation.

use openssl::error::ErrorStack;
use openssl::hash::Hasher;
use openssl::pkey_ctx::PkeyCtx;
use openssl::rsa::Padding;
use openssl::sign::RsaPssSaltlen;

use crate::AlgorithmId;
use crate::AlgorithmTag;
use crate::CryptoError;
use crate::HashKind;
use crate::PrivateKey;

/// Resolved signing scheme: padding, digest, and parameter source.
pub(crate) enum Scheme {
    Pkcs1 { hash: HashKind },
    Ecdsa { hash: HashKind },
    Pss { alg: *const AlgorithmId },
}

impl Scheme {
    pub(crate) fn from_tag(tag: AlgorithmTag, is_rsa: bool) -> Result<Self, CryptoError> {
        let scheme = match tag {
            AlgorithmTag::RsaSha1 => Scheme::Pkcs1 {
                hash: HashKind::Sha1,
            },
            AlgorithmTag::RsaSha256 => Scheme::Pkcs1 {
                hash: HashKind::Sha256,
            },
            AlgorithmTag::RsaSha384 => Scheme::Pkcs1 {
                hash: HashKind::Sha384,
            },
            AlgorithmTag::RsaSha512 => Scheme::Pkcs1 {
                hash: HashKind::Sha512,
            },
            AlgorithmTag::EcdsaSha256 => Scheme::Ecdsa {
                hash: HashKind::Sha256,
            },
            AlgorithmTag::EcdsaSha384 => Scheme::Ecdsa {
                hash: HashKind::Sha384,
            },
            AlgorithmTag::EcdsaSha512 => Scheme::Ecdsa {
                hash: HashKind::Sha512,
            },
            // PSS is parametric and must come in through an algorithm id.
            AlgorithmTag::RsaPss => return Err(CryptoError::UnsupportedAlgorithm),
        };
        match (&scheme, is_rsa) {
            (Scheme::Pkcs1 { .. }, false) => Err(CryptoError::KeyTypeMismatch),
            (Scheme::Ecdsa { .. }, true) => Err(CryptoError::KeyTypeMismatch),
            _ => Ok(scheme),
        }
    }

    /// Resolves a scheme from an arena-backed algorithm identifier.
    ///
    /// # Safety
    ///
    /// `alg` (and the parameter record it references) must stay valid and
    /// unmoved for the lifetime of the returned scheme.
    #[allow(unsafe_code)]
    pub(crate) unsafe fn from_algorithm_id(
        alg: *const AlgorithmId,
        is_rsa: bool,
    ) -> Result<Self, CryptoError> {
        if alg.is_null() {
            return Err(CryptoError::UnsupportedAlgorithm);
        }
        // SAFETY: non-null, valid per the caller's contract.
        let alg_ref = unsafe { &*alg };
        if alg_ref.tag != AlgorithmTag::RsaPss || alg_ref.pss.is_null() {
            return Err(CryptoError::UnsupportedAlgorithm);
        }
        if !is_rsa {
            return Err(CryptoError::KeyTypeMismatch);
        }
        Ok(Scheme::Pss { alg })
    }

    pub(crate) fn digest(&self) -> HashKind {
        match self {
            Scheme::Pkcs1 { hash } | Scheme::Ecdsa { hash } => *hash,
            #[allow(unsafe_code)]
            Scheme::Pss { alg } => {
                // SAFETY: validity guaranteed by the constructor contract.
                let params = unsafe { &*(**alg).pss };
                params.hash
            }
        }
    }

    /// Applies padding and digest settings to a key operation context.
    pub(crate) fn configure<T>(&self, ctx: &mut PkeyCtx<T>) -> Result<(), ErrorStack> {
        match self {
            Scheme::Pkcs1 { hash } => {
                ctx.set_rsa_padding(Padding::PKCS1)?;
                ctx.set_signature_md(hash.md())?;
            }
            Scheme::Ecdsa { hash } => {
                ctx.set_signature_md(hash.md())?;
            }
            #[allow(unsafe_code)]
            Scheme::Pss { alg } => {
                // SAFETY: validity guaranteed by the constructor contract.
                let params = unsafe { &*(**alg).pss };
                ctx.set_rsa_padding(Padding::PKCS1_PSS)?;
                ctx.set_signature_md(params.hash.md())?;
                ctx.set_rsa_pss_saltlen(RsaPssSaltlen::custom(params.salt_len as i32))?;
                ctx.set_rsa_mgf1_md(params.mgf_hash.md())?;
            }
        }
        Ok(())
    }
}

/// Accumulator state for one streaming signing operation.
///
/// Data fed through [`update`](Self::update) is digested incrementally;
/// the private-key operation happens once, in [`end`](Self::end).
pub struct SignContext {
    key: PrivateKey,
    scheme: Scheme,
    hasher: Option<Hasher>,
}

impl SignContext {
    /// Creates a signing context for a fixed (non-parametric) algorithm.
    pub fn new(tag: AlgorithmTag, key: &PrivateKey) -> Result<Self, CryptoError> {
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

    /// Creates a signing context from a constructed algorithm identifier.
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
        key: &PrivateKey,
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

    /// Finishes the digest and produces the signature.
    pub fn end(&mut self) -> Result<Vec<u8>, CryptoError> {
        let mut hasher = self.hasher.take().ok_or(CryptoError::ContextNotStarted)?;
        let digest = hasher.finish().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::DigestFailed
        })?;

        let mut ctx = PkeyCtx::new(self.key.pkey()).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::SignFailed
        })?;
        ctx.sign_init().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::SignFailed
        })?;
        self.scheme
            .configure(&mut ctx)
            .map_err(|openssl_error_stack| {
                tracing::error!(?openssl_error_stack);
                CryptoError::SignFailed
            })?;

        let buffer_len = ctx.sign(&digest, None).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::SignFailed
        })?;
        let mut signature = vec![0u8; buffer_len];
        let signature_len =
            ctx.sign(&digest, Some(&mut signature))
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::SignFailed
                })?;
        signature.truncate(signature_len);

        Ok(signature)
    }

    /// Upper bound on the signature size this context will produce.
    pub fn signature_len(&self) -> usize {
        self.key.signature_len()
    }
}

#[cfg(feature = "testhooks")]
impl Drop for SignContext {
    fn drop(&mut self) {
        crate::counters::context_dropped();
    }
}

/// Signs an already-computed digest in a single operation.
///
/// The digest algorithm is recovered from the digest length. RSA keys
/// sign with PKCS#1 v1.5 DigestInfo encoding, matching what the streaming
/// path produces; EC keys sign the digest directly with ECDSA.
pub fn sign_digest(key: &PrivateKey, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let hash = HashKind::from_digest_len(digest.len())?;

    let mut ctx = PkeyCtx::new(key.pkey()).map_err(|openssl_error_stack| {
        tracing::error!(?openssl_error_stack);
        CryptoError::SignFailed
    })?;
    ctx.sign_init().map_err(|openssl_error_stack| {
        tracing::error!(?openssl_error_stack);
        CryptoError::SignFailed
    })?;
    if key.is_rsa() {
        ctx.set_rsa_padding(Padding::PKCS1)
            .map_err(|openssl_error_stack| {
                tracing::error!(?openssl_error_stack);
                CryptoError::SignFailed
            })?;
    }
    ctx.set_signature_md(hash.md())
        .map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::SignFailed
        })?;

    let buffer_len = ctx.sign(digest, None).map_err(|openssl_error_stack| {
        tracing::error!(?openssl_error_stack);
        CryptoError::SignFailed
    })?;
    let mut signature = vec![0u8; buffer_len];
    let signature_len = ctx
        .sign(digest, Some(&mut signature))
        .map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::SignFailed
        })?;
    signature.truncate(signature_len);

    Ok(signature)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn update_before_begin_fails() {
        let (key, _) = PrivateKey::generate_rsa(2048).unwrap();
        let mut ctx = SignContext::new(AlgorithmTag::RsaSha256, &key).unwrap();
        assert_eq!(ctx.update(b"data"), Err(CryptoError::ContextNotStarted));
        assert_eq!(ctx.end().unwrap_err(), CryptoError::ContextNotStarted);
    }

    #[test]
    fn pss_tag_requires_algorithm_id() {
        let (key, _) = PrivateKey::generate_rsa(2048).unwrap();
        let result = SignContext::new(AlgorithmTag::RsaPss, &key);
        assert!(matches!(result, Err(CryptoError::UnsupportedAlgorithm)));
    }

    #[test]
    fn key_type_checked_against_tag() {
        let (rsa_key, _) = PrivateKey::generate_rsa(2048).unwrap();
        let (ec_key, _) = PrivateKey::generate_ec(crate::EcCurve::P256).unwrap();

        let result = SignContext::new(AlgorithmTag::EcdsaSha256, &rsa_key);
        assert!(matches!(result, Err(CryptoError::KeyTypeMismatch)));
        let result = SignContext::new(AlgorithmTag::RsaSha256, &ec_key);
        assert!(matches!(result, Err(CryptoError::KeyTypeMismatch)));
    }

    #[test]
    fn raw_sign_rejects_odd_digest_len() {
        let (key, _) = PrivateKey::generate_rsa(2048).unwrap();
        let result = sign_digest(&key, &[0u8; 31]);
        assert_eq!(result.unwrap_err(), CryptoError::UnsupportedDigestLength);
    }
}
