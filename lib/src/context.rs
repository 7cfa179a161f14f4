// Copyright (C) Microsoft Corporation. All rights reserved.

//! Signature context lifecycle.
//!
//! The factory methods here implement the created/begun/adopted state
//! machine: a native context is created (for RSA-PSS, from a freshly
//! built algorithm identifier), started, and only then wrapped into a
//! [`SigContext`] the caller can hold. Every path that fails before the
//! wrap destroys whatever native state was already allocated; ownership
//! moves are by value, so a half-constructed context is never observable.

use signet_crypto::Arena;
use signet_crypto::CryptoError;
use signet_crypto::PrivateKey;
use signet_crypto::PublicKey;
use signet_crypto::SignContext;
use signet_crypto::VerifyContext;

use crate::SigError;
use crate::SignatureAlgorithm;
use crate::SignatureConfig;
use crate::error::SigErrorMapper;
use crate::pss::build_pss_algorithm_id;

/// Which operation a context was created for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigContextKind {
    /// Signing context.
    Sign,

    /// Verification context.
    Verify,
}

enum Inner {
    Sign(SignContext),
    Verify(VerifyContext),
}

/// An owned, begun signature context.
///
/// Holds exactly one native context and, for RSA-PSS, the arena backing
/// the algorithm-identifier structures the native context references.
/// The context field precedes the arena so that drop order tears the
/// context down before the storage it points into.
///
/// A `SigContext` is destroyed exactly once: the finalize methods consume
/// it, and dropping it releases the native resources through the same
/// ownership. It is not synchronized; callers serialize access to a given
/// context externally.
pub struct SigContext {
    inner: Inner,
    #[allow(dead_code)]
    arena: Option<Arena>,
}

impl SigContext {
    /// Creates and begins a signing context.
    ///
    /// For RSA-PSS, a parameter arena is allocated, a full algorithm
    /// identifier is constructed in it, and the arena moves into the
    /// returned context so the identifier outlives the native state that
    /// references it.
    pub fn sign(config: SignatureConfig, key: &PrivateKey) -> Result<Self, SigError> {
        // The arena binding precedes the context so that every path,
        // including early error returns, drops the context first.
        let (arena, mut ctx) = match config.algorithm {
            SignatureAlgorithm::RsaPss => {
                let mut arena = Arena::new();
                let alg = build_pss_algorithm_id(&mut arena, config.digest, key)?;
                // SAFETY: `alg` is backed by `arena`, which moves into
                // the SigContext below and outlives the native context.
                #[allow(unsafe_code)]
                let ctx = unsafe { SignContext::with_algorithm_id(alg, key) }
                    .map_sig_err(SigError::ContextUnavailable)?;
                (Some(arena), ctx)
            }
            algorithm => {
                let ctx = SignContext::new(algorithm.into(), key)
                    .map_sig_err(SigError::ContextUnavailable)?;
                (None, ctx)
            }
        };

        // A begin failure drops the fresh context and arena right here;
        // nothing escapes to the caller.
        ctx.begin().map_sig_err(SigError::ContextUnavailable)?;

        Ok(Self {
            inner: Inner::Sign(ctx),
            arena,
        })
    }

    /// Creates and begins a verification context.
    ///
    /// RSA-PSS parameter synthesis requires a private key, so a
    /// placeholder RSA key matching the public key's bit strength is
    /// generated purely to drive parameter construction and dropped
    /// before this method returns. It plays no part in the verification
    /// itself.
    pub fn verify(config: SignatureConfig, key: &PublicKey) -> Result<Self, SigError> {
        let (arena, mut ctx) = match config.algorithm {
            SignatureAlgorithm::RsaPss => {
                let placeholder = PrivateKey::placeholder_rsa(key.strength_in_bits())
                    .map_sig_err(SigError::ContextUnavailable)?;
                let mut arena = Arena::new();
                let alg = build_pss_algorithm_id(&mut arena, config.digest, &placeholder)?;
                // SAFETY: `alg` is backed by `arena`, which moves into
                // the SigContext below and outlives the native context.
                #[allow(unsafe_code)]
                let ctx = unsafe { VerifyContext::with_algorithm_id(alg, key) }
                    .map_sig_err(SigError::ContextUnavailable)?;
                (Some(arena), ctx)
            }
            algorithm => {
                let ctx = VerifyContext::new(algorithm.into(), key)
                    .map_sig_err(SigError::ContextUnavailable)?;
                (None, ctx)
            }
        };

        ctx.begin().map_sig_err(SigError::ContextUnavailable)?;

        Ok(Self {
            inner: Inner::Verify(ctx),
            arena,
        })
    }

    /// The operation this context was created for.
    pub fn kind(&self) -> SigContextKind {
        match &self.inner {
            Inner::Sign(_) => SigContextKind::Sign,
            Inner::Verify(_) => SigContextKind::Verify,
        }
    }

    /// Feeds data into the context's accumulator.
    pub fn update(&mut self, data: &[u8]) -> Result<(), SigError> {
        match &mut self.inner {
            Inner::Sign(ctx) => ctx.update(data).map_sig_err(SigError::UpdateFailed),
            Inner::Verify(ctx) => ctx.update(data).map_sig_err(SigError::UpdateFailed),
        }
    }

    /// Upper bound on the signature size a signing context will produce.
    ///
    /// Lets a caller size its output buffer before committing to the
    /// finalize call that consumes the context.
    pub fn signature_len(&self) -> Result<usize, SigError> {
        match &self.inner {
            Inner::Sign(ctx) => Ok(ctx.signature_len()),
            Inner::Verify(_) => Err(SigError::WrongContextKind),
        }
    }

    /// Finalizes a signing context, producing the signature bytes.
    ///
    /// Consumes the context; the native state and any parameter arena are
    /// destroyed before this returns, whether or not the operation
    /// succeeded.
    pub fn finalize_sign(mut self) -> Result<Vec<u8>, SigError> {
        match &mut self.inner {
            Inner::Sign(ctx) => ctx.end().map_sig_err(SigError::SignFailed),
            Inner::Verify(_) => Err(SigError::WrongContextKind),
        }
    }

    /// Finalizes a verification context against a candidate signature.
    ///
    /// Consumes the context. A signature mismatch is a normal outcome,
    /// `Ok(false)`; only failures unrelated to the comparison surface as
    /// errors.
    pub fn finalize_verify(mut self, signature: &[u8]) -> Result<bool, SigError> {
        match &mut self.inner {
            Inner::Sign(_) => Err(SigError::WrongContextKind),
            Inner::Verify(ctx) => match ctx.end_with_signature(signature) {
                Ok(()) => Ok(true),
                Err(CryptoError::BadSignature) => Ok(false),
                Err(source) => {
                    tracing::error!(?source, "verification operation failed");
                    Err(SigError::VerifyFailed)
                }
            },
        }
    }
}
