// Copyright (C) Microsoft Corporation. All rights reserved.

use openssl::hash::MessageDigest;
use openssl::md::Md;
use openssl::md::MdRef;

use crate::CryptoError;

/// Hash algorithms supported by the signing layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HashKind {
    /// SHA-1
    Sha1,

    /// SHA-256
    Sha256,

    /// SHA-384
    Sha384,

    /// SHA-512
    Sha512,
}

impl HashKind {
    /// Digest output length in bytes.
    pub fn len(&self) -> usize {
        match self {
            HashKind::Sha1 => 20,
            HashKind::Sha256 => 32,
            HashKind::Sha384 => 48,
            HashKind::Sha512 => 64,
        }
    }

    /// Recovers the hash kind from a digest length.
    ///
    /// The supported hashes all have distinct output lengths, so a
    /// pre-computed digest identifies its hash unambiguously. Used by the
    /// raw (single-shot) operations, which receive only the digest bytes.
    pub fn from_digest_len(len: usize) -> Result<Self, CryptoError> {
        match len {
            20 => Ok(HashKind::Sha1),
            32 => Ok(HashKind::Sha256),
            48 => Ok(HashKind::Sha384),
            64 => Ok(HashKind::Sha512),
            _ => Err(CryptoError::UnsupportedDigestLength),
        }
    }

    pub(crate) fn md(&self) -> &'static MdRef {
        match self {
            HashKind::Sha1 => Md::sha1(),
            HashKind::Sha256 => Md::sha256(),
            HashKind::Sha384 => Md::sha384(),
            HashKind::Sha512 => Md::sha512(),
        }
    }

    pub(crate) fn message_digest(&self) -> MessageDigest {
        match self {
            HashKind::Sha1 => MessageDigest::sha1(),
            HashKind::Sha256 => MessageDigest::sha256(),
            HashKind::Sha384 => MessageDigest::sha384(),
            HashKind::Sha512 => MessageDigest::sha512(),
        }
    }
}

/// Signature algorithm tags accepted at context creation.
///
/// A tag fixes both the public-key operation and the digest, except for
/// [`AlgorithmTag::RsaPss`], which is parametric and must be constructed
/// through an [`crate::AlgorithmId`] carrying synthesized parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AlgorithmTag {
    /// RSA PKCS#1 v1.5 with SHA-1
    RsaSha1,

    /// RSA PKCS#1 v1.5 with SHA-256
    RsaSha256,

    /// RSA PKCS#1 v1.5 with SHA-384
    RsaSha384,

    /// RSA PKCS#1 v1.5 with SHA-512
    RsaSha512,

    /// ECDSA with SHA-256
    EcdsaSha256,

    /// ECDSA with SHA-384
    EcdsaSha384,

    /// ECDSA with SHA-512
    EcdsaSha512,

    /// RSA-PSS; parametric, requires an algorithm identifier
    RsaPss,
}

/// Elliptic curves supported for key generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EcCurve {
    /// NIST P-256
    P256,

    /// NIST P-384
    P384,

    /// NIST P-521
    P521,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_len_round_trip() {
        for kind in [
            HashKind::Sha1,
            HashKind::Sha256,
            HashKind::Sha384,
            HashKind::Sha512,
        ] {
            assert_eq!(HashKind::from_digest_len(kind.len()), Ok(kind));
        }
        assert_eq!(
            HashKind::from_digest_len(33),
            Err(CryptoError::UnsupportedDigestLength)
        );
    }
}
