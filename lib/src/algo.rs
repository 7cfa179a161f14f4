// Copyright (C) Microsoft Corporation. All rights reserved.

//! Algorithm configuration.

use signet_crypto::AlgorithmTag;
use signet_crypto::EcCurve;
use signet_crypto::HashKind;

use crate::SigError;

/// Signature algorithms accepted at context creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
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

    /// RSA-PSS; the digest comes from the separate digest setting, or
    /// from the native library's key-size default when none is set
    RsaPss,
}

/// Digest algorithms a caller may configure alongside RSA-PSS.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-1
    Sha1,

    /// SHA-256
    Sha256,

    /// SHA-384
    Sha384,

    /// SHA-512
    Sha512,
}

/// Read-only configuration snapshot taken at context creation.
///
/// A context is built from the values captured here; changing the
/// caller's configuration afterwards has no effect on contexts that
/// already exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignatureConfig {
    /// The signature algorithm.
    pub algorithm: SignatureAlgorithm,

    /// Optional digest algorithm. Absence is not an error; parametric
    /// algorithms fall back to the native library's default selection.
    pub digest: Option<DigestAlgorithm>,
}

impl TryFrom<u32> for SignatureAlgorithm {
    type Error = SigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SignatureAlgorithm::RsaSha1),
            2 => Ok(SignatureAlgorithm::RsaSha256),
            3 => Ok(SignatureAlgorithm::RsaSha384),
            4 => Ok(SignatureAlgorithm::RsaSha512),
            5 => Ok(SignatureAlgorithm::EcdsaSha256),
            6 => Ok(SignatureAlgorithm::EcdsaSha384),
            7 => Ok(SignatureAlgorithm::EcdsaSha512),
            8 => Ok(SignatureAlgorithm::RsaPss),
            _ => Err(SigError::InvalidArgument),
        }
    }
}

impl TryFrom<u32> for DigestAlgorithm {
    type Error = SigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DigestAlgorithm::Sha1),
            2 => Ok(DigestAlgorithm::Sha256),
            3 => Ok(DigestAlgorithm::Sha384),
            4 => Ok(DigestAlgorithm::Sha512),
            _ => Err(SigError::InvalidArgument),
        }
    }
}

/// Elliptic curves accepted by key generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EccCurve {
    /// NIST P-256
    P256,

    /// NIST P-384
    P384,

    /// NIST P-521
    P521,
}

impl TryFrom<u32> for EccCurve {
    type Error = SigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EccCurve::P256),
            2 => Ok(EccCurve::P384),
            3 => Ok(EccCurve::P521),
            _ => Err(SigError::InvalidArgument),
        }
    }
}

impl From<SignatureAlgorithm> for AlgorithmTag {
    fn from(alg: SignatureAlgorithm) -> Self {
        match alg {
            SignatureAlgorithm::RsaSha1 => AlgorithmTag::RsaSha1,
            SignatureAlgorithm::RsaSha256 => AlgorithmTag::RsaSha256,
            SignatureAlgorithm::RsaSha384 => AlgorithmTag::RsaSha384,
            SignatureAlgorithm::RsaSha512 => AlgorithmTag::RsaSha512,
            SignatureAlgorithm::EcdsaSha256 => AlgorithmTag::EcdsaSha256,
            SignatureAlgorithm::EcdsaSha384 => AlgorithmTag::EcdsaSha384,
            SignatureAlgorithm::EcdsaSha512 => AlgorithmTag::EcdsaSha512,
            SignatureAlgorithm::RsaPss => AlgorithmTag::RsaPss,
        }
    }
}

impl From<DigestAlgorithm> for HashKind {
    fn from(digest: DigestAlgorithm) -> Self {
        match digest {
            DigestAlgorithm::Sha1 => HashKind::Sha1,
            DigestAlgorithm::Sha256 => HashKind::Sha256,
            DigestAlgorithm::Sha384 => HashKind::Sha384,
            DigestAlgorithm::Sha512 => HashKind::Sha512,
        }
    }
}

impl From<EccCurve> for EcCurve {
    fn from(curve: EccCurve) -> Self {
        match curve {
            EccCurve::P256 => EcCurve::P256,
            EccCurve::P384 => EcCurve::P384,
            EccCurve::P521 => EcCurve::P521,
        }
    }
}
