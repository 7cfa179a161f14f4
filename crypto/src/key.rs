// Copyright (C) Microsoft Corporation. All rights reserved.

//! Key objects for the signing layer.

use std::sync::Arc;

use openssl::ec::EcGroup;
use openssl::ec::EcKey;
use openssl::nid::Nid;
use openssl::pkey::Id;
use openssl::pkey::PKey;
use openssl::pkey::PKeyRef;
use openssl::pkey::Private;
use openssl::pkey::Public;
use openssl::rsa::Rsa;

use crate::CryptoError;
use crate::EcCurve;

/// A private key usable for signing.
///
/// Cheap to clone; the underlying key material is shared. The bridge
/// layers above treat clones as borrowed capabilities and drop them when
/// the operation that resolved them returns.
#[derive(Clone)]
pub struct PrivateKey(Arc<PKey<Private>>);

/// A public key usable for verification.
#[derive(Clone)]
pub struct PublicKey(Arc<PKey<Public>>);

impl PrivateKey {
    /// Generates an RSA key pair of the given modulus size.
    pub fn generate_rsa(bits: u32) -> Result<(PrivateKey, PublicKey), CryptoError> {
        let rsa = Rsa::generate(bits).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        let pkey = PKey::from_rsa(rsa).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        let private = PrivateKey(Arc::new(pkey));
        let public = private.extract_public()?;
        Ok((private, public))
    }

    /// Generates an EC key pair on the given curve.
    pub fn generate_ec(curve: EcCurve) -> Result<(PrivateKey, PublicKey), CryptoError> {
        let curve_name = match curve {
            EcCurve::P256 => Nid::X9_62_PRIME256V1,
            EcCurve::P384 => Nid::SECP384R1,
            EcCurve::P521 => Nid::SECP521R1,
        };
        let group = EcGroup::from_curve_name(curve_name).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        let ec = EcKey::generate(&group).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        let pkey = PKey::from_ec_key(ec).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        let private = PrivateKey(Arc::new(pkey));
        let public = private.extract_public()?;
        Ok((private, public))
    }

    /// Synthesizes a throwaway RSA private key of the given strength.
    ///
    /// Used only to drive RSA-PSS parameter construction on the
    /// verification path, where no real private key exists. The caller
    /// drops the placeholder before its operation returns.
    pub fn placeholder_rsa(bits: u32) -> Result<PrivateKey, CryptoError> {
        let rsa = Rsa::generate(bits).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        let pkey = PKey::from_rsa(rsa).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyGenerateFailed
        })?;
        Ok(PrivateKey(Arc::new(pkey)))
    }

    /// Imports a DER-encoded private key.
    pub fn from_der(der: &[u8]) -> Result<PrivateKey, CryptoError> {
        let pkey = PKey::private_key_from_der(der).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyDecodeFailed
        })?;
        Ok(PrivateKey(Arc::new(pkey)))
    }

    /// Exports the private key as DER.
    pub fn to_der(&self) -> Result<Vec<u8>, CryptoError> {
        self.0.private_key_to_der().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyEncodeFailed
        })
    }

    /// Derives the matching public key.
    pub fn extract_public(&self) -> Result<PublicKey, CryptoError> {
        let der = self.0.public_key_to_der().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyEncodeFailed
        })?;
        PublicKey::from_der(&der)
    }

    /// Key strength in bits.
    pub fn strength_in_bits(&self) -> u32 {
        self.0.bits()
    }

    /// Upper bound on the size of a signature produced with this key.
    pub fn signature_len(&self) -> usize {
        self.0.size()
    }

    /// Whether this is an RSA key.
    pub fn is_rsa(&self) -> bool {
        self.0.id() == Id::RSA
    }

    pub(crate) fn pkey(&self) -> &PKeyRef<Private> {
        &self.0
    }
}

impl PublicKey {
    /// Imports a DER-encoded (SubjectPublicKeyInfo) public key.
    pub fn from_der(der: &[u8]) -> Result<PublicKey, CryptoError> {
        let pkey = PKey::public_key_from_der(der).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyDecodeFailed
        })?;
        Ok(PublicKey(Arc::new(pkey)))
    }

    /// Exports the public key as DER.
    pub fn to_der(&self) -> Result<Vec<u8>, CryptoError> {
        self.0.public_key_to_der().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyEncodeFailed
        })
    }

    /// Key strength in bits.
    pub fn strength_in_bits(&self) -> u32 {
        self.0.bits()
    }

    /// Upper bound on the size of a signature verifiable with this key.
    pub fn signature_len(&self) -> usize {
        self.0.size()
    }

    /// Whether this is an RSA key.
    pub fn is_rsa(&self) -> bool {
        self.0.id() == Id::RSA
    }

    pub(crate) fn pkey(&self) -> &PKeyRef<Public> {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.strength_in_bits())
            .finish()
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &self.strength_in_bits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn rsa_der_round_trip() {
        let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
        assert_eq!(private.strength_in_bits(), 2048);
        assert_eq!(private.signature_len(), 256);
        assert!(private.is_rsa());

        let der = private.to_der().unwrap();
        let reimported = PrivateKey::from_der(&der).unwrap();
        assert_eq!(reimported.strength_in_bits(), 2048);

        let pub_der = public.to_der().unwrap();
        let reimported = PublicKey::from_der(&pub_der).unwrap();
        assert_eq!(reimported.strength_in_bits(), 2048);
    }

    #[test]
    fn ec_generate() {
        let (private, public) = PrivateKey::generate_ec(EcCurve::P256).unwrap();
        assert_eq!(private.strength_in_bits(), 256);
        assert!(!private.is_rsa());
        assert!(!public.is_rsa());
    }

    #[test]
    fn import_rejects_garbage() {
        let result = PrivateKey::from_der(&[0u8; 16]);
        assert_eq!(result.unwrap_err(), CryptoError::KeyDecodeFailed);
    }
}
