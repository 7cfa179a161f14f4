// Copyright (C) Microsoft Corporation. All rights reserved.

//! Key management entry points and key-handle resolution.

use signet_api::EccCurve;
use signet_crypto::PrivateKey;
use signet_crypto::PublicKey;

use super::*;

impl TryFrom<SignetHandle> for PrivateKey {
    type Error = SignetStatus;

    fn try_from(value: SignetHandle) -> Result<PrivateKey, Self::Error> {
        let key: &PrivateKey = HANDLE_TABLE
            .as_ref(value, HandleType::PrivateKey)
            .map_err(|_| SignetStatus::KeyUnavailable)?;
        Ok(key.clone())
    }
}

impl TryFrom<SignetHandle> for PublicKey {
    type Error = SignetStatus;

    fn try_from(value: SignetHandle) -> Result<PublicKey, Self::Error> {
        let key: &PublicKey = HANDLE_TABLE
            .as_ref(value, HandleType::PublicKey)
            .map_err(|_| SignetStatus::KeyUnavailable)?;
        Ok(key.clone())
    }
}

/// Generates an RSA key pair and returns handles to both halves.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_key_generate_rsa(
    bits: u32,
    priv_out: *mut SignetHandle,
    pub_out: *mut SignetHandle,
) -> SignetStatus {
    abi_boundary(|| {
        validate_ptr(priv_out)?;
        validate_ptr(pub_out)?;

        let (private, public) = PrivateKey::generate_rsa(bits).map_err(|source| {
            tracing::error!(?source, bits, "rsa key generation failed");
            SignetStatus::KeyGenerateFailed
        })?;

        let priv_handle = HANDLE_TABLE.alloc_handle(HandleType::PrivateKey, Box::new(private));
        let pub_handle = HANDLE_TABLE.alloc_handle(HandleType::PublicKey, Box::new(public));

        assign_ptr(priv_out, priv_handle)?;
        assign_ptr(pub_out, pub_handle)?;
        Ok(())
    })
}

/// Generates an EC key pair on the given curve (1 = P-256, 2 = P-384,
/// 3 = P-521) and returns handles to both halves.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_key_generate_ec(
    curve: u32,
    priv_out: *mut SignetHandle,
    pub_out: *mut SignetHandle,
) -> SignetStatus {
    abi_boundary(|| {
        validate_ptr(priv_out)?;
        validate_ptr(pub_out)?;

        let curve = EccCurve::try_from(curve).map_err(SignetStatus::from)?;
        let (private, public) = PrivateKey::generate_ec(curve.into()).map_err(|source| {
            tracing::error!(?source, "ec key generation failed");
            SignetStatus::KeyGenerateFailed
        })?;

        let priv_handle = HANDLE_TABLE.alloc_handle(HandleType::PrivateKey, Box::new(private));
        let pub_handle = HANDLE_TABLE.alloc_handle(HandleType::PublicKey, Box::new(public));

        assign_ptr(priv_out, priv_handle)?;
        assign_ptr(pub_out, pub_handle)?;
        Ok(())
    })
}

/// Imports a DER-encoded private key.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_key_import_private(
    der: *const SignetBuffer,
    out: *mut SignetHandle,
) -> SignetStatus {
    abi_boundary(|| {
        let der: &[u8] = deref_ptr(der)?.try_into()?;
        validate_ptr(out)?;

        let key = PrivateKey::from_der(der).map_err(|source| {
            tracing::error!(?source, "private key import failed");
            SignetStatus::KeyDecodeFailed
        })?;

        let handle = HANDLE_TABLE.alloc_handle(HandleType::PrivateKey, Box::new(key));
        assign_ptr(out, handle)?;
        Ok(())
    })
}

/// Imports a DER-encoded (SubjectPublicKeyInfo) public key.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_key_import_public(
    der: *const SignetBuffer,
    out: *mut SignetHandle,
) -> SignetStatus {
    abi_boundary(|| {
        let der: &[u8] = deref_ptr(der)?.try_into()?;
        validate_ptr(out)?;

        let key = PublicKey::from_der(der).map_err(|source| {
            tracing::error!(?source, "public key import failed");
            SignetStatus::KeyDecodeFailed
        })?;

        let handle = HANDLE_TABLE.alloc_handle(HandleType::PublicKey, Box::new(key));
        assign_ptr(out, handle)?;
        Ok(())
    })
}

/// Frees a key handle.
///
/// Safe to call more than once; freeing a handle that is already gone is
/// a no-op. Passing a handle of a non-key type is an error and leaves the
/// object alive.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_key_free(handle: SignetHandle) -> SignetStatus {
    abi_boundary(|| match HANDLE_TABLE.get_handle_type(handle) {
        Ok(HandleType::PrivateKey) => {
            let _ = HANDLE_TABLE.free_handle::<PrivateKey>(handle, HandleType::PrivateKey)?;
            Ok(())
        }
        Ok(HandleType::PublicKey) => {
            let _ = HANDLE_TABLE.free_handle::<PublicKey>(handle, HandleType::PublicKey)?;
            Ok(())
        }
        Ok(_) => Err(SignetStatus::InvalidHandle),
        Err(_) => Ok(()),
    })
}
