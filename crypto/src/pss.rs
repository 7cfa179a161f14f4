// Copyright (C) Microsoft Corporation. All rights reserved.

//! RSA-PSS parameter synthesis.

use crate::Arena;
use crate::CryptoError;
use crate::HashKind;
use crate::PrivateKey;
use crate::PssParams;

/// Synthesizes PSS parameters for the given digest and key.
///
/// When no digest is configured, one is chosen from the key's modulus
/// strength following the NIST security-strength mapping: up to 3072 bits
/// uses SHA-256, up to 7680 bits SHA-384, and anything larger SHA-512.
/// MGF1 uses the same digest as the message. The salt length equals the
/// digest length, clamped to `emLen - hashLen - 2` when the key is too
/// small to accommodate a full-length salt.
///
/// The returned record is allocated from `arena` and stays valid for the
/// arena's lifetime. Keys whose encoded message length cannot hold the
/// digest at all are rejected.
pub fn create_signature_algorithm_parameters(
    arena: &mut Arena,
    digest: Option<HashKind>,
    key: &PrivateKey,
) -> Result<*const PssParams, CryptoError> {
    if !key.is_rsa() {
        return Err(CryptoError::KeyTypeMismatch);
    }

    let mod_bits = key.strength_in_bits() as usize;
    let hash = digest.unwrap_or(if mod_bits <= 3072 {
        HashKind::Sha256
    } else if mod_bits <= 7680 {
        HashKind::Sha384
    } else {
        HashKind::Sha512
    });

    // emLen = ceil((modBits - 1) / 8), per RFC 8017 EMSA-PSS.
    let em_len = mod_bits.saturating_sub(1).div_ceil(8);
    let hash_len = hash.len();
    if em_len < hash_len + 2 {
        tracing::error!(mod_bits, hash_len, "key too small for PSS digest");
        return Err(CryptoError::ParamSynthesisFailed);
    }
    let salt_len = hash_len.min(em_len - hash_len - 2);

    Ok(arena.alloc_pss_params(PssParams {
        hash,
        mgf_hash: hash,
        salt_len: salt_len as u32,
        trailer_field: 1,
    }))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn params_for(bits: u32, digest: Option<HashKind>) -> Result<PssParams, CryptoError> {
        let key = PrivateKey::placeholder_rsa(bits).unwrap();
        let mut arena = Arena::new();
        let ptr = create_signature_algorithm_parameters(&mut arena, digest, &key)?;
        // SAFETY: the arena is alive for the whole test body.
        Ok(unsafe { *ptr })
    }

    #[test]
    fn default_digest_tracks_key_strength() {
        let params = params_for(2048, None).unwrap();
        assert_eq!(params.hash, HashKind::Sha256);
        assert_eq!(params.mgf_hash, HashKind::Sha256);
        assert_eq!(params.salt_len, 32);
        assert_eq!(params.trailer_field, 1);

        let params = params_for(4096, None).unwrap();
        assert_eq!(params.hash, HashKind::Sha384);
        assert_eq!(params.salt_len, 48);
    }

    #[test]
    fn explicit_digest_wins() {
        let params = params_for(2048, Some(HashKind::Sha512)).unwrap();
        assert_eq!(params.hash, HashKind::Sha512);
        assert_eq!(params.salt_len, 64);
    }

    #[test]
    fn salt_clamped_for_small_keys() {
        // emLen for a 1024-bit key is 127; 127 - 64 - 2 = 61.
        let params = params_for(1024, Some(HashKind::Sha512)).unwrap();
        assert_eq!(params.salt_len, 61);
    }

    #[test]
    fn non_rsa_key_rejected() {
        let (key, _) = PrivateKey::generate_ec(crate::EcCurve::P256).unwrap();
        let mut arena = Arena::new();
        let result = create_signature_algorithm_parameters(&mut arena, None, &key);
        assert_eq!(result.unwrap_err(), CryptoError::KeyTypeMismatch);
    }
}
