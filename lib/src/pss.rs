// Copyright (C) Microsoft Corporation. All rights reserved.

//! RSA-PSS algorithm-identifier construction.

use signet_crypto::AlgorithmId;
use signet_crypto::AlgorithmTag;
use signet_crypto::Arena;
use signet_crypto::PrivateKey;
use signet_crypto::create_signature_algorithm_parameters;

use crate::DigestAlgorithm;
use crate::SigError;
use crate::error::SigErrorMapper;

/// Builds a full RSA-PSS algorithm identifier in `arena`.
///
/// The digest may be absent; salt length and MGF digest follow the native
/// library's key-size-driven defaults either way. The returned identifier
/// is backed by `arena` and is only valid while the arena lives, which is
/// why the caller threads the arena through into whatever object adopts
/// the context built from it. On failure nothing is persisted outside the
/// caller-owned arena, which the caller discards on that path.
pub(crate) fn build_pss_algorithm_id(
    arena: &mut Arena,
    digest: Option<DigestAlgorithm>,
    key: &PrivateKey,
) -> Result<*const AlgorithmId, SigError> {
    let params = create_signature_algorithm_parameters(arena, digest.map(Into::into), key)
        .map_sig_err(SigError::PssParamsFailed)?;
    Ok(arena.alloc_algorithm_id(AlgorithmTag::RsaPss, params))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn identifier_carries_configured_digest() {
        let key = PrivateKey::placeholder_rsa(2048).unwrap();
        let mut arena = Arena::new();
        let alg = build_pss_algorithm_id(&mut arena, Some(DigestAlgorithm::Sha384), &key).unwrap();

        // SAFETY: the arena is alive for the whole test body.
        let alg = unsafe { &*alg };
        assert_eq!(alg.tag, AlgorithmTag::RsaPss);
        let params = unsafe { &*alg.pss };
        assert_eq!(params.hash, signet_crypto::HashKind::Sha384);
    }

    #[test]
    fn ec_key_is_rejected() {
        let (key, _) = PrivateKey::generate_ec(signet_crypto::EcCurve::P256).unwrap();
        let mut arena = Arena::new();
        let result = build_pss_algorithm_id(&mut arena, None, &key);
        assert_eq!(result.unwrap_err(), SigError::PssParamsFailed);
    }
}
