// Copyright (C) Microsoft Corporation. All rights reserved.

use openssl::hash::MessageDigest;
use openssl::hash::hash;
use signet_api::*;
use signet_crypto::EcCurve;
use signet_crypto::PrivateKey;
use signet_crypto::PublicKey;
use test_log::test;

fn config(algorithm: SignatureAlgorithm) -> SignatureConfig {
    SignatureConfig {
        algorithm,
        digest: None,
    }
}

fn config_with_digest(algorithm: SignatureAlgorithm, digest: DigestAlgorithm) -> SignatureConfig {
    SignatureConfig {
        algorithm,
        digest: Some(digest),
    }
}

fn sign_message(
    config: SignatureConfig,
    key: &PrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, SigError> {
    let mut ctx = SigContext::sign(config, key)?;
    ctx.update(message)?;
    ctx.finalize_sign()
}

fn verify_message(
    config: SignatureConfig,
    key: &PublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, SigError> {
    let mut ctx = SigContext::verify(config, key)?;
    ctx.update(message)?;
    ctx.finalize_verify(signature)
}

#[test]
fn round_trip_rsa_pkcs1() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    for algorithm in [
        SignatureAlgorithm::RsaSha256,
        SignatureAlgorithm::RsaSha384,
        SignatureAlgorithm::RsaSha512,
    ] {
        let signature = sign_message(config(algorithm), &private, b"the message").unwrap();
        assert_eq!(signature.len(), 256);
        let result = verify_message(config(algorithm), &public, b"the message", &signature);
        assert_eq!(result, Ok(true), "algorithm {:?}", algorithm);
    }
}

#[test]
fn round_trip_ecdsa() {
    for (curve, algorithm) in [
        (EcCurve::P256, SignatureAlgorithm::EcdsaSha256),
        (EcCurve::P384, SignatureAlgorithm::EcdsaSha384),
        (EcCurve::P521, SignatureAlgorithm::EcdsaSha512),
    ] {
        let (private, public) = PrivateKey::generate_ec(curve).unwrap();
        let signature = sign_message(config(algorithm), &private, b"the message").unwrap();
        let result = verify_message(config(algorithm), &public, b"the message", &signature);
        assert_eq!(result, Ok(true), "curve {:?}", curve);
    }
}

#[test]
fn round_trip_rsa_pss_default_digest() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    let signature = sign_message(config(SignatureAlgorithm::RsaPss), &private, b"pss").unwrap();
    let result = verify_message(config(SignatureAlgorithm::RsaPss), &public, b"pss", &signature);
    assert_eq!(result, Ok(true));
}

#[test]
fn round_trip_rsa_pss_explicit_digest() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    for digest in [
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ] {
        let cfg = config_with_digest(SignatureAlgorithm::RsaPss, digest);
        let signature = sign_message(cfg, &private, b"pss message").unwrap();
        let result = verify_message(cfg, &public, b"pss message", &signature);
        assert_eq!(result, Ok(true), "digest {:?}", digest);
    }
}

#[test]
fn pss_digest_mismatch_fails_verification() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    let signature = sign_message(
        config_with_digest(SignatureAlgorithm::RsaPss, DigestAlgorithm::Sha256),
        &private,
        b"pss message",
    )
    .unwrap();

    let result = verify_message(
        config_with_digest(SignatureAlgorithm::RsaPss, DigestAlgorithm::Sha384),
        &public,
        b"pss message",
        &signature,
    );
    assert_eq!(result, Ok(false));
}

#[test]
fn streaming_split_is_equivalent_to_one_shot() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    let message = b"a message long enough to split at interesting points";

    let whole = sign_message(config(SignatureAlgorithm::RsaSha256), &private, message).unwrap();

    for split in [0, 1, message.len() / 2, message.len()] {
        let mut ctx = SigContext::sign(config(SignatureAlgorithm::RsaSha256), &private).unwrap();
        ctx.update(&message[..split]).unwrap();
        ctx.update(&message[split..]).unwrap();
        let split_signature = ctx.finalize_sign().unwrap();
        // PKCS#1 v1.5 is deterministic, so the bytes must match exactly.
        assert_eq!(whole, split_signature, "split {}", split);

        let mut ctx = SigContext::verify(config(SignatureAlgorithm::RsaSha256), &public).unwrap();
        ctx.update(&message[..split]).unwrap();
        ctx.update(&message[split..]).unwrap();
        assert_eq!(ctx.finalize_verify(&whole), Ok(true), "split {}", split);
    }
}

#[test]
fn empty_message_round_trip() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();

    let ctx = SigContext::sign(config(SignatureAlgorithm::RsaSha256), &private).unwrap();
    let signature = ctx.finalize_sign().unwrap();

    let ctx = SigContext::verify(config(SignatureAlgorithm::RsaSha256), &public).unwrap();
    assert_eq!(ctx.finalize_verify(&signature), Ok(true));
}

#[test]
fn tampered_signature_is_false_not_error() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    let mut signature =
        sign_message(config(SignatureAlgorithm::RsaSha256), &private, b"data").unwrap();
    signature[5] ^= 0x40;

    let result = verify_message(config(SignatureAlgorithm::RsaSha256), &public, b"data", &signature);
    assert_eq!(result, Ok(false));
}

#[test]
fn ecdsa_mismatched_message_is_false_not_error() {
    let (private, public) = PrivateKey::generate_ec(EcCurve::P256).unwrap();
    let signature =
        sign_message(config(SignatureAlgorithm::EcdsaSha256), &private, b"data").unwrap();

    let result = verify_message(
        config(SignatureAlgorithm::EcdsaSha256),
        &public,
        b"other data",
        &signature,
    );
    assert_eq!(result, Ok(false));
}

#[test]
fn garbage_signature_never_verifies() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    let _ = sign_message(config(SignatureAlgorithm::RsaSha256), &private, b"data").unwrap();

    // Structurally invalid input may be reported either as a mismatch or
    // as an operation failure, but never as success.
    let result = verify_message(
        config(SignatureAlgorithm::RsaSha256),
        &public,
        b"data",
        &[0xA5u8; 7],
    );
    assert_ne!(result, Ok(true), "result {:?}", result);
}

#[test]
fn finalize_kind_is_checked() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();

    let ctx = SigContext::verify(config(SignatureAlgorithm::RsaSha256), &public).unwrap();
    assert_eq!(ctx.kind(), SigContextKind::Verify);
    assert_eq!(ctx.finalize_sign().unwrap_err(), SigError::WrongContextKind);

    let ctx = SigContext::sign(config(SignatureAlgorithm::RsaSha256), &private).unwrap();
    assert_eq!(ctx.kind(), SigContextKind::Sign);
    assert_eq!(
        ctx.finalize_verify(&[0u8; 256]).unwrap_err(),
        SigError::WrongContextKind
    );

    let ctx = SigContext::verify(config(SignatureAlgorithm::RsaSha256), &public).unwrap();
    assert_eq!(ctx.signature_len().unwrap_err(), SigError::WrongContextKind);
}

#[test]
fn ecdsa_key_with_rsa_algorithm_is_rejected() {
    let (private, _) = PrivateKey::generate_ec(EcCurve::P256).unwrap();
    let result = SigContext::sign(config(SignatureAlgorithm::RsaSha256), &private);
    assert_eq!(result.err(), Some(SigError::ContextUnavailable));

    let result = SigContext::sign(config(SignatureAlgorithm::RsaPss), &private);
    assert_eq!(result.err(), Some(SigError::PssParamsFailed));
}

#[test]
fn raw_and_streaming_signatures_cross_verify() {
    let message = b"cross-path message";
    let digest = hash(MessageDigest::sha256(), message).unwrap();

    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();

    // Raw signature accepted by the streaming verifier.
    let raw_signature = raw_sign(&private, &digest).unwrap();
    let result = verify_message(
        config(SignatureAlgorithm::RsaSha256),
        &public,
        message,
        &raw_signature,
    );
    assert_eq!(result, Ok(true));

    // Streaming signature accepted by the raw verifier.
    let streamed = sign_message(config(SignatureAlgorithm::RsaSha256), &private, message).unwrap();
    assert_eq!(raw_verify(&public, &digest, &streamed), Ok(true));

    let (private, public) = PrivateKey::generate_ec(EcCurve::P256).unwrap();
    let raw_signature = raw_sign(&private, &digest).unwrap();
    let result = verify_message(
        config(SignatureAlgorithm::EcdsaSha256),
        &public,
        message,
        &raw_signature,
    );
    assert_eq!(result, Ok(true));

    let streamed =
        sign_message(config(SignatureAlgorithm::EcdsaSha256), &private, message).unwrap();
    assert_eq!(raw_verify(&public, &digest, &streamed), Ok(true));
}

#[test]
fn raw_verify_mismatch_is_false_not_error() {
    let digest = hash(MessageDigest::sha256(), b"raw message").unwrap();
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();

    let mut signature = raw_sign(&private, &digest).unwrap();
    signature[0] ^= 0x01;
    assert_eq!(raw_verify(&public, &digest, &signature), Ok(false));
}

#[test]
fn raw_rejects_unknown_digest_length() {
    let (private, public) = PrivateKey::generate_rsa(2048).unwrap();
    assert_eq!(
        raw_sign(&private, &[0u8; 21]).unwrap_err(),
        SigError::InvalidArgument
    );
    assert_eq!(
        raw_verify(&public, &[0u8; 21], &[0u8; 256]).unwrap_err(),
        SigError::InvalidArgument
    );
}
