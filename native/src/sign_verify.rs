// Copyright (C) Microsoft Corporation. All rights reserved.

//! Signature bridge entry points.
//!
//! A sign or verify operation is driven through an opaque context handle:
//! init creates and begins the native context and adopts it into the
//! handle table, update feeds bytes, and a single finalize call consumes
//! the context and produces the result. Release is idempotent and safe to
//! invoke at any point, including after a finalize already consumed the
//! context.

use signet_api::SigContext;
use signet_api::SigContextKind;
use signet_api::SignatureConfig;
use signet_api::raw_sign;
use signet_api::raw_verify;
use signet_crypto::PrivateKey;
use signet_crypto::PublicKey;

use super::*;

/// Adopts a begun context into the handle table.
///
/// This is the single point where ownership passes from the factory to
/// the table. If adoption fails, the context (and any parameter arena it
/// carries) is destroyed right here; it never leaks half-owned.
fn wrap_sig_context(ctx: SigContext) -> Result<SignetHandle, SignetStatus> {
    #[cfg(feature = "testhooks")]
    if crate::testhooks::take_fail_next_wrap() {
        // Dropping `ctx` tears down the native context and arena, the
        // same teardown a real allocation failure must guarantee.
        return Err(SignetStatus::OutOfMemory);
    }

    Ok(HANDLE_TABLE.alloc_handle(HandleType::SigContext, Box::new(ctx)))
}

/// Creates a signing context for the given key and algorithm.
///
/// On success the returned handle owns the native context until a
/// finalize call consumes it or [`signet_ctx_release`] frees it.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_sign_ctx_init(
    algo: *const SignetAlgo,
    key: SignetHandle,
    ctx_out: *mut SignetHandle,
) -> SignetStatus {
    abi_boundary(|| {
        let algo = deref_ptr(algo)?;
        validate_ptr(ctx_out)?;

        // Snapshot the configuration before any native resource exists.
        let config: SignatureConfig = algo.try_into()?;
        let key: PrivateKey = key.try_into()?;

        let ctx = SigContext::sign(config, &key)?;
        let handle = wrap_sig_context(ctx)?;

        assign_ptr(ctx_out, handle)?;
        Ok(())
    })
}

/// Creates a verification context for the given key and algorithm.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_verify_ctx_init(
    algo: *const SignetAlgo,
    key: SignetHandle,
    ctx_out: *mut SignetHandle,
) -> SignetStatus {
    abi_boundary(|| {
        let algo = deref_ptr(algo)?;
        validate_ptr(ctx_out)?;

        let config: SignatureConfig = algo.try_into()?;
        let key: PublicKey = key.try_into()?;

        let ctx = SigContext::verify(config, &key)?;
        let handle = wrap_sig_context(ctx)?;

        assign_ptr(ctx_out, handle)?;
        Ok(())
    })
}

/// Feeds `length` bytes starting at `offset` of `data` into a context.
///
/// Works on both signing and verification contexts. The range is
/// validated against the buffer before any native state is touched;
/// `offset == len` with `length == 0` is a valid empty update.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_ctx_update(
    ctx: SignetHandle,
    data: *const SignetBuffer,
    offset: u32,
    length: u32,
) -> SignetStatus {
    abi_boundary(|| {
        let bytes: &[u8] = deref_ptr(data)?.try_into()?;

        // 64-bit arithmetic; the sum of two u32 values cannot overflow it.
        let start = offset as u64;
        let end = start + length as u64;
        if end > bytes.len() as u64 {
            Err(SignetStatus::IndexOutOfBounds)?;
        }

        let ctx: &mut SigContext = HANDLE_TABLE
            .as_mut(ctx, HandleType::SigContext)
            .map_err(|_| SignetStatus::ContextReleased)?;
        ctx.update(&bytes[start as usize..end as usize])?;
        Ok(())
    })
}

/// Finalizes a signing context and writes out the signature.
///
/// If the output buffer is too small, the required size is written into
/// `sig.len` and the context stays alive so the call can be retried.
/// Otherwise the context is consumed: its handle is dead after this
/// returns, success or not, and a later release of it is a no-op.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_sign_ctx_finish(
    ctx: SignetHandle,
    sig: *mut SignetBuffer,
) -> SignetStatus {
    abi_boundary(|| {
        let sig_buf = deref_mut_ptr(sig)?;

        // Size the output against the live context before committing to
        // the consuming step.
        let required = {
            let ctx: &SigContext = HANDLE_TABLE
                .as_ref(ctx, HandleType::SigContext)
                .map_err(|_| SignetStatus::ContextReleased)?;
            ctx.signature_len()?
        };
        let output = validate_output_buffer(sig_buf, required)?;

        let ctx: Box<SigContext> = HANDLE_TABLE
            .free_handle(ctx, HandleType::SigContext)
            .map_err(|_| SignetStatus::ContextReleased)?;
        let signature = ctx.finalize_sign()?;

        output[..signature.len()].copy_from_slice(&signature);
        sig_buf.len = signature.len() as u32;
        Ok(())
    })
}

/// Finalizes a verification context against a candidate signature.
///
/// Consumes the context. A signature mismatch is not an error: `result`
/// is set to `false` and the call returns [`SignetStatus::Success`].
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_verify_ctx_finish(
    ctx: SignetHandle,
    sig: *const SignetBuffer,
    result: *mut bool,
) -> SignetStatus {
    abi_boundary(|| {
        let signature: &[u8] = deref_ptr(sig)?.try_into()?;
        validate_ptr(result)?;

        // Check the kind before the consuming step so that handing a
        // signing context in here leaves it alive.
        {
            let ctx: &SigContext = HANDLE_TABLE
                .as_ref(ctx, HandleType::SigContext)
                .map_err(|_| SignetStatus::ContextReleased)?;
            if ctx.kind() != SigContextKind::Verify {
                Err(SignetStatus::WrongContextKind)?;
            }
        }

        let ctx: Box<SigContext> = HANDLE_TABLE
            .free_handle(ctx, HandleType::SigContext)
            .map_err(|_| SignetStatus::ContextReleased)?;
        let verified = ctx.finalize_verify(signature)?;

        assign_ptr(result, verified)?;
        Ok(())
    })
}

/// Releases a context handle.
///
/// Idempotent: the context may already have been released, or consumed by
/// a finalize call, in which case nothing happens. This is the teardown
/// path a managed wrapper invokes from its finalizer, possibly long after
/// the operation completed.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_ctx_release(ctx: SignetHandle) -> SignetStatus {
    abi_boundary(|| {
        let _ = HANDLE_TABLE.free_handle::<SigContext>(ctx, HandleType::SigContext);
        Ok(())
    })
}

/// Signs an already-computed digest in a single call.
///
/// No streaming state and no context lifecycle are involved; the digest
/// algorithm is recovered from the digest length.
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_raw_sign(
    key: SignetHandle,
    hash: *const SignetBuffer,
    sig: *mut SignetBuffer,
) -> SignetStatus {
    abi_boundary(|| {
        let digest: &[u8] = deref_ptr(hash)?.try_into()?;
        let sig_buf = deref_mut_ptr(sig)?;

        let key: PrivateKey = key.try_into()?;
        let output = validate_output_buffer(sig_buf, key.signature_len())?;

        let signature = raw_sign(&key, digest)?;
        output[..signature.len()].copy_from_slice(&signature);
        sig_buf.len = signature.len() as u32;
        Ok(())
    })
}

/// Verifies a signature over an already-computed digest in a single call.
///
/// Shares the mismatch rule with [`signet_verify_ctx_finish`]: a bad
/// signature sets `result` to `false` and returns
/// [`SignetStatus::Success`].
///
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn signet_raw_verify(
    key: SignetHandle,
    hash: *const SignetBuffer,
    sig: *const SignetBuffer,
    result: *mut bool,
) -> SignetStatus {
    abi_boundary(|| {
        let digest: &[u8] = deref_ptr(hash)?.try_into()?;
        let signature: &[u8] = deref_ptr(sig)?.try_into()?;
        validate_ptr(result)?;

        let key: PublicKey = key.try_into()?;
        let verified = raw_verify(&key, digest, signature)?;

        assign_ptr(result, verified)?;
        Ok(())
    })
}
