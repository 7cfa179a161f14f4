// Copyright (C) Microsoft Corporation. All rights reserved.

//! Resource-count checks for the context lifecycle.
//!
//! These run in their own test binary so the live-context counter only
//! ever observes contexts created here. Everything is driven from a
//! single test function to keep the counter readings sequential.

#![cfg(feature = "testhooks")]

use std::ffi::c_void;
use std::ptr;

use signet_crypto::live_context_count;
use signet_native::*;
use test_log::test;

const RSA_SHA256: u32 = 2;

fn in_buffer(data: &[u8]) -> SignetBuffer {
    SignetBuffer {
        ptr: data.as_ptr() as *mut c_void,
        len: data.len() as u32,
    }
}

#[test]
fn contexts_never_leak() {
    let mut priv_handle = SignetHandle::default();
    let mut pub_handle = SignetHandle::default();
    let status = unsafe { signet_key_generate_rsa(2048, &mut priv_handle, &mut pub_handle) };
    assert_eq!(status, SignetStatus::Success);

    let algo = SignetAlgo {
        sig_alg: RSA_SHA256,
        digest_alg: 0,
    };
    assert_eq!(live_context_count(), 0);

    // A context created but not adopted must be destroyed by the failing
    // wrap, not leaked.
    testhooks::fail_next_wrap();
    let mut ctx = SignetHandle::default();
    let status = unsafe { signet_sign_ctx_init(&algo, priv_handle, &mut ctx) };
    assert_eq!(status, SignetStatus::OutOfMemory);
    assert_eq!(live_context_count(), 0);

    // Explicit release tears the native context down exactly once.
    let status = unsafe { signet_sign_ctx_init(&algo, priv_handle, &mut ctx) };
    assert_eq!(status, SignetStatus::Success);
    assert_eq!(live_context_count(), 1);
    assert_eq!(unsafe { signet_ctx_release(ctx) }, SignetStatus::Success);
    assert_eq!(live_context_count(), 0);
    assert_eq!(unsafe { signet_ctx_release(ctx) }, SignetStatus::Success);
    assert_eq!(live_context_count(), 0);

    // A finalize call consumes and destroys the context as well.
    let status = unsafe { signet_sign_ctx_init(&algo, priv_handle, &mut ctx) };
    assert_eq!(status, SignetStatus::Success);
    assert_eq!(live_context_count(), 1);

    let data = in_buffer(b"count me");
    let status = unsafe { signet_ctx_update(ctx, &data, 0, 8) };
    assert_eq!(status, SignetStatus::Success);

    let mut sig_buf = SignetBuffer {
        ptr: ptr::null_mut(),
        len: 0,
    };
    let status = unsafe { signet_sign_ctx_finish(ctx, &mut sig_buf) };
    assert_eq!(status, SignetStatus::BufferTooSmall);
    // The undersized buffer did not consume the context.
    assert_eq!(live_context_count(), 1);

    let mut storage = vec![0u8; sig_buf.len as usize];
    let mut sig_buf = SignetBuffer {
        ptr: storage.as_mut_ptr() as *mut c_void,
        len: storage.len() as u32,
    };
    let status = unsafe { signet_sign_ctx_finish(ctx, &mut sig_buf) };
    assert_eq!(status, SignetStatus::Success);
    assert_eq!(live_context_count(), 0);
    assert_eq!(unsafe { signet_ctx_release(ctx) }, SignetStatus::Success);
}
