// Copyright (C) Microsoft Corporation. All rights reserved.

//! C ABI for the signet signing-context bridge.
//!
//! This crate exposes the bridge to foreign callers: a managed object
//! stores an opaque [`SignetHandle`] and passes it into every entry
//! point. Handles are managed by a global handle table; the objects
//! behind them (keys, signature contexts) are owned by the table until
//! freed, released, or consumed by a finalize call.
//!
//! Every exported function runs inside [`abi_boundary`], which catches
//! panics and converts all failures to a [`SignetStatus`] code, so no
//! unwinding ever crosses the ABI.

mod handle_table;
mod key_mgmt;
mod sign_verify;
mod utils;

#[cfg(feature = "testhooks")]
pub mod testhooks;

use std::ffi::c_void;
use std::ops::Deref;
use std::ops::DerefMut;
use std::panic::UnwindSafe;
use std::panic::catch_unwind;
use std::sync::LazyLock;

use handle_table::*;
use signet_api::DigestAlgorithm;
use signet_api::SigError;
use signet_api::SignatureAlgorithm;
use signet_api::SignatureConfig;
use utils::*;

pub use key_mgmt::*;
pub use sign_verify::*;

/// Handle type for referencing bridge objects across the ABI.
///
/// A 32-bit opaque identifier managed by the global handle table. Zero is
/// never a valid handle.
#[repr(transparent)]
#[derive(Eq, Hash, PartialEq, Copy, Clone, Default, Debug)]
pub struct SignetHandle(u32);

impl Deref for SignetHandle {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SignetHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Status codes returned by every exported function.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignetStatus {
    /// Operation completed.
    Success = 0,

    /// Argument failed validation.
    InvalidArgument = -1,

    /// Handle does not refer to a live object of the expected type.
    InvalidHandle = -2,

    /// Offset/length pair does not fit the supplied buffer.
    IndexOutOfBounds = -3,

    /// Output buffer too small; the required length was written back.
    BufferTooSmall = -4,

    /// Allocation failed.
    OutOfMemory = -5,

    /// Key handle is stale, absent, or of the wrong type.
    KeyUnavailable = -6,

    /// Native context creation or startup failed.
    ContextUnavailable = -7,

    /// RSA-PSS parameter construction failed.
    PssParamsFailed = -8,

    /// Feeding data into the context failed.
    UpdateFailed = -9,

    /// The signing operation failed.
    SignFailed = -10,

    /// Verification failed for a reason other than a signature mismatch.
    VerifyFailed = -11,

    /// Operation does not match the context kind.
    WrongContextKind = -12,

    /// The context behind this handle has been released or consumed.
    ContextReleased = -13,

    /// Key generation failed.
    KeyGenerateFailed = -14,

    /// Key DER decoding failed.
    KeyDecodeFailed = -15,

    /// A panic was caught at the ABI boundary.
    Panic = i32::MIN,
}

impl std::fmt::Display for SignetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for SignetStatus {}

impl From<SigError> for SignetStatus {
    fn from(err: SigError) -> Self {
        match err {
            SigError::OutOfMemory => SignetStatus::OutOfMemory,
            SigError::KeyUnavailable => SignetStatus::KeyUnavailable,
            SigError::ContextUnavailable => SignetStatus::ContextUnavailable,
            SigError::PssParamsFailed => SignetStatus::PssParamsFailed,
            SigError::UpdateFailed => SignetStatus::UpdateFailed,
            SigError::SignFailed => SignetStatus::SignFailed,
            SigError::VerifyFailed => SignetStatus::VerifyFailed,
            SigError::IndexOutOfBounds => SignetStatus::IndexOutOfBounds,
            SigError::WrongContextKind => SignetStatus::WrongContextKind,
            SigError::ContextReleased => SignetStatus::ContextReleased,
            SigError::InvalidHandle => SignetStatus::InvalidHandle,
            SigError::InvalidArgument => SignetStatus::InvalidArgument,
            SigError::BufferTooSmall => SignetStatus::BufferTooSmall,
        }
    }
}

/// C FFI structure for a byte buffer.
///
/// # Safety
///
/// When used from C code, `ptr` must point to valid memory for `len`
/// bytes and outlive the structure. A null `ptr` is accepted only
/// together with `len == 0`.
#[repr(C)]
pub struct SignetBuffer {
    /// Buffer base address.
    pub ptr: *mut c_void,

    /// Buffer length in bytes. Updated to the required length when an
    /// operation reports [`SignetStatus::BufferTooSmall`], and to the
    /// written length on success.
    pub len: u32,
}

impl<'a> TryFrom<&'a SignetBuffer> for &'a [u8] {
    type Error = SignetStatus;

    #[allow(unsafe_code)]
    fn try_from(buffer: &'a SignetBuffer) -> Result<Self, Self::Error> {
        if buffer.ptr.is_null() {
            // An empty buffer may legitimately carry no storage.
            if buffer.len == 0 {
                return Ok(&[]);
            }
            return Err(SignetStatus::InvalidArgument);
        }

        // SAFETY: the caller guarantees ptr points to len valid bytes.
        let slice =
            unsafe { std::slice::from_raw_parts(buffer.ptr as *const u8, buffer.len as usize) };
        Ok(slice)
    }
}

impl<'a> TryFrom<&'a mut SignetBuffer> for &'a mut [u8] {
    type Error = SignetStatus;

    #[allow(unsafe_code)]
    fn try_from(buffer: &'a mut SignetBuffer) -> Result<Self, Self::Error> {
        if buffer.ptr.is_null() {
            if buffer.len == 0 {
                return Ok(&mut []);
            }
            return Err(SignetStatus::InvalidArgument);
        }

        // SAFETY: the caller guarantees ptr points to len valid bytes.
        let slice =
            unsafe { std::slice::from_raw_parts_mut(buffer.ptr as *mut u8, buffer.len as usize) };
        Ok(slice)
    }
}

/// C FFI structure describing the requested signature algorithm.
///
/// `digest_alg` is optional; zero means "not configured" and defers the
/// digest choice to the native library's defaults where the algorithm is
/// parametric.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignetAlgo {
    /// Signature algorithm identifier.
    pub sig_alg: u32,

    /// Digest algorithm identifier, or zero when not configured.
    pub digest_alg: u32,
}

impl TryFrom<&SignetAlgo> for SignatureConfig {
    type Error = SignetStatus;

    fn try_from(algo: &SignetAlgo) -> Result<Self, Self::Error> {
        let algorithm = SignatureAlgorithm::try_from(algo.sig_alg).map_err(SignetStatus::from)?;
        let digest = match algo.digest_alg {
            0 => None,
            value => Some(DigestAlgorithm::try_from(value).map_err(SignetStatus::from)?),
        };
        Ok(SignatureConfig { algorithm, digest })
    }
}

/// Global handle table tracking all live bridge objects.
static HANDLE_TABLE: LazyLock<HandleTable> = LazyLock::new(HandleTable::default);

/// Executes a function at the ABI boundary with panic catching.
///
/// Unwinding across the ABI would be undefined behavior, so every entry
/// point funnels its body through here. Panics surface as
/// [`SignetStatus::Panic`].
pub(crate) fn abi_boundary<F: FnOnce() -> Result<(), SignetStatus> + UnwindSafe>(
    f: F,
) -> SignetStatus {
    match catch_unwind(f) {
        Ok(Ok(())) => SignetStatus::Success,
        Ok(Err(status)) => status,
        Err(_) => SignetStatus::Panic,
    }
}
