// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! Low-level cryptographic support for the signet bridge.
//!
//! This crate is the "native library" side of the bridge: keys, digest
//! accumulators, streaming sign/verify contexts, RSA-PSS parameter
//! synthesis, and the scratch arena that backs algorithm-identifier
//! structures. All primitive math (digests, RSA, ECDSA, padding) is
//! delegated to OpenSSL; what this crate owns is the resource surface the
//! layers above manage.
//!
//! # Ownership
//!
//! Contexts created through [`SignContext::with_algorithm_id`] or
//! [`VerifyContext::with_algorithm_id`] retain a raw pointer into
//! arena-owned parameter storage. The arena must stay alive, unmoved, for
//! the whole lifetime of such a context. Callers uphold this by owning the
//! arena and the context together and dropping the context first.

mod arena;
mod error;
mod key;
mod pss;
mod sign;
mod types;
mod verify;

pub use arena::*;
pub use error::*;
pub use key::*;
pub use pss::*;
pub use sign::*;
pub use types::*;
pub use verify::*;

#[cfg(feature = "testhooks")]
mod counters;
#[cfg(feature = "testhooks")]
pub use counters::live_context_count;
