// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! Signet signing-context lifecycle API.
//!
//! This crate implements the bridge between a foreign caller holding
//! opaque handles and the native cryptographic contexts those handles
//! stand for. It owns the lifecycle protocol: algorithm configuration is
//! snapshotted at creation time, RSA-PSS parameters are synthesized into
//! an arena whose lifetime tracks the context, every failure path
//! destroys whatever it allocated, and a context is destroyed exactly
//! once, either by the finalize call that consumes it or by its owner's
//! release.
//!
//! The cryptographic math lives in `signet-crypto`; the ABI surface a
//! managed object actually calls lives in `signet-native`.

mod algo;
mod context;
mod error;
mod pss;
mod raw;

pub use algo::*;
pub use context::*;
pub use error::*;
pub use raw::*;
