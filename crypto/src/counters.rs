// Copyright (C) Microsoft Corporation. All rights reserved.

//! Test-only visibility into live native resources.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

static LIVE_CONTEXTS: AtomicUsize = AtomicUsize::new(0);

/// Number of sign/verify contexts currently alive in the process.
pub fn live_context_count() -> usize {
    LIVE_CONTEXTS.load(Ordering::SeqCst)
}

pub(crate) fn context_created() {
    LIVE_CONTEXTS.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn context_dropped() {
    LIVE_CONTEXTS.fetch_sub(1, Ordering::SeqCst);
}
