// Copyright (C) Microsoft Corporation. All rights reserved.

//! Failure injection for lifecycle tests.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

static FAIL_NEXT_WRAP: AtomicBool = AtomicBool::new(false);

/// Makes the next context-adoption attempt fail as if allocation failed.
///
/// Used to prove that a native context created before the failure point
/// is destroyed rather than leaked.
pub fn fail_next_wrap() {
    FAIL_NEXT_WRAP.store(true, Ordering::SeqCst);
}

pub(crate) fn take_fail_next_wrap() -> bool {
    FAIL_NEXT_WRAP.swap(false, Ordering::SeqCst)
}
