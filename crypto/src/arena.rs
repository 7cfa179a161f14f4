// Copyright (C) Microsoft Corporation. All rights reserved.

//! Scratch arena backing algorithm-identifier structures.
//!
//! RSA-PSS is parametric: its algorithm identifier cannot be looked up as
//! a constant and has to be constructed per operation. The records built
//! here are referenced by native contexts for as long as the context
//! lives, so they are allocated from an [`Arena`] whose lifetime tracks
//! the context rather than the call stack that built the parameters.

use crate::AlgorithmTag;
use crate::HashKind;

/// Synthesized RSA-PSS parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PssParams {
    /// Message digest.
    pub hash: HashKind,

    /// Digest used by the MGF1 mask generation function.
    pub mgf_hash: HashKind,

    /// Salt length in bytes.
    pub salt_len: u32,

    /// Trailer field; always 1.
    pub trailer_field: u8,
}

/// A signature algorithm identifier plus any algorithm-specific
/// parameters.
#[derive(Debug)]
pub struct AlgorithmId {
    /// Algorithm tag.
    pub tag: AlgorithmTag,

    /// PSS parameters; null for algorithms that carry none.
    pub pss: *const PssParams,
}

/// Bulk-lifetime allocator for [`AlgorithmId`] and [`PssParams`] records.
///
/// Records are boxed individually, so the pointers handed out stay valid
/// until the arena is dropped regardless of later allocations. A context
/// holding such a pointer must be destroyed before the arena that backs
/// it; the owning layer keeps both in one place to make that ordering
/// structural.
#[derive(Default)]
pub struct Arena {
    alg_ids: Vec<Box<AlgorithmId>>,
    pss: Vec<Box<PssParams>>,
}

impl Arena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a PSS parameter record, returning its stable address.
    pub fn alloc_pss_params(&mut self, params: PssParams) -> *const PssParams {
        let boxed = Box::new(params);
        let ptr = &*boxed as *const PssParams;
        self.pss.push(boxed);
        ptr
    }

    /// Allocates an algorithm identifier, returning its stable address.
    ///
    /// Pass a null `pss` pointer for algorithms without parameters.
    pub fn alloc_algorithm_id(
        &mut self,
        tag: AlgorithmTag,
        pss: *const PssParams,
    ) -> *const AlgorithmId {
        let boxed = Box::new(AlgorithmId { tag, pss });
        let ptr = &*boxed as *const AlgorithmId;
        self.alg_ids.push(boxed);
        ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_survive_growth() {
        let mut arena = Arena::new();
        let params = arena.alloc_pss_params(PssParams {
            hash: HashKind::Sha256,
            mgf_hash: HashKind::Sha256,
            salt_len: 32,
            trailer_field: 1,
        });
        let alg = arena.alloc_algorithm_id(AlgorithmTag::RsaPss, params);

        for _ in 0..64 {
            arena.alloc_pss_params(PssParams {
                hash: HashKind::Sha1,
                mgf_hash: HashKind::Sha1,
                salt_len: 20,
                trailer_field: 1,
            });
        }

        // SAFETY: the arena is still alive and records are never moved.
        let alg = unsafe { &*alg };
        assert_eq!(alg.tag, AlgorithmTag::RsaPss);
        let params = unsafe { &*alg.pss };
        assert_eq!(params.hash, HashKind::Sha256);
        assert_eq!(params.salt_len, 32);
    }
}
