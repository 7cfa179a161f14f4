// Copyright (C) Microsoft Corporation. All rights reserved.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::*;

#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum HandleType {
    PrivateKey,
    PublicKey,
    SigContext,
}

struct Entry {
    handle_type: HandleType,
    addr: usize,
}

/// Handle table
#[derive(Default)]
pub(crate) struct HandleTable {
    table: RwLock<HandleTableInner>,
}

impl HandleTable {
    pub(crate) fn alloc_handle<T>(&self, handle_type: HandleType, obj: Box<T>) -> SignetHandle {
        let mut table = self.table.write();
        table.alloc_handle(handle_type, obj)
    }

    #[allow(unsafe_code)]
    pub(crate) fn as_ref<T>(
        &self,
        handle: SignetHandle,
        handle_type: HandleType,
    ) -> Result<&T, SignetStatus> {
        let table = self.table.read();
        table.as_ref(handle, handle_type)
    }

    #[allow(unsafe_code)]
    pub(crate) fn as_mut<T>(
        &self,
        handle: SignetHandle,
        handle_type: HandleType,
    ) -> Result<&mut T, SignetStatus> {
        let mut table = self.table.write();
        table.as_mut(handle, handle_type)
    }

    /// Removes a handle and returns ownership of the object behind it.
    #[allow(unsafe_code)]
    pub(crate) fn free_handle<T>(
        &self,
        handle: SignetHandle,
        handle_type: HandleType,
    ) -> Result<Box<T>, SignetStatus> {
        let mut table = self.table.write();
        table.free_handle(handle, handle_type)
    }

    /// Get the handle type for a given handle.
    pub(crate) fn get_handle_type(&self, handle: SignetHandle) -> Result<HandleType, SignetStatus> {
        let table = self.table.read();
        table.get_handle_type(handle)
    }
}

#[derive(Default)]
struct HandleTableInner {
    table: HashMap<SignetHandle, Entry>,
    id_counter: u32,
}

impl HandleTableInner {
    fn alloc_handle<T>(&mut self, handle_type: HandleType, obj: Box<T>) -> SignetHandle {
        while self.id_counter == 0 || self.table.contains_key(&SignetHandle(self.id_counter)) {
            self.id_counter = self.id_counter.wrapping_add(1);
        }
        let id = SignetHandle(self.id_counter);
        let addr = Box::leak(obj) as *mut T as usize;
        self.table.insert(id, Entry { handle_type, addr });
        id
    }

    fn addr(&self, handle: SignetHandle, handle_type: HandleType) -> Result<usize, SignetStatus> {
        self.table
            .get(&handle)
            .filter(|entry| entry.handle_type == handle_type)
            .map(|entry| entry.addr)
            .ok_or(SignetStatus::InvalidHandle)
    }

    #[allow(unsafe_code)]
    fn as_ref<'a, T>(
        &self,
        handle: SignetHandle,
        handle_type: HandleType,
    ) -> Result<&'a T, SignetStatus> {
        self.addr(handle, handle_type)
            // SAFETY: entries only ever hold addresses of leaked boxes of
            // the type recorded next to them.
            .map(|addr| unsafe { &*(addr as *const T) })
    }

    #[allow(unsafe_code)]
    fn as_mut<'a, T>(
        &mut self,
        handle: SignetHandle,
        handle_type: HandleType,
    ) -> Result<&'a mut T, SignetStatus> {
        self.addr(handle, handle_type)
            // SAFETY: entries only ever hold addresses of leaked boxes of
            // the type recorded next to them.
            .map(|addr| unsafe { &mut *(addr as *mut T) })
    }

    #[allow(unsafe_code)]
    fn free_handle<T>(
        &mut self,
        handle: SignetHandle,
        handle_type: HandleType,
    ) -> Result<Box<T>, SignetStatus> {
        // Type-checked before removal; a mismatched handle must survive.
        self.addr(handle, handle_type)?;
        let entry = self
            .table
            .remove(&handle)
            .ok_or(SignetStatus::InvalidHandle)?;
        // SAFETY: the entry has been removed from the table, so ownership
        // of the leaked box returns to the caller.
        Ok(unsafe { Box::from_raw(entry.addr as *mut T) })
    }

    fn get_handle_type(&self, handle: SignetHandle) -> Result<HandleType, SignetStatus> {
        self.table
            .get(&handle)
            .map(|entry| entry.handle_type)
            .ok_or(SignetStatus::InvalidHandle)
    }
}
