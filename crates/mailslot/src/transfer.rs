// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fault-capable boundary transfer contract.
//!
//! Message bytes cross the caller/engine boundary one unit at a time, and the
//! caller's side may become inaccessible partway through (the canonical case:
//! a buffer that stops being readable or writable mid-copy). The engine
//! therefore treats every transfer as an operation that can fail at any byte
//! offset, and wraps it in a snapshot/attempt/restore protocol:
//!
//! ```text
//! write:  fresh buffer <-fetch- source     fault => drop fresh, channel untouched
//! read:   sink snapshot, sink <-store- msg fault => restore snapshot to sink
//! ```
//!
//! [`SliceSource`] and [`SliceSink`] adapt plain in-process byte slices; a
//! caller holding a genuinely untrusted boundary implements the traits
//! directly.

use crate::error::{Error, Result};

/// Source of caller bytes for a write. May fault at any offset.
pub trait TransferSource {
    /// Total number of bytes the caller is offering.
    fn len(&self) -> usize;

    /// True if the caller is offering no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the byte at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::TransferFault`] if the caller's buffer became inaccessible at
    /// or before `index`.
    fn fetch(&mut self, index: usize) -> Result<u8>;
}

/// Destination for caller bytes on a read. May fault at any offset.
///
/// The engine snapshots the destination's current contents before the first
/// `store`, and on any fault writes that snapshot back so the caller never
/// observes a partially-filled buffer.
pub trait TransferSink {
    /// Capacity of the caller's destination buffer.
    fn capacity(&self) -> usize;

    /// Read back the destination's current contents.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the backup cannot be allocated;
    /// [`Error::TransferFault`] if the destination is unreadable.
    fn snapshot(&mut self) -> Result<Vec<u8>>;

    /// Store `byte` at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::TransferFault`] if the caller's buffer became inaccessible at
    /// or before `index`.
    fn store(&mut self, index: usize, byte: u8) -> Result<()>;

    /// Best-effort write-back of a previously taken snapshot. Called only on
    /// the fault path; a destination broken beyond restoring keeps whatever
    /// bytes did land.
    fn restore(&mut self, backup: &[u8]);
}

/// Infallible [`TransferSource`] over an in-process byte slice.
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Wrap a message slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl TransferSource for SliceSource<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn fetch(&mut self, index: usize) -> Result<u8> {
        self.bytes
            .get(index)
            .copied()
            .ok_or(Error::TransferFault(index))
    }
}

/// Infallible [`TransferSink`] over an in-process byte slice.
pub struct SliceSink<'a> {
    bytes: &'a mut [u8],
}

impl<'a> SliceSink<'a> {
    /// Wrap a destination slice. Its length is the offered capacity.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }
}

impl TransferSink for SliceSink<'_> {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn snapshot(&mut self) -> Result<Vec<u8>> {
        let mut backup = Vec::new();
        backup.try_reserve_exact(self.bytes.len())?;
        backup.extend_from_slice(self.bytes);
        Ok(backup)
    }

    fn store(&mut self, index: usize, byte: u8) -> Result<()> {
        match self.bytes.get_mut(index) {
            Some(slot) => {
                *slot = byte;
                Ok(())
            }
            None => Err(Error::TransferFault(index)),
        }
    }

    fn restore(&mut self, backup: &[u8]) {
        let n = backup.len().min(self.bytes.len());
        self.bytes[..n].copy_from_slice(&backup[..n]);
    }
}
