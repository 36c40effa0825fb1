// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-connection binding context and the read/write entry points.
//!
//! Each caller owns a [`Connection`]: the endpoint it opened plus an optional
//! bound channel. The binding is explicit state threaded through every call -
//! resolution never writes to anything shared, so connections on separate
//! threads cannot redirect each other's reads and writes.

use crate::channel::{Channel, ChannelId};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::transfer::{SliceSink, SliceSource, TransferSink, TransferSource};
use std::sync::Arc;

/// A caller's handle onto one endpoint.
///
/// Obtained from [`MailboxRegistry::open`](crate::MailboxRegistry::open).
/// Binding state machine: `Unbound -> Bound(c)` via [`Connection::bind`],
/// `Bound(c1) -> Bound(c2)` via rebind at any time. Read and write require a
/// bound channel and fail with
/// [`Error::PreconditionFailed`] otherwise.
pub struct Connection {
    endpoint: Arc<Endpoint>,
    bound: Option<Arc<Channel>>,
}

impl Connection {
    pub(crate) fn new(endpoint: Arc<Endpoint>) -> Self {
        Self {
            endpoint,
            bound: None,
        }
    }

    /// The endpoint this connection was opened on.
    pub fn endpoint(&self) -> &Arc<Endpoint> {
        &self.endpoint
    }

    /// Select the channel for subsequent reads and writes, creating it on
    /// first reference. Replaces any prior binding; repeated identical binds
    /// are no-ops.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for the reserved id 0;
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the channel table
    /// cannot grow. Either failure leaves the prior binding in place.
    pub fn bind(&mut self, channel_id: ChannelId) -> Result<()> {
        let channel = self.endpoint.find_or_create(channel_id)?;
        log::debug!(
            "[Endpoint {}] connection bound to channel {}",
            self.endpoint.id(),
            channel_id
        );
        self.bound = Some(channel);
        Ok(())
    }

    /// The currently bound channel.
    ///
    /// # Errors
    ///
    /// [`Error::PreconditionFailed`] if this connection has never bound.
    pub fn bound_channel(&self) -> Result<&Arc<Channel>> {
        self.bound.as_ref().ok_or(Error::PreconditionFailed)
    }

    /// Write one message from `source` to the bound channel.
    ///
    /// Atomic: on any failure the channel keeps its prior message; on success
    /// the whole new message is committed and its length returned.
    pub fn write(&self, source: &mut dyn TransferSource) -> Result<usize> {
        self.bound_channel()?.commit_from(source)
    }

    /// Read the bound channel's message into `sink`.
    ///
    /// Non-destructive: the stored message is a latest-value cache and
    /// survives the read. Returns the delivered length.
    pub fn read(&self, sink: &mut dyn TransferSink) -> Result<usize> {
        self.bound_channel()?.deliver_into(sink)
    }

    /// [`Connection::write`] over an in-process byte slice.
    pub fn write_bytes(&self, message: &[u8]) -> Result<usize> {
        self.write(&mut SliceSource::new(message))
    }

    /// [`Connection::read`] into an in-process byte slice.
    pub fn read_bytes(&self, destination: &mut [u8]) -> Result<usize> {
        self.read(&mut SliceSink::new(destination))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint.id())
            .field("bound", &self.bound.as_ref().map(|c| c.id()))
            .finish()
    }
}
