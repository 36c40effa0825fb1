// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Endpoint records and the per-endpoint channel table.
//!
//! An endpoint is one addressable mailbox device. Its table maps positive
//! channel ids to [`Channel`] slots, created lazily on first bind and kept
//! for the endpoint's whole lifetime. The table only grows; there is no
//! delete path anywhere in the service.

use crate::channel::{Channel, ChannelId};
use crate::config::RESERVED_CHANNEL_ID;
use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Endpoint id type. Environment-assigned, unique process-wide.
pub type EndpointId = u32;

/// One addressable mailbox device, owning its channel table.
pub struct Endpoint {
    id: EndpointId,
    /// Channels keyed by id. Many readers, few writers: lookups of existing
    /// channels take the read lock only.
    channels: RwLock<HashMap<ChannelId, Arc<Channel>>>,
}

impl Endpoint {
    pub(crate) fn new(id: EndpointId) -> Self {
        Self {
            id,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// This endpoint's environment-assigned id.
    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// Return the channel for `channel_id`, creating it with an absent
    /// message slot on first reference.
    ///
    /// The table enforces the reserved-id invariant itself: id 0 is rejected
    /// here, whatever path the caller came in through.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for the reserved id 0;
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the table cannot
    /// grow. Either failure leaves the table exactly as it was.
    pub fn find_or_create(&self, channel_id: ChannelId) -> Result<Arc<Channel>> {
        if channel_id == RESERVED_CHANNEL_ID {
            return Err(Error::InvalidArgument(format!(
                "channel id {} is reserved",
                RESERVED_CHANNEL_ID
            )));
        }

        if let Some(channel) = self.channels.read().get(&channel_id) {
            return Ok(channel.clone());
        }

        let mut channels = self.channels.write();
        // Re-check under the write lock: another connection may have created
        // the channel between the two acquisitions.
        if let Some(channel) = channels.get(&channel_id) {
            return Ok(channel.clone());
        }

        channels.try_reserve(1)?;
        let channel = Arc::new(Channel::new(channel_id));
        channels.insert(channel_id, channel.clone());
        log::info!(
            "[Endpoint {}] created channel {} (total {})",
            self.id,
            channel_id,
            channels.len()
        );
        Ok(channel)
    }

    /// Number of channels created on this endpoint so far.
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("channel_count", &self.channel_count())
            .finish()
    }
}
