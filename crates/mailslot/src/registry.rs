// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide endpoint registry.
//!
//! The registry owns every [`Endpoint`] for the life of the service: an
//! endpoint is created on first reference and dropped only when the registry
//! itself is torn down. Teardown order falls out of ownership - dropping the
//! registry drops each endpoint, which drops its channel table, which drops
//! each channel's message buffer. A [`Connection`] still holding a channel
//! keeps that channel alive until the connection is gone, so nothing dangles
//! mid-teardown.

use crate::connection::Connection;
use crate::endpoint::{Endpoint, EndpointId};
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Process-wide table of endpoints, keyed by environment-assigned id.
///
/// Most callers go through [`MailboxRegistry::global`]; tests build isolated
/// instances with [`MailboxRegistry::new`].
pub struct MailboxRegistry {
    endpoints: Mutex<HashMap<EndpointId, Arc<Endpoint>>>,
}

impl MailboxRegistry {
    /// Create an empty, isolated registry.
    pub fn new() -> Self {
        Self {
            endpoints: Mutex::new(HashMap::new()),
        }
    }

    /// Get the process-global registry instance.
    pub fn global() -> &'static MailboxRegistry {
        static REGISTRY: OnceLock<MailboxRegistry> = OnceLock::new();
        REGISTRY.get_or_init(MailboxRegistry::new)
    }

    /// Return the endpoint for `id`, creating it with an empty channel table
    /// on first reference. First-seen-wins: every later resolution of the
    /// same id yields the same endpoint.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the table cannot
    /// grow. The failed insert leaves the registry exactly as it was.
    pub fn resolve(&self, id: EndpointId) -> Result<Arc<Endpoint>> {
        let mut endpoints = self.endpoints.lock();

        if let Some(existing) = endpoints.get(&id) {
            return Ok(existing.clone());
        }

        endpoints.try_reserve(1)?;
        let endpoint = Arc::new(Endpoint::new(id));
        endpoints.insert(id, endpoint.clone());
        log::info!("[MailboxRegistry] created endpoint {}", id);
        Ok(endpoint)
    }

    /// Resolve `id` and hand back a fresh, unbound [`Connection`] to it.
    ///
    /// This is the open path: one call per caller, each getting its own
    /// binding context.
    pub fn open(&self, id: EndpointId) -> Result<Connection> {
        let endpoint = self.resolve(id)?;
        log::debug!("[MailboxRegistry] opened connection to endpoint {}", id);
        Ok(Connection::new(endpoint))
    }

    /// Number of endpoints seen so far.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.lock().len()
    }
}

impl Default for MailboxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MailboxRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxRegistry")
            .field("endpoint_count", &self.endpoint_count())
            .finish()
    }
}
