// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Mailslot - Multiplexed In-Process Mailbox Service
//!
//! A two-level addressed mailbox service: clients resolve an endpoint, bind a
//! channel within it, and exchange single, bounded, overwrite-on-write
//! messages. Every channel holds at most the latest committed message, and the
//! commit/deliver protocol is atomic: no observer ever sees a partially
//! written or partially delivered message.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailslot::{MailboxRegistry, Result};
//!
//! fn main() -> Result<()> {
//!     let registry = MailboxRegistry::new();
//!
//!     // Sender: open endpoint 5, bind channel 3, write once
//!     let mut sender = registry.open(5)?;
//!     sender.bind(3)?;
//!     sender.write_bytes(b"hello")?;
//!
//!     // Receiver: independent connection, same address
//!     let mut receiver = registry.open(5)?;
//!     receiver.bind(3)?;
//!     let mut buf = [0u8; 128];
//!     let n = receiver.read_bytes(&mut buf)?;
//!     assert_eq!(&buf[..n], b"hello");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! MailboxRegistry (process-wide)
//! +-- endpoints: Mutex<HashMap<EndpointId, Arc<Endpoint>>>
//!
//! Endpoint (one per id, lazily created, never dropped before teardown)
//! +-- channels: RwLock<HashMap<ChannelId, Arc<Channel>>>
//!
//! Channel (one per positive id within its endpoint)
//! +-- cell: Mutex<MessageCell>   latest committed message, [1,128] bytes
//!
//! Connection (per caller, owns the binding)
//! +-- endpoint: Arc<Endpoint>
//! +-- bound: Option<Arc<Channel>>
//! ```
//!
//! Resolution always hands back a reference scoped to the calling operation;
//! there is no shared "current endpoint/channel" cursor, so independent
//! connections on separate threads never trample each other's addressing.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MailboxRegistry`] | Process-wide endpoint table, entry point |
//! | [`Connection`] | Per-caller binding context with read/write |
//! | [`Endpoint`] | One addressable mailbox device, owns its channels |
//! | [`Channel`] | A single-message slot within an endpoint |
//! | [`TransferSource`] / [`TransferSink`] | Fault-capable boundary transfer |

/// Single-message channel slots and the atomic commit/deliver protocol.
pub mod channel;
/// Protocol constants (message size cap, reserved channel id).
pub mod config;
/// Per-connection binding context and read/write entry points.
pub mod connection;
/// Endpoint records and the per-endpoint channel table.
pub mod endpoint;
/// Error taxonomy for all mailbox operations.
pub mod error;
/// Process-wide endpoint registry.
pub mod registry;
/// Fault-capable boundary transfer contract and slice adapters.
pub mod transfer;

pub use channel::{Channel, ChannelId, SlotState};
pub use config::{MAX_MESSAGE_LEN, RESERVED_CHANNEL_ID};
pub use connection::Connection;
pub use endpoint::{Endpoint, EndpointId};
pub use error::{Error, Result};
pub use registry::MailboxRegistry;
pub use transfer::{SliceSink, SliceSource, TransferSink, TransferSource};
