// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for mailbox operations.
//!
//! Every failure is returned synchronously to the caller of the failing
//! operation; the engine performs no internal retries. All failures except
//! [`Error::OutOfMemory`] leave engine state exactly as it was before the
//! call.

/// Errors returned by mailslot operations.
///
/// # Example
///
/// ```rust
/// use mailslot::{Error, MailboxRegistry};
///
/// let registry = MailboxRegistry::new();
/// let mut conn = registry.open(5).unwrap();
///
/// match conn.bind(0) {
///     Err(Error::InvalidArgument(msg)) => println!("rejected: {}", msg),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug)]
pub enum Error {
    /// Malformed command parameter (e.g. the reserved channel id 0).
    InvalidArgument(String),
    /// Read or write attempted before any bind on this connection.
    PreconditionFailed,
    /// Write length outside `[1, MAX_MESSAGE_LEN]`.
    MessageTooLarge(usize),
    /// Read of a channel that has never been written. The engine never
    /// suspends waiting for a future write; poll and retry.
    WouldBlock,
    /// Read destination smaller than the stored message.
    InsufficientSpace {
        /// Length of the stored message.
        needed: usize,
        /// Capacity the caller offered.
        capacity: usize,
    },
    /// Allocation failure in the registry, a channel table, or a message
    /// buffer. Structures are never left partially linked.
    OutOfMemory,
    /// Fault while moving bytes across the connection boundary, at the given
    /// byte offset. Distinct from validation failures: the transfer itself
    /// broke partway.
    TransferFault(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::PreconditionFailed => write!(f, "No channel bound on this connection"),
            Error::MessageTooLarge(len) => {
                write!(
                    f,
                    "Message length {} outside [1, {}]",
                    len,
                    crate::config::MAX_MESSAGE_LEN
                )
            }
            Error::WouldBlock => write!(f, "Channel has no message yet"),
            Error::InsufficientSpace { needed, capacity } => {
                write!(
                    f,
                    "Destination capacity {} below stored message length {}",
                    capacity, needed
                )
            }
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::TransferFault(index) => {
                write!(f, "Transfer faulted at byte offset {}", index)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
