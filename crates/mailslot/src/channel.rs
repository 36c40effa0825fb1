// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-message channel slots and the atomic commit/deliver protocol.
//!
//! A channel is a latest-value cache, not a queue: each successful write
//! replaces the committed message wholesale, and reads never consume it.
//!
//! # Architecture
//!
//! ```text
//! Channel
//! +-- id: ChannelId              positive, unique within its endpoint
//! +-- cell: Mutex<MessageCell>
//!     +-- bytes: Vec<u8>         committed message, replaced as a whole
//!     +-- present: bool          false until the first successful write
//! ```
//!
//! # Atomicity
//!
//! A write transfers into a fresh buffer first and swaps it in only after the
//! full transfer succeeded, so the committed message is observably either the
//! pre-write value or the complete new one. A read validates and copies the
//! committed bytes under the cell lock, then transfers from that copy, so a
//! concurrent writer can never tear what the reader delivers.

use crate::config::MAX_MESSAGE_LEN;
use crate::error::{Error, Result};
use crate::transfer::{TransferSink, TransferSource};
use parking_lot::Mutex;

/// Channel id type. Positive, unique within an endpoint; 0 is reserved.
pub type ChannelId = u32;

/// Message slot state, as observed at a single instant.
///
/// Transitions: `Absent -> Present` on the first successful write,
/// `Present -> Present` on every later one. Nothing ever returns a slot to
/// `Absent`; there is no clear or delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No successful write has reached this channel yet.
    Absent,
    /// A message of the given length is committed.
    Present(usize),
}

/// Committed message storage. Length 0 only while `present` is false.
struct MessageCell {
    bytes: Vec<u8>,
    present: bool,
}

/// A single-message mailbox slot within an endpoint.
///
/// Channels are created lazily by the owning endpoint's table and live until
/// service teardown. All message access goes through the cell mutex; callers
/// on separate threads can hit the same channel freely.
pub struct Channel {
    id: ChannelId,
    cell: Mutex<MessageCell>,
}

impl Channel {
    pub(crate) fn new(id: ChannelId) -> Self {
        Self {
            id,
            cell: Mutex::new(MessageCell {
                bytes: Vec::new(),
                present: false,
            }),
        }
    }

    /// This channel's id within its endpoint.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Observe the slot state at this instant.
    pub fn state(&self) -> SlotState {
        let cell = self.cell.lock();
        if cell.present {
            SlotState::Present(cell.bytes.len())
        } else {
            SlotState::Absent
        }
    }

    /// Commit a fresh message transferred from `source`.
    ///
    /// The committed message is untouched until the whole transfer has
    /// succeeded; a mid-transfer fault discards only the fresh buffer.
    /// Returns the number of bytes accepted.
    pub(crate) fn commit_from(&self, source: &mut dyn TransferSource) -> Result<usize> {
        let len = source.len();
        if len == 0 || len > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLarge(len));
        }

        let mut fresh = Vec::new();
        fresh.try_reserve_exact(len)?;
        for index in 0..len {
            match source.fetch(index) {
                Ok(byte) => fresh.push(byte),
                Err(err) => {
                    log::warn!(
                        "[Channel {}] write transfer faulted at byte {}/{}",
                        self.id,
                        index,
                        len
                    );
                    return Err(err);
                }
            }
        }

        let mut cell = self.cell.lock();
        cell.bytes = fresh;
        cell.present = true;
        drop(cell);

        log::debug!("[Channel {}] committed {} byte message", self.id, len);
        Ok(len)
    }

    /// Deliver the committed message into `sink`.
    ///
    /// Non-destructive: the stored message survives the read unchanged,
    /// whatever the outcome. Returns the number of bytes delivered, equal to
    /// the stored message length.
    pub(crate) fn deliver_into(&self, sink: &mut dyn TransferSink) -> Result<usize> {
        // Validate and copy under the cell lock so length and bytes agree
        // even while writers land; the transfer itself runs lock-free.
        let delivery = {
            let cell = self.cell.lock();
            if !cell.present {
                return Err(Error::WouldBlock);
            }
            if sink.capacity() < cell.bytes.len() {
                return Err(Error::InsufficientSpace {
                    needed: cell.bytes.len(),
                    capacity: sink.capacity(),
                });
            }
            let mut delivery = Vec::new();
            delivery.try_reserve_exact(cell.bytes.len())?;
            delivery.extend_from_slice(&cell.bytes);
            delivery
        };

        let backup = sink.snapshot()?;
        for (index, &byte) in delivery.iter().enumerate() {
            if let Err(err) = sink.store(index, byte) {
                log::warn!(
                    "[Channel {}] read transfer faulted at byte {}/{}, restoring caller buffer",
                    self.id,
                    index,
                    delivery.len()
                );
                sink.restore(&backup);
                return Err(err);
            }
        }

        Ok(delivery.len())
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::{SliceSink, SliceSource};

    /// Source that faults once `fault_at` bytes have been fetched.
    struct FaultingSource<'a> {
        inner: SliceSource<'a>,
        fault_at: usize,
    }

    impl TransferSource for FaultingSource<'_> {
        fn len(&self) -> usize {
            self.inner.len()
        }

        fn fetch(&mut self, index: usize) -> Result<u8> {
            if index >= self.fault_at {
                return Err(Error::TransferFault(index));
            }
            self.inner.fetch(index)
        }
    }

    fn write(channel: &Channel, message: &[u8]) -> Result<usize> {
        channel.commit_from(&mut SliceSource::new(message))
    }

    fn read(channel: &Channel, buf: &mut [u8]) -> Result<usize> {
        channel.deliver_into(&mut SliceSink::new(buf))
    }

    #[test]
    fn starts_absent() {
        let channel = Channel::new(3);
        assert_eq!(channel.state(), SlotState::Absent);
        assert_eq!(channel.id(), 3);
    }

    #[test]
    fn commit_then_deliver_round_trips() {
        let channel = Channel::new(3);
        assert_eq!(write(&channel, b"hello").unwrap(), 5);
        assert_eq!(channel.state(), SlotState::Present(5));

        let mut buf = [0u8; 128];
        let n = read(&channel, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn repeated_reads_return_the_same_message() {
        let channel = Channel::new(1);
        write(&channel, b"cache").unwrap();

        for _ in 0..3 {
            let mut buf = [0u8; 16];
            let n = read(&channel, &mut buf).unwrap();
            assert_eq!(&buf[..n], b"cache");
        }
        assert_eq!(channel.state(), SlotState::Present(5));
    }

    #[test]
    fn overwrite_leaves_no_residue_from_longer_message() {
        let channel = Channel::new(3);
        write(&channel, b"hello").unwrap();
        write(&channel, b"hi").unwrap();

        let mut buf = [0u8; 128];
        let n = read(&channel, &mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..n], b"hi");
    }

    #[test]
    fn empty_write_is_too_large_and_leaves_slot_untouched() {
        let channel = Channel::new(1);
        write(&channel, b"keep").unwrap();

        assert!(matches!(write(&channel, b""), Err(Error::MessageTooLarge(0))));

        let mut buf = [0u8; 8];
        let n = read(&channel, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"keep");
    }

    #[test]
    fn oversized_write_is_rejected() {
        let channel = Channel::new(1);
        let oversized = [0x5au8; MAX_MESSAGE_LEN + 1];
        assert!(matches!(
            write(&channel, &oversized),
            Err(Error::MessageTooLarge(len)) if len == MAX_MESSAGE_LEN + 1
        ));
        assert_eq!(channel.state(), SlotState::Absent);
    }

    #[test]
    fn max_length_write_is_accepted() {
        let channel = Channel::new(1);
        let message = [0xa5u8; MAX_MESSAGE_LEN];
        assert_eq!(write(&channel, &message).unwrap(), MAX_MESSAGE_LEN);

        let mut buf = [0u8; MAX_MESSAGE_LEN];
        assert_eq!(read(&channel, &mut buf).unwrap(), MAX_MESSAGE_LEN);
        assert_eq!(buf, message);
    }

    #[test]
    fn read_before_any_write_would_block() {
        let channel = Channel::new(7);
        let mut buf = [0u8; 128];
        assert!(matches!(read(&channel, &mut buf), Err(Error::WouldBlock)));
    }

    #[test]
    fn short_destination_is_rejected_without_side_effects() {
        let channel = Channel::new(1);
        write(&channel, b"twelve bytes").unwrap();

        let mut buf = *b"????";
        let err = read(&channel, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientSpace {
                needed: 12,
                capacity: 4
            }
        ));
        // Neither side moved: destination bytes and slot state are intact.
        assert_eq!(&buf, b"????");
        assert_eq!(channel.state(), SlotState::Present(12));
    }

    #[test]
    fn faulted_write_rolls_back_to_prior_message() {
        let channel = Channel::new(1);
        write(&channel, b"prior").unwrap();

        let mut source = FaultingSource {
            inner: SliceSource::new(b"replacement"),
            fault_at: 6,
        };
        assert!(matches!(
            channel.commit_from(&mut source),
            Err(Error::TransferFault(6))
        ));

        let mut buf = [0u8; 32];
        let n = read(&channel, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"prior");
    }

    #[test]
    fn faulted_write_on_absent_channel_stays_absent() {
        let channel = Channel::new(1);
        let mut source = FaultingSource {
            inner: SliceSource::new(b"never lands"),
            fault_at: 0,
        };
        assert!(channel.commit_from(&mut source).is_err());
        assert_eq!(channel.state(), SlotState::Absent);
    }
}
