// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! mailslot-recv - read a mailbox channel's message to standard output
//!
//! Opens the addressed endpoint in this process's registry, binds, performs
//! one read with a full-size destination, and writes the delivered bytes
//! verbatim to stdout. Any failure goes to stderr with a nonzero exit status.
//! No retries, no loops - an empty channel reports WouldBlock and exits.

use clap::Parser;
use mailslot::{MailboxRegistry, MAX_MESSAGE_LEN};
use std::io::Write;

/// Read a mailbox channel's message to standard output
#[derive(Parser, Debug)]
#[command(name = "mailslot-recv")]
#[command(about = "Read a mailbox channel's message to standard output")]
struct Args {
    /// Environment-assigned endpoint id
    endpoint: u32,

    /// Channel id (positive; 0 is reserved)
    channel: u32,
}

fn main() {
    let args = Args::parse();

    let registry = MailboxRegistry::global();
    let mut conn = match registry.open(args.endpoint) {
        Ok(conn) => conn,
        Err(err) => fail("open", &err),
    };

    if let Err(err) = conn.bind(args.channel) {
        fail("bind", &err);
    }

    let mut buf = [0u8; MAX_MESSAGE_LEN];
    let delivered = match conn.read_bytes(&mut buf) {
        Ok(n) => n,
        Err(err) => fail("read", &err),
    };

    if let Err(err) = std::io::stdout().write_all(&buf[..delivered]) {
        eprintln!("mailslot-recv: stdout write failed: {}", err);
        std::process::exit(1);
    }
}

fn fail(op: &str, err: &mailslot::Error) -> ! {
    eprintln!("mailslot-recv: {} failed: {}", op, err);
    std::process::exit(1);
}
