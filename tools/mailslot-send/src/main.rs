// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! mailslot-send - write one message to a mailbox channel
//!
//! Opens the addressed endpoint in this process's registry, issues one bind,
//! performs one write, and exits. Any engine failure goes to stderr with a
//! nonzero exit status. No retries, no loops.

use clap::Parser;
use mailslot::MailboxRegistry;

/// Write one message to a mailbox channel
#[derive(Parser, Debug)]
#[command(name = "mailslot-send")]
#[command(about = "Write one message to a mailbox channel")]
struct Args {
    /// Environment-assigned endpoint id
    endpoint: u32,

    /// Channel id (positive; 0 is reserved)
    channel: u32,

    /// Message text, 1-128 bytes
    message: String,
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

    if let Err(err) = conn.write_bytes(args.message.as_bytes()) {
        fail("write", &err);
    }
}

fn fail(op: &str, err: &mailslot::Error) -> ! {
    eprintln!("mailslot-send: {} failed: {}", op, err);
    std::process::exit(1);
}
