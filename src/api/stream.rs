// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Chunked streaming of blocking readers into response bodies.

use axum::body::Bytes;
use std::io::{self, Read};
use tokio_stream::wrappers::ReceiverStream;

const CHUNK_SIZE: usize = 64 * 1024;

/// Drive a blocking reader from a worker task, yielding bounded chunks.
pub(crate) fn chunk_stream(
    mut reader: Box<dyn Read + Send>,
) -> ReceiverStream<Result<Bytes, io::Error>> {
    let (tx, rx) = tokio::sync::mpsc::channel(8);

    tokio::task::spawn_blocking(move || {
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.blocking_send(Ok(Bytes::copy_from_slice(&buf[..n]))).is_err() {
                        // Receiver dropped: client went away.
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });

    ReceiverStream::new(rx)
}
