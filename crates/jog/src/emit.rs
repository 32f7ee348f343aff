//! Output emission with broken-pipe awareness.
//!
//! A reader that goes away mid-stream (`jog ... | head`) surfaces as
//! `BrokenPipe` and is treated as benign termination by the boundary; any
//! other write error is fatal.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum EmitError {
    /// The reader side of the output stream went away.
    #[error("output stream closed by reader")]
    BrokenPipe,

    #[error("writing output failed: {0}")]
    Io(#[source] io::Error),
}

/// Writes rendered blocks to the output stream, tracking whether the most
/// recent write was fully flushed (drain-then-exit coordination).
pub struct Emitter<W> {
    writer: W,
    flushed: bool,
}

impl<W: AsyncWrite + Unpin> Emitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            flushed: true,
        }
    }

    /// Write one rendered block and flush it.
    pub async fn emit(&mut self, text: &str) -> Result<(), EmitError> {
        self.flushed = false;
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(classify_io)?;
        self.writer.flush().await.map_err(classify_io)?;
        self.flushed = true;
        Ok(())
    }

    /// Whether the most recent write reached the stream in full.
    pub fn last_write_flushed(&self) -> bool {
        self.flushed
    }
}

fn classify_io(err: io::Error) -> EmitError {
    if err.kind() == io::ErrorKind::BrokenPipe {
        EmitError::BrokenPipe
    } else {
        EmitError::Io(err)
    }
}
