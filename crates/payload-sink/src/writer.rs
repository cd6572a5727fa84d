//! Line-oriented sink over any `std::io::Write`.

use crate::traits::PayloadSink;
use anyhow::Result;
use std::io::{self, Stdout, Write};

/// Writes each payload followed by a newline.
///
/// Used for dry runs, where payloads go to stdout instead of the network.
pub struct WriterSink<W> {
    writer: W,
    written: u64,
}

/// Sink printing payloads to stdout.
pub type StdoutSink = WriterSink<Stdout>;

impl StdoutSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of payloads written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> PayloadSink for WriterSink<W> {
    async fn send_payload(&mut self, payload: &[u8]) -> Result<()> {
        self.writer.write_all(payload)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
