//! PayloadSink trait definition.

use anyhow::Result;

/// Destination for rendered payloads.
///
/// A sink is owned by a single writer and every method takes `&mut self`, so
/// payloads reach the underlying channel one at a time.
///
/// # Usage Pattern
///
/// The orchestrator is generic over the sink:
///
/// ```ignore
/// pub async fn run<S: PayloadSink>(sink: &mut S, payloads: Vec<Vec<u8>>) -> Result<()> {
///     for payload in &payloads {
///         sink.send_payload(payload).await?;
///     }
///     sink.close().await
/// }
/// ```
#[async_trait::async_trait]
pub trait PayloadSink: Send {
    /// Transmit one payload.
    async fn send_payload(&mut self, payload: &[u8]) -> Result<()>;

    /// Flush and release the channel. No payloads are sent afterwards.
    async fn close(&mut self) -> Result<()>;
}
