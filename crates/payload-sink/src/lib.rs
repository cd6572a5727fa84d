//! Payload sink abstraction.
//!
//! This crate defines the `PayloadSink` trait that the seeder writes rendered
//! payloads to, with two implementations:
//!
//! - [`WebSocketSink`] - one text frame per payload over an authenticated
//!   WebSocket connection
//! - [`WriterSink`] / [`StdoutSink`] - one line per payload, for dry runs

mod traits;
mod websocket;
mod writer;

pub use traits::PayloadSink;
pub use websocket::{ConnectionError, HandshakeHeader, WebSocketSink};
pub use writer::{StdoutSink, WriterSink};
