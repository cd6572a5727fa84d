//! WebSocket sink.

use crate::traits::PayloadSink;
use anyhow::{Context, Result};
use futures::SinkExt;
use std::fmt;
use std::str::FromStr;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue, StatusCode};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

/// Error type for establishing the WebSocket connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The target is not a usable ws:// or wss:// URL
    #[error("Invalid WebSocket target '{target}': {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: tungstenite::Error,
    },

    /// A handshake header that is malformed or not a valid HTTP header
    #[error("Invalid handshake header '{0}', expected 'name: value'")]
    InvalidHeader(String),

    /// The TCP/TLS dial or the upgrade request failed
    #[error("Failed to dial {target}: {source}")]
    Dial {
        target: String,
        #[source]
        source: tungstenite::Error,
    },

    /// The server answered the upgrade with something other than 101
    #[error("Handshake with {target} answered {status}, expected 101 Switching Protocols")]
    Handshake { target: String, status: u16 },
}

/// One extra header sent with the upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeHeader {
    pub name: String,
    pub value: String,
}

impl FromStr for HandshakeHeader {
    type Err = ConnectionError;

    /// Parse `"name: value"`, splitting on the first `:` and trimming both sides.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once(':')
            .ok_or_else(|| ConnectionError::InvalidHeader(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConnectionError::InvalidHeader(s.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for HandshakeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Sends each payload as one text frame over a WebSocket connection.
pub struct WebSocketSink {
    target: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    sent: u64,
}

impl WebSocketSink {
    /// Dial `target` and complete the upgrade handshake.
    ///
    /// Only `101 Switching Protocols` counts as success.
    pub async fn connect(
        target: &str,
        headers: &[HandshakeHeader],
    ) -> Result<Self, ConnectionError> {
        let mut request =
            target
                .into_client_request()
                .map_err(|source| ConnectionError::InvalidTarget {
                    target: target.to_string(),
                    source,
                })?;
        for header in headers {
            let name = HeaderName::from_bytes(header.name.as_bytes())
                .map_err(|_| ConnectionError::InvalidHeader(header.to_string()))?;
            let value = HeaderValue::from_str(&header.value)
                .map_err(|_| ConnectionError::InvalidHeader(header.to_string()))?;
            request.headers_mut().insert(name, value);
        }

        debug!("Connecting to {} with {} extra header(s)", target, headers.len());
        let (stream, response) = match connect_async(request).await {
            Ok(connected) => connected,
            Err(tungstenite::Error::Http(response)) => {
                return Err(ConnectionError::Handshake {
                    target: target.to_string(),
                    status: response.status().as_u16(),
                })
            }
            Err(source) => {
                return Err(ConnectionError::Dial {
                    target: target.to_string(),
                    source,
                })
            }
        };

        check_handshake_status(target, response.status())?;
        info!("Connected to {}", target);

        Ok(Self {
            target: target.to_string(),
            stream,
            sent: 0,
        })
    }

    /// Number of payloads sent so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

fn check_handshake_status(target: &str, status: StatusCode) -> Result<(), ConnectionError> {
    if status != StatusCode::SWITCHING_PROTOCOLS {
        return Err(ConnectionError::Handshake {
            target: target.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[async_trait::async_trait]
impl PayloadSink for WebSocketSink {
    async fn send_payload(&mut self, payload: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(payload).context("Payload is not valid UTF-8")?;
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .with_context(|| format!("Failed to send payload to {}", self.target))?;
        self.sent += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        debug!("Closing connection to {} after {} payload(s)", self.target, self.sent);
        self.stream
            .close(None)
            .await
            .with_context(|| format!("Failed to close connection to {}", self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_parse_handshake_header() {
        let header: HandshakeHeader = "Authorization: Bearer abc".parse().unwrap();
        assert_eq!(header.name, "Authorization");
        assert_eq!(header.value, "Bearer abc");

        // only the first colon separates name and value
        let header: HandshakeHeader = "X-Origin:http://localhost:8080".parse().unwrap();
        assert_eq!(header.value, "http://localhost:8080");
        assert_eq!(header.to_string(), "X-Origin: http://localhost:8080");

        assert!("no separator".parse::<HandshakeHeader>().is_err());
        assert!(": value".parse::<HandshakeHeader>().is_err());
    }

    #[test]
    fn test_only_101_is_a_successful_handshake() {
        assert!(check_handshake_status("ws://x", StatusCode::SWITCHING_PROTOCOLS).is_ok());
        let err = check_handshake_status("ws://x", StatusCode::OK).unwrap_err();
        assert!(matches!(err, ConnectionError::Handshake { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_invalid_target() {
        let err = WebSocketSink::connect("not a url", &[]).await.err().unwrap();
        assert!(matches!(err, ConnectionError::InvalidTarget { .. }));
    }

    #[tokio::test]
    async fn test_invalid_header_rejected_before_dial() {
        let header = HandshakeHeader {
            name: "Bad Header".to_string(),
            value: "x".to_string(),
        };
        let err = WebSocketSink::connect("ws://127.0.0.1:1/", &[header])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::InvalidHeader(_)));
    }

    #[tokio::test]
    async fn test_send_payloads_to_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            let mut received = Vec::new();
            while let Some(Ok(message)) = ws.next().await {
                match message {
                    Message::Text(text) => received.push(text),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            received
        });

        let header: HandshakeHeader = "X-Token: secret".parse().unwrap();
        let mut sink = WebSocketSink::connect(&format!("ws://{addr}/"), &[header])
            .await
            .unwrap();
        sink.send_payload(br#"{"n":1}"#).await.unwrap();
        sink.send_payload(br#"{"n":2}"#).await.unwrap();
        assert_eq!(sink.sent(), 2);
        sink.close().await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received, vec![r#"{"n":1}"#.to_string(), r#"{"n":2}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_non_upgrade_response_is_rejected() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut tcp, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = tcp.read(&mut buf).await;
            let _ = tcp
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                .await;
        });

        let err = WebSocketSink::connect(&format!("ws://{addr}/"), &[])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::Handshake { status: 200, .. }));
    }
}
