//! WebSocket client for the book service
//!
//! One connection, one conversation. The exchange is strict request/reply:
//! `send_command` does not return until the single response to its command
//! has arrived, so a second command can never be in flight.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};

use super::types::{Command, Response};

/// Client holding the open channel to the book service
pub struct BookClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    request_timeout: Duration,
}

impl BookClient {
    /// Open the connection to the service endpoint
    ///
    /// A refused, failed, or timed-out handshake reports the server as
    /// unreachable rather than surfacing the raw transport error.
    pub async fn connect(url: &str, timeouts: &Timeouts) -> Result<Self> {
        let handshake = connect_async(url);
        let (stream, _) = tokio::time::timeout(
            Duration::from_secs(timeouts.connect_secs),
            handshake,
        )
        .await
        .map_err(|_| Error::ServerUnreachable {
            url: url.to_string(),
            reason: format!("no handshake within {} seconds", timeouts.connect_secs),
        })?
        .map_err(|e| Error::ServerUnreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(%url, "connected");

        Ok(Self {
            stream,
            request_timeout: Duration::from_secs(timeouts.request_secs),
        })
    }

    /// Send one command and wait for the single response to it
    pub async fn send_command(&mut self, command: &Command) -> Result<Response> {
        let json = serde_json::to_string(command)?;
        tracing::debug!(frame = %json, "sending");
        self.stream.send(Message::Text(json)).await?;

        let timeout_secs = self.request_timeout.as_secs();
        let text = tokio::time::timeout(self.request_timeout, self.next_text())
            .await
            .map_err(|_| Error::ResponseTimeout(timeout_secs))??;

        tracing::debug!(frame = %text, "received");
        Ok(serde_json::from_str(&text)?)
    }

    /// Read frames until the next text frame arrives
    ///
    /// Control frames are transport noise here; the library answers pings on
    /// its own. A close frame or a drained stream means the server went away
    /// mid-conversation.
    async fn next_text(&mut self) -> Result<String> {
        while let Some(msg) = self.stream.next().await {
            match msg? {
                Message::Text(text) => return Ok(text),
                Message::Close(_) => return Err(Error::ConnectionClosed),
                Message::Ping(_) | Message::Pong(_) => continue,
                other => {
                    tracing::warn!(?other, "ignoring non-text frame");
                }
            }
        }
        Err(Error::ConnectionClosed)
    }

    /// Close the channel
    ///
    /// Called on every exit path; errors are irrelevant once the
    /// conversation is over, so the caller may ignore them.
    pub async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
