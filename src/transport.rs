// src/transport.rs

//! WebSocket front end. Each connection carries one scan: the client sends
//! `{"url": "..."}` and receives the scan's events as JSON text frames.

use std::net::SocketAddr;
use std::time::Duration;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, error, info, warn};

use crate::core::events::ScanEvent;
use crate::core::orchestrator::ScanOrchestrator;
use crate::core::probe::Prober;

pub const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";
pub const NO_URL_PROVIDED: &str = "No URL provided";

const EVENT_BUFFER: usize = 16;

type WsSender = SplitSink<WebSocketStream<TcpStream>, Message>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Accepts connections forever, running one session task per client.
pub async fn serve<P>(listener: TcpListener, prober: P, probe_deadline: Duration) -> Result<(), TransportError>
where
    P: Prober + Clone + 'static,
{
    info!(addr = %listener.local_addr()?, "Listening for scan requests.");

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let prober = prober.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, prober, probe_deadline).await {
                        warn!(%peer, error = %e, "Session ended with an error.");
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "Accept error.");
            }
        }
    }
}

async fn handle_connection<P>(
    stream: TcpStream,
    peer: SocketAddr,
    prober: P,
    probe_deadline: Duration,
) -> Result<(), TransportError>
where
    P: Prober + 'static,
{
    let ws_stream = accept_async(stream).await?;
    info!(%peer, "WebSocket connection established.");
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Malformed requests are answered and the client may try again.
    let url = loop {
        let text = match ws_receiver.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    send_event(&mut ws_sender, &ScanEvent::error(INVALID_MESSAGE_FORMAT)).await?;
                    continue;
                }
            },
            Some(Ok(Message::Close(_))) | None => {
                info!(%peer, "WebSocket connection closed.");
                return Ok(());
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        };

        match parse_request(&text) {
            Ok(url) => break url,
            Err(reason) => {
                debug!(%peer, reason, "Rejected scan request.");
                send_event(&mut ws_sender, &ScanEvent::error(reason)).await?;
            }
        }
    };

    info!(%peer, url = %url, "Scan requested.");
    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(async move {
        let mut orchestrator = ScanOrchestrator::new(prober, probe_deadline);
        if let Err(e) = orchestrator.run(&url, &tx).await {
            warn!(url = %url, error = %e, "Scan did not finish.");
        }
    });

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if let Err(e) = send_event(&mut ws_sender, &event).await {
                    warn!(%peer, error = %e, "Could not deliver event, dropping the scan.");
                    return Err(e);
                }
                if event.is_terminal() {
                    break;
                }
            }
            message = ws_receiver.next() => match message {
                Some(Ok(Message::Close(_))) | None => {
                    info!(%peer, "Client left during the scan.");
                    return Ok(());
                }
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(_)) => debug!(%peer, "Ignoring message received while a scan is running."),
            }
        }
    }

    ws_sender.close().await?;
    info!(%peer, "Session complete, connection closed.");
    Ok(())
}

async fn send_event(ws_sender: &mut WsSender, event: &ScanEvent) -> Result<(), TransportError> {
    let json = serde_json::to_string(event)?;
    ws_sender.send(Message::Text(json)).await?;
    Ok(())
}

/// Extracts the target from a request frame, or the error message to answer with.
pub fn parse_request(text: &str) -> Result<String, &'static str> {
    let value: Value = serde_json::from_str(text).map_err(|_| INVALID_MESSAGE_FORMAT)?;
    if value.is_null() {
        return Err(INVALID_MESSAGE_FORMAT);
    }
    match value.get("url").and_then(Value::as_str) {
        Some(url) if !url.trim().is_empty() => Ok(url.to_string()),
        _ => Err(NO_URL_PROVIDED),
    }
}
