//! `/ws/link_files`: one JSON request in, one text line per event out, then close.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use tokio::sync::mpsc;
use tokio::task;

use crate::models::link::{LinkEvent, LinkRequest};
use crate::server::AppState;
use crate::services::link::HardlinkEngine;

pub async fn link_files(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let capacity = state.config.channel_capacity.max(1);
    ws.on_upgrade(move |socket| link_session(socket, capacity))
}

async fn link_session(mut socket: WebSocket, capacity: usize) {
    match read_request(&mut socket).await {
        Some(Ok(request)) => stream_link(&mut socket, request, capacity).await,
        Some(Err(reason)) => {
            tracing::warn!(%reason, "malformed link request");
            let _ = socket
                .send(Message::Text(LinkEvent::Rejected(reason).to_string()))
                .await;
        }
        None => {
            tracing::debug!("client left before sending a link request");
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

/// Waits for the first data frame. `None` when the client goes away first.
async fn read_request(socket: &mut WebSocket) -> Option<Result<LinkRequest, String>> {
    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Text(text)) => return Some(parse_request(text.as_bytes())),
            Ok(Message::Binary(bytes)) => return Some(parse_request(&bytes)),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) | Err(_) => return None,
        }
    }
    None
}

fn parse_request(payload: &[u8]) -> Result<LinkRequest, String> {
    serde_json::from_slice(payload).map_err(|err| format!("malformed request: {err}"))
}

async fn stream_link(socket: &mut WebSocket, request: LinkRequest, capacity: usize) {
    tracing::info!(
        items = request.src_files.len(),
        dst = %request.dst_path,
        "link session started"
    );

    let (tx, mut rx) = mpsc::channel::<LinkEvent>(capacity);
    let worker = task::spawn_blocking(move || {
        let mut sink = tx;
        HardlinkEngine::new().run(&request, &mut sink)
    });

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    if socket.send(Message::Text(event.to_string())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Anything after the request is ignored.
                Some(Ok(_)) => {}
            },
        }
    }
    // Closing the receiver is what cancels a still-running engine.
    drop(rx);

    match worker.await {
        Ok(report) => tracing::info!(
            linked = report.summary.linked,
            skipped = report.summary.skipped,
            failed = report.summary.failed,
            cancelled = report.cancelled,
            "link session finished"
        ),
        Err(err) => tracing::error!(error = %err, "link worker failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_reports_malformed_payloads() {
        let ok = parse_request(br#"{"link": true, "src_files": ["/a"], "dst_path": "/b"}"#);
        assert!(ok.is_ok());

        let missing_field = parse_request(br#"{"link": true, "src_files": ["/a"]}"#).unwrap_err();
        assert!(missing_field.starts_with("malformed request:"));

        assert!(parse_request(b"not json").is_err());
    }
}
