//! End-to-end demo: one negotiated session driven to a running display
//! and back down again.
//!
//! A stand-in remote X server is bound on loopback (first free display
//! number), a session is minted the way the negotiation subsystem would,
//! and the seat manager brings the display up over real TCP. After a
//! couple of seconds the server goes away, the seat fails, and the
//! framework tears it down: the full life of a remote login, in one
//! process.

use std::time::Duration;

use narthex::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Stand in for the remote X server the session's authority points at.
    let secret = Secret::generate();
    let (display_number, listener) = bind_display("127.0.0.1").await?;
    tracing::info!(%display_number, "stand-in X server listening");
    let server = tokio::spawn(stub_server(listener, secret.clone()));

    // What negotiation would hand over: a session owning the credential.
    let authority = Authority::new(display_number, "127.0.0.1", secret);
    let mut registry = SessionRegistry::new();
    registry.register(XdmcpSession::new(SessionId(1), display_number, authority))?;
    let session = registry.claim(SessionId(1))?;

    let mut manager = SeatManager::new(TcpConnector::default());
    let seat = manager.add_session(session);
    let display = manager.bring_up(seat).await?;
    let display_value = &display;
    tracing::info!(%seat, display = %display_value, "seat is up");

    // The remote client "disconnects" shortly: the server drops, the
    // display loses its endpoint, the seat fails.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        server.abort();
    });

    while let Some(event) = manager.next_event().await {
        tracing::info!(?event, "seat event");
        if let SeatEvent::StateChanged {
            seat,
            to: SeatState::Failed,
            ..
        } = event
        {
            manager.remove_seat(seat).await?;
            registry.forget(SessionId(1));
            break;
        }
    }

    manager.shutdown().await;
    tracing::info!("demo finished");
    Ok(())
}

/// Grabs the first free display number on `host` (display n ↔ TCP port
/// 6000 + n).
async fn bind_display(host: &str) -> std::io::Result<(DisplayNumber, TcpListener)> {
    for number in 0..64u16 {
        let number = DisplayNumber(number);
        if let Ok(listener) = TcpListener::bind((host, number.port())).await {
            return Ok((number, listener));
        }
    }
    Err(std::io::Error::other("no free display number on loopback"))
}

/// Accepts clients and speaks just enough of the connection-setup
/// exchange to validate the presented cookie. Clients are served inline
/// so that aborting this task drops their connections too.
async fn stub_server(listener: TcpListener, secret: Secret) {
    loop {
        let Ok((mut stream, peer)) = listener.accept().await else {
            return;
        };
        tracing::info!(%peer, "stand-in X server accepted a client");
        if let Err(e) = serve_client(&mut stream, &secret).await {
            tracing::debug!(error = %e, "stand-in client ended");
        }
    }
}

async fn serve_client(stream: &mut TcpStream, secret: &Secret) -> std::io::Result<()> {
    // Setup request: 12-byte fixed prefix, padded auth name, padded auth
    // data.
    let mut prefix = [0u8; 12];
    stream.read_exact(&mut prefix).await?;
    let name_len = u16::from_le_bytes([prefix[6], prefix[7]]) as usize;
    let data_len = u16::from_le_bytes([prefix[8], prefix[9]]) as usize;
    let padded = |n: usize| n.div_ceil(4) * 4;
    let mut rest = vec![0u8; padded(name_len) + padded(data_len)];
    stream.read_exact(&mut rest).await?;
    let presented = &rest[padded(name_len)..padded(name_len) + data_len];

    if presented == secret.as_bytes() {
        stream.write_all(&[1, 0, 11, 0, 0, 0, 0, 0]).await?;
        // Hold the connection until the client goes away.
        let mut buf = [0u8; 64];
        while stream.read(&mut buf).await? > 0 {}
    } else {
        let reason = b"invalid cookie";
        let units = reason.len().div_ceil(4);
        let mut reply = vec![0u8, reason.len() as u8, 11, 0, 0, 0];
        reply.extend_from_slice(&(units as u16).to_le_bytes());
        reply.extend_from_slice(reason);
        while reply.len() < 8 + units * 4 {
            reply.push(0);
        }
        stream.write_all(&reply).await?;
    }
    Ok(())
}
