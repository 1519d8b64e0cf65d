#[path = "../common/mod.rs"]
mod common;

use std::io::Write;
use std::os::unix::net::UnixStream;

use libril::transport::UnixSocketTransport;
use libril::{Command, ConnectionState, Engine, Error, RadioState};

use common::WAIT;

fn engine_over(stream: UnixStream) -> Engine {
    Engine::builder()
        .with_transport(Box::new(UnixSocketTransport::from_stream(stream)))
        .build()
        .unwrap()
}

#[test]
fn oversized_length_prefix_drops_the_connection() -> anyhow::Result<()> {
    let (ours, mut theirs) = UnixStream::pair()?;
    let engine = engine_over(ours);
    engine.connect()?;
    let pending = engine.send(Command::GetImei)?;

    // 1 MiB announced; far past the frame limit
    theirs.write_all(&[0x00, 0x10, 0x00, 0x00])?;

    assert!(matches!(pending.wait_timeout(WAIT), Err(Error::Disconnected)));
    engine.disconnect()?;
    assert_eq!(engine.state(), ConnectionState::Disconnected);
    assert_eq!(engine.radio_state(), RadioState::Unavailable);
    Ok(())
}

#[test]
fn peer_closing_mid_frame_cancels_pending() -> anyhow::Result<()> {
    let (ours, mut theirs) = UnixStream::pair()?;
    let engine = engine_over(ours);
    engine.connect()?;
    let pending = engine.send(Command::BasebandVersion)?;

    theirs.write_all(&[0x00, 0x00, 0x00, 0x10, 0x00, 0x00])?;
    drop(theirs);

    assert!(matches!(pending.wait_timeout(WAIT), Err(Error::Disconnected)));
    engine.disconnect()?;
    Ok(())
}

#[test]
fn write_to_a_closed_peer_is_a_transport_error() -> anyhow::Result<()> {
    let (ours, theirs) = UnixStream::pair()?;
    theirs.shutdown(std::net::Shutdown::Both)?;
    drop(theirs);
    let engine = engine_over(ours);
    engine.connect()?;

    // either the write fails outright or the reader notices the hang-up first
    match engine.send(Command::GetImei) {
        Ok(handle) => assert!(handle.wait_timeout(WAIT).unwrap_err().is_connection_loss()),
        Err(e) => assert!(matches!(e, Error::NotConnected)),
    }
    engine.disconnect()?;
    Ok(())
}

#[test]
fn io_errors_map_onto_crate_errors() {
    let timeout: Error = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow").into();
    assert!(matches!(timeout, Error::Timeout));
    let broken: Error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
    assert!(broken.is_connection_loss());
}
