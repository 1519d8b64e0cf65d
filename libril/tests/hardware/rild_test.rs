#![cfg(feature = "socket")]

#[path = "common.rs"]
mod common;

use std::time::{Duration, Instant};

use libril::{CardLifecycleState, Command, IccCard, Result};

/// A real modem can take a while to answer right after boot.
const RESPONSE_WAIT: Duration = Duration::from_secs(5);

// These tests need a running modem daemon. They are marked `#[ignore]` so
// CI does not attempt them. Run manually with:
//
// LIBRIL_SOCKET=/dev/socket/rild cargo test -p libril --test hardware -- --ignored

#[test]
#[ignore]
fn baseband_version_answers() -> Result<()> {
    let Some(engine) = common::open_engine()? else {
        return Ok(());
    };
    let version = engine
        .send(Command::BasebandVersion)?
        .wait_timeout(RESPONSE_WAIT)?;
    println!("baseband: {:?}", version.as_str());
    engine.disconnect()
}

#[test]
#[ignore]
fn card_state_settles() -> Result<()> {
    let Some(engine) = common::open_engine()? else {
        return Ok(());
    };
    let card = IccCard::builder(engine.clone()).build();
    card.poll_status()?;
    let deadline = Instant::now() + RESPONSE_WAIT;
    while card.get_state() == CardLifecycleState::Unknown && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
    }
    println!("card state: {}", card.get_state());
    card.dispose();
    engine.disconnect()
}
