// File: ./src/system.rs
// Shared clock for countdown rendering.
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior, interval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMessage {
    Tick(DateTime<Utc>),
}

/// Spawns one clock for the whole dashboard.
///
/// Every displayed card computes its countdown from the same broadcast
/// instant. The actor stops when the receiver is dropped.
pub fn spawn_clock_actor(period: Duration) -> mpsc::Receiver<ClockMessage> {
    let (tx, rx) = mpsc::channel(4);
    let period = period.max(Duration::from_millis(50));

    tokio::spawn(async move {
        let mut ticker = interval(period);
        // A stalled UI gets one catch-up tick, not a burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tx.send(ClockMessage::Tick(Utc::now())).await.is_err() {
                log::debug!("Clock receiver dropped; stopping clock");
                break;
            }
        }
    });

    rx
}
