//! Snapshot logging background task

use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch,
};
use tracing::{debug, info, warn};

use crate::{
    state::{LapEvent, TimerSnapshot},
    utils::format_clock,
};

/// Log phase changes and lap events until the timer task goes away
///
/// Takes receivers rather than a `TimerHandle` so it never keeps the timer
/// task alive on its own.
pub async fn snapshot_logger_task(
    mut snapshots: watch::Receiver<TimerSnapshot>,
    mut lap_events: broadcast::Receiver<LapEvent>,
) {
    info!("Starting snapshot logger task");

    let mut last_phase = snapshots.borrow_and_update().phase;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }

                let snapshot = *snapshots.borrow_and_update();
                if snapshot.phase != last_phase {
                    info!("Timer {} -> {}", last_phase, snapshot.phase);
                    last_phase = snapshot.phase;
                }
                if snapshot.is_finished() {
                    continue;
                }
                debug!(
                    "Lap {}/{} {}",
                    snapshot.current_lap,
                    snapshot.total_laps,
                    format_clock(snapshot.time_left_ms)
                );
            }

            event = lap_events.recv() => match event {
                Ok(LapEvent::LapCompleted { lap }) => info!("Lap {} done", lap),
                Ok(LapEvent::Finished { total_laps }) => info!("All {} laps done", total_laps),
                Err(RecvError::Lagged(skipped)) => warn!("Snapshot logger missed {} lap events", skipped),
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("Snapshot logger task stopped");
}
