//! Background thread stepping a grid at a fixed cadence

use super::schedule::TickSchedule;
use super::TickDriver;
use crate::grid::FluidGrid;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Handle to a running tick thread; stops and joins it on drop
#[derive(Debug)]
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Stop the tick thread and wait for it to exit
    ///
    /// A step in progress always completes first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Tick thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl TickDriver {
    /// Step the grid every `interval` on a background thread
    ///
    /// `observer` runs after each successful step with the lock still held.
    /// Deadlines missed while a step or observer overran are dropped and
    /// counted in [`TickDriver::stats`]. The thread exits when the returned
    /// [`Ticker`] is stopped or dropped, or if the grid lock is poisoned.
    pub fn spawn<F>(&self, interval: Duration, mut observer: F) -> Ticker
    where
        F: FnMut(&FluidGrid) + Send + 'static,
    {
        let driver = self.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut schedule = TickSchedule::new(interval, Instant::now());
            info!("Tick thread started, interval {:?}", schedule.interval());

            while !stop_flag.load(Ordering::Relaxed) {
                let now = Instant::now();
                let Some(due) = schedule.poll(now) else {
                    thread::sleep(schedule.time_until(now));
                    continue;
                };

                driver.record_missed(due.missed);
                if let Err(err) = driver.try_tick_with(&mut observer) {
                    warn!("Tick thread stopping: {}", err);
                    break;
                }
            }
        });

        Ticker {
            stop,
            handle: Some(handle),
        }
    }
}
