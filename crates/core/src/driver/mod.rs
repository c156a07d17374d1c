//! Tick driver: serialized stepping with drop-on-busy backpressure
//!
//! The grid lives behind a single `Mutex`. Ticks use `try_lock` and are
//! **dropped** when the grid is busy (another tick, a display read, an
//! injection); they are never queued. Injections and reads take the lock
//! normally, so they can never interleave with an in-flight step.
//!
//! # Example
//!
//! ```rust
//! use fountain_core::{FluidGrid, TickDriver, TickOutcome};
//!
//! let driver = TickDriver::new(FluidGrid::new(8, 8).unwrap());
//! driver.inject_pressure(4, 4).unwrap();
//! assert!(matches!(driver.try_tick(), Ok(TickOutcome::Stepped { generation: 1 })));
//! let velocity = driver.read_velocity(3, 4).unwrap();
//! assert!(velocity.x < 0.0);
//! ```

mod schedule;
mod ticker;

pub use schedule::{TickDue, TickSchedule, MIN_TICK_INTERVAL};
pub use ticker::Ticker;

use crate::core_types::Vec2;
use crate::error::FluidError;
use crate::grid::FluidGrid;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use tracing::{debug, trace};

/// Result of a tick attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The grid advanced to `generation`
    Stepped { generation: u64 },
    /// The grid was busy; the tick was dropped
    Skipped,
}

/// Snapshot of the driver's tick counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks that advanced the grid
    pub stepped: u64,
    /// Ticks dropped because the grid was busy or the driver fell behind
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct TickCounters {
    stepped: AtomicU64,
    skipped: AtomicU64,
}

/// Shared handle to one fluid grid
///
/// Cloning is cheap and every clone drives the same grid and counters.
#[derive(Debug, Clone)]
pub struct TickDriver {
    grid: Arc<Mutex<FluidGrid>>,
    counters: Arc<TickCounters>,
}

impl TickDriver {
    #[must_use]
    pub fn new(grid: FluidGrid) -> Self {
        Self {
            grid: Arc::new(Mutex::new(grid)),
            counters: Arc::new(TickCounters::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FluidGrid>, FluidError> {
        self.grid.lock().map_err(|_| FluidError::LockPoisoned)
    }

    /// Attempt one tick, dropping it if the grid is busy
    ///
    /// # Errors
    ///
    /// Returns `FluidError::LockPoisoned` if a previous holder panicked.
    pub fn try_tick(&self) -> Result<TickOutcome, FluidError> {
        self.try_tick_with(|_| {})
    }

    /// Attempt one tick, then hand the new generation to `observer`
    ///
    /// The observer runs under the same lock as the step, so it sees the
    /// freshly swapped generation and nothing can change it meanwhile. It is
    /// not called when the tick is skipped.
    ///
    /// # Errors
    ///
    /// Returns `FluidError::LockPoisoned` if a previous holder panicked.
    pub fn try_tick_with<F>(&self, observer: F) -> Result<TickOutcome, FluidError>
    where
        F: FnOnce(&FluidGrid),
    {
        let mut grid = match self.grid.try_lock() {
            Ok(grid) => grid,
            Err(TryLockError::WouldBlock) => {
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                trace!("Grid busy, tick dropped");
                return Ok(TickOutcome::Skipped);
            }
            Err(TryLockError::Poisoned(_)) => return Err(FluidError::LockPoisoned),
        };

        grid.step();
        observer(&grid);
        self.counters.stepped.fetch_add(1, Ordering::Relaxed);

        Ok(TickOutcome::Stepped {
            generation: grid.generation(),
        })
    }

    /// Count ticks the scheduler dropped because it fell behind
    pub fn record_missed(&self, missed: u64) {
        if missed > 0 {
            self.counters.skipped.fetch_add(missed, Ordering::Relaxed);
            debug!("Driver fell behind, {} tick(s) dropped", missed);
        }
    }

    pub fn stats(&self) -> TickStats {
        TickStats {
            stepped: self.counters.stepped.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
        }
    }

    /// See [`FluidGrid::inject_pressure`]
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` or `FluidError::LockPoisoned`.
    pub fn inject_pressure(&self, x: usize, y: usize) -> Result<(), FluidError> {
        self.lock()?.inject_pressure(x, y)
    }

    /// See [`FluidGrid::set_pressure`]
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` or `FluidError::LockPoisoned`.
    pub fn set_pressure(&self, x: usize, y: usize, amount: f32) -> Result<(), FluidError> {
        self.lock()?.set_pressure(x, y, amount)
    }

    /// See [`FluidGrid::read_velocity`]
    ///
    /// # Errors
    ///
    /// Returns `FluidError::OutOfBounds` or `FluidError::LockPoisoned`.
    pub fn read_velocity(&self, x: usize, y: usize) -> Result<Vec2, FluidError> {
        self.lock()?.read_velocity(x, y)
    }

    /// Run `f` against the current generation with the lock held
    ///
    /// # Errors
    ///
    /// Returns `FluidError::LockPoisoned` if a previous holder panicked.
    pub fn with_grid<R>(&self, f: impl FnOnce(&FluidGrid) -> R) -> Result<R, FluidError> {
        let grid = self.lock()?;
        Ok(f(&grid))
    }

    /// Run `f` with mutable access to the grid and the lock held
    ///
    /// # Errors
    ///
    /// Returns `FluidError::LockPoisoned` if a previous holder panicked.
    pub fn with_grid_mut<R>(&self, f: impl FnOnce(&mut FluidGrid) -> R) -> Result<R, FluidError> {
        let mut grid = self.lock()?;
        Ok(f(&mut grid))
    }
}
