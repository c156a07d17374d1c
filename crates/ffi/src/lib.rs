//! C interface to the pressure fountain.
//!
//! Every function returns a [`FountainErrorCode`]; on failure a message is
//! stored per thread and can be fetched with `fountain_get_last_error`.
//! Instances are opaque boxes created by `fountain_new` and released with
//! `fountain_destroy`. The C header `FountainFFI.h` is generated at build time.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{fountain_get_last_error, fountain_get_last_error_code, FountainErrorCode};
pub use instance::{fountain_destroy, fountain_new, FountainInstance};
pub use queries::{fountain_generation, fountain_read_velocity, fountain_tick_stats};
pub use simulation::{fountain_inject_pressure, fountain_reset, fountain_step};
