//! Runtime Module - Time source and scheduled callbacks
//!
//! The gate is single-threaded and event driven. Time enters through a
//! [`Clock`]; delayed work (grace expiry, feedback delays, notice dismissal)
//! goes through [`Timers`], which the host event loop drives by calling
//! [`Timers::run_due`].
//!
//! - **Clock** - `SystemClock` for real use, `ManualClock` for tests
//! - **Timers** - Fire-and-forget callbacks ordered by deadline

mod clock;
mod timers;

pub use clock::*;
pub use timers::*;
