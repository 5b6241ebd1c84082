//! Time subsystem.
//!
//! Frame timing decoupled from any windowing runtime. The capture scheduler
//! consumes one `FrameTime` per frame end; headless runs drive the clock with
//! `FrameClock::advance`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
