//! Rig description.
//!
//! A rig file (TOML) names the three screens and every tunable of the capture
//! pipeline. [`RigConfig::validate`] performs all setup-time checks, so a rig
//! that loads can be turned into screens, a solver and a scheduler without
//! further errors.

mod rig;

pub use rig::{AnchorConfig, OutputConfig, RigConfig, ScreenConfig};
