//! Cavern engine crate.
//!
//! Renders a scene onto several fixed planar screens (left wall, right wall,
//! floor) as seen from a tracked, moving eye pair, and captures one image per
//! screen per eye at a bounded rate.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`geometry`] | screen bounds, corner resolution, screen basis |
//! | [`projection`] | off-axis (asymmetric frustum) projection solver |
//! | [`viewpoint`] | eye pairs, viewpoint source selection, anchor relay |
//! | [`capture`] | render bindings, `Renderer` contract, capture scheduler |
//! | [`debug`] | frustum edge segments for optional visualization |
//! | [`input`] | platform-agnostic buttons, analog axes, pose streams |
//! | [`config`] | rig description loaded from TOML |
//! | [`device`], [`render`] | headless wgpu device and offscreen renderer |

pub mod capture;
pub mod config;
pub mod debug;
pub mod device;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod projection;
pub mod render;
pub mod time;
pub mod viewpoint;
