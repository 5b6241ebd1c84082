//! Viewpoints.
//!
//! Two interchangeable sources (head-mounted, hand-held) each supply a stereo
//! eye pair. Exactly one is active per tick; the selector decides which from
//! an analog input and derives the debug-overlay flag.

mod anchor;
mod eye;
mod selector;

pub use anchor::AnchorRelay;
pub use eye::{Eye, EyePair, EyeSource, EyeViewpoint, StereoConfig};
pub use selector::{ActiveViewpoint, Selection, SelectorConfig, ViewpointSelector, ViewpointSource};
