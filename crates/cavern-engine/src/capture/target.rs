use std::fmt;

use crate::geometry::{ScreenId, ScreenSet};
use crate::viewpoint::{Eye, ViewpointSource};

/// Which physical viewer an output set belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum OutputSetId {
    /// One set used by whichever source is active.
    Shared,
    Viewer(ViewpointSource),
}

impl fmt::Display for OutputSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSetId::Shared => f.write_str("shared"),
            OutputSetId::Viewer(source) => write!(f, "{source}"),
        }
    }
}

/// Identity of one capture slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TargetId {
    pub set: OutputSetId,
    pub screen: ScreenId,
    pub eye: Eye,
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.set, self.screen, self.eye)
    }
}

/// Destination image bound to exactly one (screen, eye) pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RenderTarget {
    pub id: TargetId,
    pub width: u32,
    pub height: u32,
}

/// The six bindings of one viewer, in capture order: every screen for the
/// left eye, then every screen for the right eye.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSet {
    id: OutputSetId,
    targets: Vec<RenderTarget>,
}

impl OutputSet {
    pub fn new(id: OutputSetId, screens: &ScreenSet, width: u32, height: u32) -> Self {
        let targets = Eye::ALL
            .iter()
            .flat_map(move |&eye| {
                screens.iter().map(move |screen| RenderTarget {
                    id: TargetId {
                        set: id,
                        screen: screen.id(),
                        eye,
                    },
                    width,
                    height,
                })
            })
            .collect();
        Self { id, targets }
    }

    pub fn id(&self) -> OutputSetId {
        self.id
    }

    pub fn targets(&self) -> &[RenderTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Every capture slot of the rig.
///
/// Shared mode holds one set of six; per-viewer mode holds one set for the
/// head and one for the hand (twelve slots), of which only the active
/// source's set is captured each pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureBindings {
    sets: Vec<OutputSet>,
}

impl CaptureBindings {
    pub fn new(screens: &ScreenSet, (width, height): (u32, u32), per_viewer: bool) -> Self {
        let sets = if per_viewer {
            [ViewpointSource::Head, ViewpointSource::Hand]
                .into_iter()
                .map(|source| OutputSet::new(OutputSetId::Viewer(source), screens, width, height))
                .collect()
        } else {
            vec![OutputSet::new(OutputSetId::Shared, screens, width, height)]
        };
        Self { sets }
    }

    pub fn is_per_viewer(&self) -> bool {
        self.sets
            .iter()
            .any(|set| matches!(set.id(), OutputSetId::Viewer(_)))
    }

    /// Set captured while `source` is active.
    pub fn set_for(&self, source: ViewpointSource) -> Option<&OutputSet> {
        self.sets.iter().find(|set| match set.id() {
            OutputSetId::Shared => true,
            OutputSetId::Viewer(s) => s == source,
        })
    }

    pub fn sets(&self) -> &[OutputSet] {
        &self.sets
    }

    /// All slots across all sets.
    pub fn all(&self) -> impl Iterator<Item = &RenderTarget> {
        self.sets.iter().flat_map(|set| set.targets().iter())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Affine3A, Vec3};

    use super::*;
    use crate::geometry::{Bounds, ScreenDef};
    use crate::projection::Handedness;

    fn screens() -> ScreenSet {
        let bounds = Bounds::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        let defs: Vec<ScreenDef> = ScreenId::ALL
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                ScreenDef::new(
                    id,
                    bounds,
                    Affine3A::from_translation(Vec3::new(i as f32 * 3.0, 0.0, 0.0)),
                )
            })
            .collect();
        ScreenSet::resolve(&defs, Handedness::Left).unwrap()
    }

    #[test]
    fn shared_set_has_six_slots_in_eye_major_order() {
        let bindings = CaptureBindings::new(&screens(), (64, 32), false);
        assert!(!bindings.is_per_viewer());
        assert_eq!(bindings.all().count(), 6);

        let set = bindings.set_for(ViewpointSource::Hand).unwrap();
        assert_eq!(set.id(), OutputSetId::Shared);
        let order: Vec<(Eye, ScreenId)> =
            set.targets().iter().map(|t| (t.id.eye, t.id.screen)).collect();
        assert_eq!(
            order,
            vec![
                (Eye::Left, ScreenId::Left),
                (Eye::Left, ScreenId::Right),
                (Eye::Left, ScreenId::Bottom),
                (Eye::Right, ScreenId::Left),
                (Eye::Right, ScreenId::Right),
                (Eye::Right, ScreenId::Bottom),
            ]
        );
        assert!(set.targets().iter().all(|t| t.width == 64 && t.height == 32));
    }

    #[test]
    fn per_viewer_mode_has_twelve_slots() {
        let bindings = CaptureBindings::new(&screens(), (8, 8), true);
        assert!(bindings.is_per_viewer());
        assert_eq!(bindings.all().count(), 12);
        assert_eq!(
            bindings.set_for(ViewpointSource::Head).map(OutputSet::id),
            Some(OutputSetId::Viewer(ViewpointSource::Head))
        );
        assert_eq!(
            bindings.set_for(ViewpointSource::Hand).map(OutputSet::id),
            Some(OutputSetId::Viewer(ViewpointSource::Hand))
        );
    }

    #[test]
    fn target_ids_display_as_paths() {
        let id = TargetId {
            set: OutputSetId::Viewer(ViewpointSource::Hand),
            screen: ScreenId::Bottom,
            eye: Eye::Right,
        };
        assert_eq!(id.to_string(), "hand/bottom/right-eye");
    }
}
