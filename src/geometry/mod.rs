mod bridge;
mod flywheel;
mod funnel;
mod layout;
mod path;
mod polar;

pub use bridge::{BridgeLink, bridge_link};
pub use flywheel::{
    FlywheelSector, MAX_SECTOR_SPAN, flywheel_sectors, sector_label_anchor, sector_path,
};
pub use funnel::{FunnelBox, FunnelSegment, funnel_label_anchor, funnel_segment, funnel_segments};
pub use layout::{DiagramGeometry, HitRegion};
pub use path::{PathCommand, PathDescriptor};
pub use polar::{angular_distance, cartesian_to_polar, normalize_degrees, polar_to_cartesian};

use eframe::egui::Pos2;

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum NotRenderable {
    #[error("no stages to lay out")]
    NoStages,
    #[error("stage index {index} is outside a collection of {count}")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("layout box {width}x{height} has no area")]
    InvalidExtent { width: f32, height: f32 },
    #[error("center ({x}, {y}) is not a finite point")]
    InvalidCenter { x: f32, y: f32 },
    #[error("radii inner={inner} outer={outer} do not describe a ring")]
    InvalidRadius { inner: f32, outer: f32 },
    #[error("angular span {span} is empty")]
    EmptySpan { span: f32 },
    #[error("angular span {span} covers a full turn")]
    FullTurn { span: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelAnchor {
    pub edge: Pos2,
    pub anchor: Pos2,
    pub horizontal: TextAnchor,
    pub vertical: VerticalAnchor,
}

impl LabelAnchor {
    pub fn connector(&self) -> [Pos2; 2] {
        [self.edge, self.anchor]
    }
}
