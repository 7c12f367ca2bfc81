use eframe::egui::{Pos2, pos2};

use super::path::PathDescriptor;
use super::{LabelAnchor, NotRenderable, TextAnchor, VerticalAnchor};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FunnelBox {
    pub origin: Pos2,
    pub width: f32,
    pub height: f32,
}

impl FunnelBox {
    pub fn center_y(&self) -> f32 {
        self.origin.y + self.height * 0.5
    }

    fn validate(&self) -> Result<(), NotRenderable> {
        let valid = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.origin.x.is_finite()
            && self.origin.y.is_finite();
        if valid {
            Ok(())
        } else {
            Err(NotRenderable::InvalidExtent {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Visual height at `proportion` along the funnel: `height × (1 − p × taper)`.
pub fn funnel_height(height: f32, taper: f32, proportion: f32) -> f32 {
    height * (1.0 - proportion.clamp(0.0, 1.0) * clamp_taper(taper))
}

fn clamp_taper(taper: f32) -> f32 {
    if taper.is_finite() {
        taper.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FunnelSegment {
    pub index: usize,
    pub left_x: f32,
    pub right_x: f32,
    pub center_y: f32,
    pub left_height: f32,
    pub right_height: f32,
}

impl FunnelSegment {
    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Pos2; 4] {
        let left_half = self.left_height * 0.5;
        let right_half = self.right_height * 0.5;
        [
            pos2(self.left_x, self.center_y - left_half),
            pos2(self.right_x, self.center_y - right_half),
            pos2(self.right_x, self.center_y + right_half),
            pos2(self.left_x, self.center_y + left_half),
        ]
    }

    pub fn path(&self) -> PathDescriptor {
        PathDescriptor::polygon(&self.corners())
    }

    pub fn mid_x(&self) -> f32 {
        (self.left_x + self.right_x) * 0.5
    }

    pub fn height_at(&self, x: f32) -> f32 {
        let span = self.right_x - self.left_x;
        if span <= f32::EPSILON {
            return self.left_height;
        }
        let t = ((x - self.left_x) / span).clamp(0.0, 1.0);
        self.left_height + (self.right_height - self.left_height) * t
    }

    pub fn contains(&self, point: Pos2) -> bool {
        if point.x < self.left_x || point.x > self.right_x {
            return false;
        }
        (point.y - self.center_y).abs() <= self.height_at(point.x) * 0.5
    }
}

pub fn funnel_segment(
    index: usize,
    count: usize,
    bounds: FunnelBox,
    taper: f32,
) -> Result<FunnelSegment, NotRenderable> {
    if count == 0 {
        return Err(NotRenderable::NoStages);
    }
    if index >= count {
        return Err(NotRenderable::IndexOutOfRange { index, count });
    }
    bounds.validate()?;

    let start = index as f32 / count as f32;
    let end = (index + 1) as f32 / count as f32;

    Ok(FunnelSegment {
        index,
        left_x: bounds.origin.x + bounds.width * start,
        right_x: bounds.origin.x + bounds.width * end,
        center_y: bounds.center_y(),
        left_height: funnel_height(bounds.height, taper, start),
        right_height: funnel_height(bounds.height, taper, end),
    })
}

pub fn funnel_segments(
    count: usize,
    bounds: FunnelBox,
    taper: f32,
) -> Result<Vec<FunnelSegment>, NotRenderable> {
    if count == 0 {
        return Err(NotRenderable::NoStages);
    }
    (0..count)
        .map(|index| funnel_segment(index, count, bounds, taper))
        .collect()
}

/// Even stages label below the lower edge, odd stages above the upper edge,
/// so neighbouring labels never share a side.
pub fn funnel_label_anchor(segment: &FunnelSegment, offset: f32) -> LabelAnchor {
    let x = segment.mid_x();
    let half = segment.height_at(x) * 0.5;
    let offset = offset.max(0.0);

    if segment.index % 2 == 0 {
        let edge = pos2(x, segment.center_y + half);
        LabelAnchor {
            edge,
            anchor: pos2(x, edge.y + offset),
            horizontal: TextAnchor::Middle,
            vertical: VerticalAnchor::Top,
        }
    } else {
        let edge = pos2(x, segment.center_y - half);
        LabelAnchor {
            edge,
            anchor: pos2(x, edge.y - offset),
            horizontal: TextAnchor::Middle,
            vertical: VerticalAnchor::Bottom,
        }
    }
}
