use eframe::egui::Pos2;

use super::path::PathDescriptor;
use super::polar::{cartesian_to_polar, normalize_degrees, polar_to_cartesian};
use super::{LabelAnchor, NotRenderable, TextAnchor, VerticalAnchor};

/// Largest span a single sector may cover. A lone metric is clamped to this
/// so its arc start and end points never coincide.
pub const MAX_SECTOR_SPAN: f32 = 359.9;

const LABEL_CENTER_BAND: f32 = 0.2;

fn validate_center(center: Pos2) -> Result<(), NotRenderable> {
    if center.x.is_finite() && center.y.is_finite() {
        Ok(())
    } else {
        Err(NotRenderable::InvalidCenter {
            x: center.x,
            y: center.y,
        })
    }
}

fn validate_radii(inner: f32, outer: f32) -> Result<(), NotRenderable> {
    let valid = inner.is_finite() && outer.is_finite() && outer > 0.0 && inner >= 0.0 && inner < outer;
    if valid {
        Ok(())
    } else {
        Err(NotRenderable::InvalidRadius { inner, outer })
    }
}

pub fn sector_path(
    center: Pos2,
    inner_radius: f32,
    outer_radius: f32,
    start_deg: f32,
    end_deg: f32,
) -> Result<PathDescriptor, NotRenderable> {
    validate_center(center)?;
    validate_radii(inner_radius, outer_radius)?;

    let span = end_deg - start_deg;
    if !span.is_finite() || span <= 0.0 {
        return Err(NotRenderable::EmptySpan { span });
    }
    if span >= 360.0 {
        return Err(NotRenderable::FullTurn { span });
    }

    let mut path = PathDescriptor::new();
    path.move_to(polar_to_cartesian(center, outer_radius, start_deg))
        .arc(center, outer_radius, start_deg, end_deg, true);
    if inner_radius > 0.0 {
        path.line_to(polar_to_cartesian(center, inner_radius, end_deg))
            .arc(center, inner_radius, end_deg, start_deg, false);
    } else {
        path.line_to(center);
    }
    path.close();

    Ok(path)
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlywheelSector {
    pub index: usize,
    pub center: Pos2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_deg: f32,
    pub end_deg: f32,
    path: PathDescriptor,
}

impl FlywheelSector {
    pub fn span(&self) -> f32 {
        self.end_deg - self.start_deg
    }

    pub fn bisector(&self) -> f32 {
        normalize_degrees(self.start_deg + self.span() * 0.5)
    }

    pub fn path(&self) -> &PathDescriptor {
        &self.path
    }

    pub fn contains(&self, point: Pos2) -> bool {
        let (radius, angle) = cartesian_to_polar(self.center, point);
        if radius < self.inner_radius || radius > self.outer_radius {
            return false;
        }
        normalize_degrees(angle - self.start_deg) <= self.span()
    }
}

/// Splits the ring into `count` equal sectors starting at `start_deg`, each
/// shrunk by `gap_deg` on both sides so neighbours never touch.
pub fn flywheel_sectors(
    center: Pos2,
    inner_radius: f32,
    outer_radius: f32,
    count: usize,
    gap_deg: f32,
    start_deg: f32,
) -> Result<Vec<FlywheelSector>, NotRenderable> {
    if count == 0 {
        return Err(NotRenderable::NoStages);
    }
    validate_center(center)?;
    validate_radii(inner_radius, outer_radius)?;

    let step = 360.0 / count as f32;
    let gap = if gap_deg.is_finite() {
        gap_deg.clamp(0.0, step * 0.25)
    } else {
        0.0
    };
    let origin = if start_deg.is_finite() { start_deg } else { 0.0 };

    (0..count)
        .map(|index| {
            let start = origin + index as f32 * step + gap;
            let end = (origin + (index + 1) as f32 * step - gap).min(start + MAX_SECTOR_SPAN);
            let path = sector_path(center, inner_radius, outer_radius, start, end)?;
            Ok(FlywheelSector {
                index,
                center,
                inner_radius,
                outer_radius,
                start_deg: start,
                end_deg: end,
                path,
            })
        })
        .collect()
}

/// Label outside the ring on the sector bisector. Labels on the right half
/// left-align, on the left half right-align, near the vertical axis center.
pub fn sector_label_anchor(sector: &FlywheelSector, offset: f32) -> LabelAnchor {
    let angle = sector.bisector();
    let radians = angle.to_radians();
    // horizontal direction cosine in the 0°-top clockwise convention
    let horizontal = radians.sin();
    let upward = radians.cos();

    let edge = polar_to_cartesian(sector.center, sector.outer_radius, angle);
    let anchor = polar_to_cartesian(sector.center, sector.outer_radius + offset.max(0.0), angle);

    let horizontal = if horizontal.abs() < LABEL_CENTER_BAND {
        TextAnchor::Middle
    } else if horizontal > 0.0 {
        TextAnchor::Start
    } else {
        TextAnchor::End
    };
    let vertical = if upward > LABEL_CENTER_BAND {
        VerticalAnchor::Bottom
    } else if upward < -LABEL_CENTER_BAND {
        VerticalAnchor::Top
    } else {
        VerticalAnchor::Center
    };

    LabelAnchor {
        edge,
        anchor,
        horizontal,
        vertical,
    }
}
