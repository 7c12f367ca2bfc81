use eframe::egui::{Align2, Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2};

use crate::geometry::{
    FlywheelSector, LabelAnchor, TextAnchor, VerticalAnchor, polar_to_cartesian,
};
use crate::palette::BACKGROUND;

pub(crate) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(crate) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = 56.0;
    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 40));
    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], grid);
        x += step;
    }
    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], grid);
        y += step;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DesignTransform {
    pub offset: Vec2,
    pub scale: f32,
}

impl DesignTransform {
    pub(crate) fn fit(rect: Rect, design_size: Vec2) -> Self {
        let scale = (rect.width() / design_size.x)
            .min(rect.height() / design_size.y)
            .max(0.01);
        let used = design_size * scale;
        let offset = rect.min.to_vec2() + (rect.size() - used) * 0.5;
        Self { offset, scale }
    }

    pub(crate) fn world_to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.scale + self.offset).to_pos2()
    }

    pub(crate) fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    pub(crate) fn points(&self, world: &[Pos2]) -> Vec<Pos2> {
        world.iter().map(|point| self.world_to_screen(*point)).collect()
    }
}

pub(super) fn text_align(anchor: &LabelAnchor) -> Align2 {
    let horizontal = match anchor.horizontal {
        TextAnchor::Start => 0,
        TextAnchor::Middle => 1,
        TextAnchor::End => 2,
    };
    let vertical = match anchor.vertical {
        VerticalAnchor::Top => 0,
        VerticalAnchor::Center => 1,
        VerticalAnchor::Bottom => 2,
    };
    const GRID: [[Align2; 3]; 3] = [
        [Align2::LEFT_TOP, Align2::CENTER_TOP, Align2::RIGHT_TOP],
        [Align2::LEFT_CENTER, Align2::CENTER_CENTER, Align2::RIGHT_CENTER],
        [Align2::LEFT_BOTTOM, Align2::CENTER_BOTTOM, Align2::RIGHT_BOTTOM],
    ];
    GRID[vertical][horizontal]
}

/// Annular sectors are concave, so they are filled as a strip of convex
/// quads and outlined from the flattened path.
pub(super) fn paint_sector(
    painter: &Painter,
    transform: &DesignTransform,
    sector: &FlywheelSector,
    fill: Color32,
    stroke: Stroke,
) {
    let steps = ((sector.span() / 4.0).ceil() as usize).max(1);
    let step = sector.span() / steps as f32;

    for i in 0..steps {
        let a0 = sector.start_deg + step * i as f32;
        let a1 = a0 + step;
        let quad = [
            polar_to_cartesian(sector.center, sector.outer_radius, a0),
            polar_to_cartesian(sector.center, sector.outer_radius, a1),
            polar_to_cartesian(sector.center, sector.inner_radius, a1),
            polar_to_cartesian(sector.center, sector.inner_radius, a0),
        ];
        painter.add(Shape::convex_polygon(
            transform.points(&quad),
            fill,
            Stroke::NONE,
        ));
    }

    let mut outline = transform.points(&sector.path().flatten(24));
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }
    painter.add(Shape::line(outline, stroke));
}
