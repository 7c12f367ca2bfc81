use eframe::egui::{Pos2, Vec2, vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BridgeLink {
    pub start: Pos2,
    pub end: Pos2,
    pub node_center: Pos2,
    pub node_radius: f32,
    /// Arrowhead triangle: tip, then the two base corners.
    pub arrow: [Pos2; 3],
}

impl BridgeLink {
    pub fn direction(&self) -> Vec2 {
        flow_direction(self.start, self.end)
    }

    pub fn contains(&self, point: Pos2) -> bool {
        point.distance(self.node_center) <= self.node_radius
    }

    pub fn segments(&self) -> [[Pos2; 2]; 2] {
        let offset = self.direction() * self.node_radius;
        [
            [self.start, self.node_center - offset],
            [self.node_center + offset, self.arrow_base_center()],
        ]
    }

    fn arrow_base_center(&self) -> Pos2 {
        self.arrow[1] + (self.arrow[2] - self.arrow[1]) * 0.5
    }
}

fn flow_direction(start: Pos2, end: Pos2) -> Vec2 {
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON || !length.is_finite() {
        vec2(1.0, 0.0)
    } else {
        delta / length
    }
}

pub fn bridge_link(start: Pos2, end: Pos2, node_radius: f32, arrow_size: f32) -> BridgeLink {
    let direction = flow_direction(start, end);
    let normal = vec2(-direction.y, direction.x);
    let node_radius = node_radius.max(0.0);
    let arrow_size = arrow_size.max(0.0);

    let base = end - direction * arrow_size;
    let half_width = arrow_size * 0.6;

    BridgeLink {
        start,
        end,
        node_center: start + (end - start) * 0.5,
        node_radius,
        arrow: [end, base + normal * half_width, base - normal * half_width],
    }
}
