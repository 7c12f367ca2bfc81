use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::config::LayoutConfig;

use super::bridge::{BridgeLink, bridge_link};
use super::flywheel::{FlywheelSector, flywheel_sectors, sector_label_anchor};
use super::funnel::{FunnelBox, FunnelSegment, funnel_label_anchor, funnel_segments};
use super::{LabelAnchor, NotRenderable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitRegion {
    Funnel(usize),
    Bridge,
    Flywheel(usize),
}

#[derive(Clone, Debug)]
pub struct DiagramGeometry {
    pub design_size: Vec2,
    pub funnel_box: FunnelBox,
    pub funnel: Vec<FunnelSegment>,
    pub funnel_labels: Vec<LabelAnchor>,
    pub funnel_issue: Option<NotRenderable>,
    pub bridge: Option<BridgeLink>,
    pub bridge_issue: Option<NotRenderable>,
    pub flywheel_center: Pos2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub sectors: Vec<FlywheelSector>,
    pub sector_labels: Vec<LabelAnchor>,
    pub flywheel_issue: Option<NotRenderable>,
}

impl DiagramGeometry {
    pub fn build(layout: &LayoutConfig, funnel_count: usize, flywheel_count: usize) -> Self {
        let funnel_box = FunnelBox {
            origin: layout.funnel_origin(),
            width: layout.funnel_width,
            height: layout.funnel_height,
        };

        let (funnel, funnel_issue) = match funnel_segments(funnel_count, funnel_box, layout.taper)
        {
            Ok(segments) => (segments, None),
            Err(issue) => (Vec::new(), Some(issue)),
        };
        let funnel_labels = funnel
            .iter()
            .map(|segment| funnel_label_anchor(segment, layout.funnel_label_offset))
            .collect();

        let flywheel_center = layout.flywheel_center();
        let (sectors, flywheel_issue) = match flywheel_sectors(
            flywheel_center,
            layout.flywheel_inner_radius,
            layout.flywheel_outer_radius,
            flywheel_count,
            layout.sector_gap_deg,
            layout.flywheel_start_deg,
        ) {
            Ok(sectors) => (sectors, None),
            Err(issue) => (Vec::new(), Some(issue)),
        };
        let sector_labels = sectors
            .iter()
            .map(|sector| sector_label_anchor(sector, layout.flywheel_label_offset))
            .collect();

        let funnel_exit = funnel
            .last()
            .map(|segment| pos2(segment.right_x, segment.center_y))
            .unwrap_or_else(|| pos2(funnel_box.origin.x + funnel_box.width, funnel_box.center_y()));
        let flywheel_entry = pos2(
            flywheel_center.x - layout.flywheel_outer_radius.max(0.0),
            flywheel_center.y,
        );
        let clearance = vec2(layout.bridge_clearance.max(0.0), 0.0);
        let (bridge, bridge_issue) = match [funnel_exit, flywheel_entry]
            .into_iter()
            .find(|point| !(point.x.is_finite() && point.y.is_finite()))
        {
            Some(point) => (
                None,
                Some(NotRenderable::InvalidCenter {
                    x: point.x,
                    y: point.y,
                }),
            ),
            None => (
                Some(bridge_link(
                    funnel_exit + clearance,
                    flywheel_entry - clearance,
                    layout.bridge_node_radius,
                    layout.bridge_arrow_size,
                )),
                None,
            ),
        };

        tracing::debug!(
            funnel_count,
            flywheel_count,
            ?funnel_issue,
            ?flywheel_issue,
            ?bridge_issue,
            "built diagram geometry"
        );

        Self {
            design_size: vec2(layout.design_width.max(1.0), layout.design_height.max(1.0)),
            funnel_box,
            funnel,
            funnel_labels,
            funnel_issue,
            bridge,
            bridge_issue,
            flywheel_center,
            inner_radius: layout.flywheel_inner_radius,
            outer_radius: layout.flywheel_outer_radius,
            sectors,
            sector_labels,
            flywheel_issue,
        }
    }

    /// Shape under `point` (design space). The bridge node is drawn on top
    /// and wins over anything it overlaps.
    pub fn hit_test(&self, point: Pos2) -> Option<HitRegion> {
        if self.bridge.is_some_and(|bridge| bridge.contains(point)) {
            return Some(HitRegion::Bridge);
        }
        if let Some(segment) = self.funnel.iter().find(|segment| segment.contains(point)) {
            return Some(HitRegion::Funnel(segment.index));
        }
        self.sectors
            .iter()
            .find(|sector| sector.contains(point))
            .map(|sector| HitRegion::Flywheel(sector.index))
    }
}

#[cfg(test)]
mod tests {
    use super::super::polar::polar_to_cartesian;
    use super::*;

    fn geometry(funnel: usize, flywheel: usize) -> DiagramGeometry {
        DiagramGeometry::build(&LayoutConfig::default(), funnel, flywheel)
    }

    #[test]
    fn default_layout_builds_every_shape() {
        let geometry = geometry(6, 7);
        assert_eq!(geometry.funnel.len(), 6);
        assert_eq!(geometry.funnel_labels.len(), 6);
        assert_eq!(geometry.sectors.len(), 7);
        assert_eq!(geometry.sector_labels.len(), 7);
        assert!(geometry.funnel_issue.is_none());
        assert!(geometry.flywheel_issue.is_none());
        assert_eq!(geometry.funnel[0].left_height, 260.0);
    }

    #[test]
    fn shapes_fit_inside_the_design_area() {
        let geometry = geometry(6, 7);
        let size = geometry.design_size;
        let inside = |point: Pos2| {
            point.x >= 0.0 && point.y >= 0.0 && point.x <= size.x && point.y <= size.y
        };

        for label in geometry.funnel_labels.iter().chain(&geometry.sector_labels) {
            assert!(inside(label.anchor), "label anchor {:?} outside", label.anchor);
        }
        let bridge = geometry.bridge.expect("bridge");
        assert!(bridge.start.x < bridge.end.x);
        assert!(bridge.end.x < geometry.flywheel_center.x - geometry.outer_radius);
    }

    #[test]
    fn hit_test_resolves_each_region() {
        let geometry = geometry(6, 7);

        let segment = &geometry.funnel[2];
        assert_eq!(
            geometry.hit_test(pos2(segment.mid_x(), segment.center_y)),
            Some(HitRegion::Funnel(2))
        );

        let bridge = geometry.bridge.expect("bridge");
        assert_eq!(geometry.hit_test(bridge.node_center), Some(HitRegion::Bridge));

        let sector = &geometry.sectors[4];
        let mid_radius = (geometry.inner_radius + geometry.outer_radius) * 0.5;
        let point = polar_to_cartesian(geometry.flywheel_center, mid_radius, sector.bisector());
        assert_eq!(geometry.hit_test(point), Some(HitRegion::Flywheel(4)));

        assert_eq!(geometry.hit_test(geometry.flywheel_center), None);
        assert_eq!(geometry.hit_test(pos2(-10.0, -10.0)), None);
    }

    #[test]
    fn empty_collections_degrade_without_nan() {
        let geometry = geometry(0, 0);
        assert_eq!(geometry.funnel_issue, Some(NotRenderable::NoStages));
        assert_eq!(geometry.flywheel_issue, Some(NotRenderable::NoStages));
        assert!(geometry.funnel.is_empty());
        assert!(geometry.sectors.is_empty());
        let bridge = geometry.bridge.expect("bridge");
        assert!(bridge.node_center.x.is_finite());
        assert!(bridge.node_center.y.is_finite());
        assert_eq!(geometry.hit_test(bridge.node_center), Some(HitRegion::Bridge));
    }

    #[test]
    fn invalid_radii_only_disable_the_flywheel() {
        let layout = LayoutConfig {
            flywheel_inner_radius: 200.0,
            ..LayoutConfig::default()
        };
        let geometry = DiagramGeometry::build(&layout, 6, 7);
        assert!(matches!(
            geometry.flywheel_issue,
            Some(NotRenderable::InvalidRadius { .. })
        ));
        assert_eq!(geometry.funnel.len(), 6);
    }

    #[test]
    fn non_finite_flywheel_center_is_reported_instead_of_drawn() {
        let layout = LayoutConfig {
            flywheel_center_x: f32::NAN,
            ..LayoutConfig::default()
        };
        let geometry = DiagramGeometry::build(&layout, 6, 7);

        assert!(matches!(
            geometry.flywheel_issue,
            Some(NotRenderable::InvalidCenter { .. })
        ));
        assert!(geometry.sectors.is_empty());
        assert!(geometry.sector_labels.is_empty());
        assert!(geometry.bridge.is_none());
        assert!(matches!(
            geometry.bridge_issue,
            Some(NotRenderable::InvalidCenter { .. })
        ));
        assert_eq!(geometry.funnel.len(), 6);
        assert_eq!(geometry.hit_test(pos2(f32::NAN, 235.0)), None);
    }
}
