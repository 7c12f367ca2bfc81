use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, pos2, vec2};

use crate::catalog::StageId;
use crate::palette::{
    ACTIVE, BRIDGE_FILL, CONNECTOR, LABEL_TEXT, OUTLINE, funnel_color, sector_color,
};

use super::render_utils::{
    DesignTransform, blend_color, dim_color, draw_background, paint_sector, text_align,
};
use super::{ViewModel, diagram_root_id};

impl ViewModel {
    pub(in crate::app) fn draw_desktop(&mut self, ui: &mut Ui) {
        let geometry = self.controller.geometry(&self.config.layout);
        let search_matches = self.cached_search_matches();

        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let response = ui.interact(rect, diagram_root_id(), Sense::click());
        self.focusable.insert(response.id);

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);
        let transform = DesignTransform::fit(rect.shrink(12.0), geometry.design_size);

        let hover_pos = response.hover_pos();
        let hovered = hover_pos
            .and_then(|pointer| geometry.hit_test(transform.screen_to_world(pointer)))
            .and_then(|region| self.controller.stage_for_region(region))
            .map(|stage| stage.id.clone());

        match (&hovered, hover_pos) {
            (Some(id), Some(pointer)) => {
                self.controller.coordinator_mut().enter(id, pointer);
                self.desktop_hovered = Some(id.clone());
                ui.output_mut(|output| {
                    output.cursor_icon = egui::CursorIcon::PointingHand;
                });
            }
            _ => {
                if let Some(previous) = self.desktop_hovered.take() {
                    self.controller.coordinator_mut().leave(&previous);
                }
            }
        }

        if response.clicked()
            && let Some(id) = &hovered
        {
            self.controller
                .coordinator_mut()
                .open_from(id, Some(response.id));
        }

        let render = self.controller.coordinator().render_state();
        let (highlight, easing) = self.controller.coordinator().highlight_motion();
        let highlight_secs = highlight.as_secs_f32();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let font = FontId::proportional((12.5 * transform.scale).clamp(9.0, 15.0));
        let outline = Stroke::new(1.0, OUTLINE);
        let mut animating = false;

        let mut stage_fill = |id: &StageId, base: Color32| -> Color32 {
            let mix = ui.ctx().animate_bool_with_time(
                ui.make_persistent_id(("stage-active", id.as_str())),
                render.is_active(id),
                highlight_secs,
            );
            if mix > 0.0 && mix < 1.0 {
                animating = true;
            }
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(id));
            let base = if search_active && !is_match {
                dim_color(base, 0.45)
            } else if is_match {
                blend_color(base, Color32::from_rgb(103, 196, 255), 0.55)
            } else {
                base
            };
            blend_color(base, ACTIVE, easing.apply(mix))
        };

        let dataset = self.controller.dataset();
        let funnel = dataset.funnel();
        for (segment, label) in geometry.funnel.iter().zip(&geometry.funnel_labels) {
            let Some(stage) = funnel.get(segment.index) else {
                continue;
            };
            let fill = stage_fill(&stage.id, funnel_color(segment.index, funnel.len()));
            painter.add(Shape::convex_polygon(
                transform.points(&segment.corners()),
                fill,
                outline,
            ));

            let [edge, anchor] = label.connector();
            painter.line_segment(
                [transform.world_to_screen(edge), transform.world_to_screen(anchor)],
                Stroke::new(1.0, CONNECTOR),
            );
            painter.text(
                transform.world_to_screen(anchor),
                text_align(label),
                stage.display_label(),
                font.clone(),
                LABEL_TEXT,
            );
        }

        if let Some(bridge) = &geometry.bridge {
            let bridge_stroke = Stroke::new((2.0 * transform.scale).max(1.0), CONNECTOR);
            for [start, end] in bridge.segments() {
                painter.line_segment(
                    [transform.world_to_screen(start), transform.world_to_screen(end)],
                    bridge_stroke,
                );
            }
            painter.add(Shape::convex_polygon(
                transform.points(&bridge.arrow),
                CONNECTOR,
                Stroke::NONE,
            ));
            let bridge_stage = dataset.bridge();
            let node_center = transform.world_to_screen(bridge.node_center);
            let node_radius = bridge.node_radius * transform.scale;
            painter.circle_filled(
                node_center,
                node_radius,
                stage_fill(&bridge_stage.id, BRIDGE_FILL),
            );
            painter.circle_stroke(node_center, node_radius, outline);
            painter.text(
                node_center + vec2(0.0, node_radius + 6.0),
                Align2::CENTER_TOP,
                bridge_stage.display_label(),
                font.clone(),
                LABEL_TEXT,
            );
        }

        let flywheel = dataset.flywheel();
        for (sector, label) in geometry.sectors.iter().zip(&geometry.sector_labels) {
            let Some(stage) = flywheel.get(sector.index) else {
                continue;
            };
            let fill = stage_fill(&stage.id, sector_color(sector.index));
            paint_sector(&painter, &transform, sector, fill, outline);

            let [edge, anchor] = label.connector();
            painter.line_segment(
                [transform.world_to_screen(edge), transform.world_to_screen(anchor)],
                Stroke::new(1.0, CONNECTOR),
            );
            painter.text(
                transform.world_to_screen(anchor),
                text_align(label),
                stage.display_label(),
                font.clone(),
                LABEL_TEXT,
            );
        }

        if let Some(model) = dataset.model_info()
            && geometry.flywheel_center.x.is_finite()
            && geometry.flywheel_center.y.is_finite()
        {
            painter.text(
                transform.world_to_screen(geometry.flywheel_center),
                Align2::CENTER_CENTER,
                model.label.as_str(),
                FontId::proportional((15.0 * transform.scale).clamp(10.0, 18.0)),
                LABEL_TEXT,
            );
        }

        let issues = [
            (geometry.funnel_issue, geometry.funnel_box.origin),
            (geometry.bridge_issue, pos2(geometry.design_size.x * 0.5, 0.0)),
            (
                geometry.flywheel_issue,
                geometry.flywheel_center - vec2(0.0, geometry.outer_radius.max(0.0)),
            ),
        ];
        let mut fallback = rect.min + vec2(12.0, 12.0);
        for (issue, at) in issues {
            let Some(issue) = issue else {
                continue;
            };
            let at = if at.x.is_finite() && at.y.is_finite() {
                transform.world_to_screen(at)
            } else {
                fallback.y += 18.0;
                fallback
            };
            draw_issue(&painter, at, &issue.to_string());
        }

        if animating {
            ui.ctx().request_repaint();
        }
    }
}

fn draw_issue(painter: &egui::Painter, at: Pos2, message: &str) {
    painter.text(
        at,
        Align2::LEFT_TOP,
        format!("not rendered: {message}"),
        FontId::proportional(12.0),
        Color32::from_rgb(241, 146, 94),
    );
}
