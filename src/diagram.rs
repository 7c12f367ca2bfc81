use std::rc::Rc;
use std::sync::Arc;

use crate::catalog::{BusinessModelId, Stage, StageCatalog, StageId};
use crate::config::LayoutConfig;
use crate::dataset::{DatasetSwitcher, ModelSwitch};
use crate::geometry::{DiagramGeometry, HitRegion};
use crate::interaction::{
    AnalyticsEvent, AnalyticsSink, InteractionCoordinator, TransitionTimings, dispatch,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    Desktop,
    Mobile,
}

impl Presentation {
    pub fn for_width(width: f32, breakpoint: f32) -> Self {
        if width < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct GeometryKey {
    funnel_count: usize,
    flywheel_count: usize,
    layout: LayoutConfig,
}

pub struct DiagramController {
    dataset: DatasetSwitcher,
    coordinator: InteractionCoordinator,
    sink: Rc<dyn AnalyticsSink>,
    geometry: Option<(GeometryKey, Rc<DiagramGeometry>)>,
    geometry_revision: u64,
}

impl DiagramController {
    pub fn new(
        catalog: Arc<StageCatalog>,
        model: BusinessModelId,
        sink: Rc<dyn AnalyticsSink>,
        timings: TransitionTimings,
    ) -> Self {
        Self {
            dataset: DatasetSwitcher::new(catalog, model),
            coordinator: InteractionCoordinator::new(Rc::clone(&sink), timings),
            sink,
            geometry: None,
            geometry_revision: 0,
        }
    }

    pub fn dataset(&self) -> &DatasetSwitcher {
        &self.dataset
    }

    pub fn coordinator(&self) -> &InteractionCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut InteractionCoordinator {
        &mut self.coordinator
    }

    pub fn model(&self) -> BusinessModelId {
        self.dataset.model()
    }

    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.dataset.get(id)
    }

    pub fn select_model(&mut self, model: BusinessModelId) -> ModelSwitch {
        let switch = self.dataset.select(model);
        if !switch.changed() {
            return switch;
        }

        tracing::info!(from = %switch.previous, to = %switch.current, "switched business model");
        dispatch(self.sink.as_ref(), AnalyticsEvent::ModelChange { model });

        let lookup = self.dataset.lookup();
        self.coordinator.retain_stages(|id| lookup.contains(id));
        switch
    }

    pub fn record_faq_open(&self, question_id: impl Into<String>) {
        dispatch(
            self.sink.as_ref(),
            AnalyticsEvent::FaqOpen {
                question_id: question_id.into(),
            },
        );
    }

    /// Geometry for the active dataset. Rebuilt only when the stage counts or
    /// the layout change. Non-finite layout values are keyed and built as
    /// their defaults.
    pub fn geometry(&mut self, layout: &LayoutConfig) -> Rc<DiagramGeometry> {
        let mut layout = layout.clone();
        layout.sanitize();
        let key = GeometryKey {
            funnel_count: self.dataset.funnel().len(),
            flywheel_count: self.dataset.flywheel().len(),
            layout,
        };

        if let Some((cached_key, geometry)) = &self.geometry
            && *cached_key == key
        {
            return Rc::clone(geometry);
        }

        let geometry = Rc::new(DiagramGeometry::build(
            &key.layout,
            key.funnel_count,
            key.flywheel_count,
        ));
        self.geometry = Some((key, Rc::clone(&geometry)));
        self.geometry_revision += 1;
        geometry
    }

    pub fn geometry_revision(&self) -> u64 {
        self.geometry_revision
    }

    pub fn stage_for_region(&self, region: HitRegion) -> Option<&Stage> {
        match region {
            HitRegion::Funnel(index) => self.dataset.funnel().get(index),
            HitRegion::Bridge => Some(self.dataset.bridge()),
            HitRegion::Flywheel(index) => self.dataset.flywheel().get(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Id, pos2};

    use crate::catalog::builtin_catalog;
    use crate::interaction::testing::RecordingSink;
    use crate::interaction::{Phase, RenderState};

    use super::*;

    fn controller(model: BusinessModelId) -> (DiagramController, Rc<RecordingSink>) {
        let catalog = Arc::new(builtin_catalog().expect("builtin catalog"));
        let sink = Rc::new(RecordingSink::default());
        let controller =
            DiagramController::new(catalog, model, sink.clone(), TransitionTimings::default());
        (controller, sink)
    }

    fn id(value: &str) -> StageId {
        StageId::from(value)
    }

    #[test]
    fn presentation_follows_the_breakpoint() {
        assert_eq!(Presentation::for_width(500.0, 760.0), Presentation::Mobile);
        assert_eq!(Presentation::for_width(760.0, 760.0), Presentation::Desktop);
        assert_eq!(Presentation::for_width(1400.0, 760.0), Presentation::Desktop);
    }

    #[test]
    fn hover_does_not_rebuild_geometry() {
        let (mut controller, _) = controller(BusinessModelId::Services);
        let layout = LayoutConfig::default();

        let first = controller.geometry(&layout);
        assert_eq!(controller.geometry_revision(), 1);

        controller.coordinator_mut().enter(&id("v2"), pos2(10.0, 10.0));
        controller.coordinator_mut().open(&id("v2"));
        controller.coordinator_mut().close_drawer();

        let second = controller.geometry(&layout);
        assert_eq!(controller.geometry_revision(), 1);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn model_switch_with_a_new_metric_count_rebuilds_geometry() {
        let (mut controller, _) = controller(BusinessModelId::Services);
        let layout = LayoutConfig::default();

        controller.geometry(&layout);
        controller.select_model(BusinessModelId::Ecommerce);
        let geometry = controller.geometry(&layout);

        assert_eq!(controller.geometry_revision(), 2);
        assert_eq!(geometry.sectors.len(), controller.dataset().flywheel().len());
    }

    #[test]
    fn layout_change_rebuilds_geometry() {
        let (mut controller, _) = controller(BusinessModelId::Services);
        controller.geometry(&LayoutConfig::default());

        let layout = LayoutConfig {
            taper: 0.2,
            ..LayoutConfig::default()
        };
        controller.geometry(&layout);
        assert_eq!(controller.geometry_revision(), 2);
    }

    #[test]
    fn non_finite_layout_still_hits_the_cache() {
        let (mut controller, _) = controller(BusinessModelId::Services);
        let layout = LayoutConfig {
            taper: f32::NAN,
            ..LayoutConfig::default()
        };

        let first = controller.geometry(&layout);
        for _ in 0..4 {
            controller.geometry(&layout);
        }
        assert_eq!(controller.geometry_revision(), 1);
        assert!(Rc::ptr_eq(&first, &controller.geometry(&LayoutConfig::default())));
    }

    #[test]
    fn model_change_is_emitted_only_on_actual_change() {
        let (mut controller, sink) = controller(BusinessModelId::Services);

        controller.select_model(BusinessModelId::Services);
        assert_eq!(sink.count("model_change"), 0);

        controller.select_model(BusinessModelId::Subscription);
        controller.select_model(BusinessModelId::Subscription);
        assert_eq!(sink.count("model_change"), 1);
        assert_eq!(
            sink.events().last(),
            Some(&AnalyticsEvent::ModelChange {
                model: BusinessModelId::Subscription
            })
        );
    }

    #[test]
    fn switching_away_closes_a_drawer_on_a_vanished_metric() {
        let (mut controller, _) = controller(BusinessModelId::Ecommerce);
        controller.coordinator_mut().open(&id("e_repeat"));

        controller.select_model(BusinessModelId::Services);

        assert_eq!(controller.coordinator().render_state(), RenderState::Idle);
        assert!(controller.stage(&id("e_repeat")).is_none());
    }

    #[test]
    fn funnel_interaction_survives_a_model_switch() {
        let (mut controller, _) = controller(BusinessModelId::Services);
        controller.coordinator_mut().open(&id("v3"));

        controller.select_model(BusinessModelId::Subscription);
        assert_eq!(controller.coordinator().phase(), Phase::Open(id("v3")));

        // f_nps exists in both services and subscription
        controller.select_model(BusinessModelId::Services);
        controller.coordinator_mut().open(&id("f_nps"));
        controller.select_model(BusinessModelId::Subscription);
        assert_eq!(controller.coordinator().phase(), Phase::Open(id("f_nps")));
    }

    #[test]
    fn both_presentations_observe_one_coordinator() {
        let (mut controller, sink) = controller(BusinessModelId::Services);

        // a desktop hover followed by a list-row open
        controller.coordinator_mut().enter(&id("v1"), pos2(5.0, 5.0));
        controller
            .coordinator_mut()
            .open_from(&id("v1"), Some(Id::new("row")));

        assert_eq!(
            controller.coordinator().render_state().open_stage(),
            Some(&id("v1"))
        );
        assert_eq!(sink.count("stage_hover"), 1);
        assert_eq!(sink.count("stage_open"), 1);
    }

    #[test]
    fn hit_regions_map_to_active_stages() {
        let (mut controller, _) = controller(BusinessModelId::Ecommerce);
        let geometry = controller.geometry(&LayoutConfig::default());

        let stage = controller
            .stage_for_region(HitRegion::Flywheel(0))
            .expect("stage");
        assert_eq!(stage.id, controller.dataset().flywheel()[0].id);
        assert_eq!(
            controller.stage_for_region(HitRegion::Bridge).map(|s| &s.id),
            Some(&controller.dataset().bridge().id)
        );
        assert!(
            controller
                .stage_for_region(HitRegion::Flywheel(geometry.sectors.len()))
                .is_none()
        );
    }

    #[test]
    fn faq_open_is_forwarded() {
        let (controller, sink) = controller(BusinessModelId::Services);
        controller.record_faq_open("pricing");
        assert_eq!(
            sink.events(),
            vec![AnalyticsEvent::FaqOpen {
                question_id: "pricing".to_string()
            }]
        );
    }
}
