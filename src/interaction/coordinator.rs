use std::rc::Rc;
use std::time::Duration;

use eframe::egui::{Id, Pos2};

use crate::catalog::StageId;

use super::analytics::{AnalyticsEvent, AnalyticsSink, dispatch};
use super::focus::{FocusRequest, FocusTracker};
use super::state::{InteractionState, RenderState};
use super::transition::{Easing, Phase, Transition, TransitionLog, TransitionTimings};

const TRANSITION_HISTORY: usize = 32;

/// Identifies the drawer content requested by one `open` call. A ticket goes
/// stale as soon as another stage is opened or the drawer closes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    pub stage_id: StageId,
    generation: u64,
}

pub struct InteractionCoordinator {
    state: InteractionState,
    last_pointer: Option<Pos2>,
    sink: Rc<dyn AnalyticsSink>,
    focus: FocusTracker,
    timings: TransitionTimings,
    transitions: TransitionLog,
    open_generation: u64,
}

impl InteractionCoordinator {
    pub fn new(sink: Rc<dyn AnalyticsSink>, timings: TransitionTimings) -> Self {
        Self {
            state: InteractionState::default(),
            last_pointer: None,
            sink,
            focus: FocusTracker::default(),
            timings,
            transitions: TransitionLog::with_capacity(TRANSITION_HISTORY),
            open_generation: 0,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn render_state(&self) -> RenderState {
        self.state.render_state()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.transitions.last()
    }

    #[cfg(test)]
    fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Duration and easing for the drawer slide: those of the last transition
    /// that opened, switched or closed the drawer.
    pub fn drawer_motion(&self) -> (Duration, Easing) {
        match self.last_transition() {
            Some(transition) if transition.from.is_open() || transition.to.is_open() => {
                (transition.duration, transition.easing)
            }
            _ => (self.timings.drawer, self.timings.easing),
        }
    }

    pub fn highlight_motion(&self) -> (Duration, Easing) {
        self.last_transition().map_or(
            (self.timings.hover, self.timings.easing),
            |transition| (transition.duration, transition.easing),
        )
    }

    pub fn enter(&mut self, id: &StageId, position: Pos2) {
        self.last_pointer = Some(position);

        if let Some(open) = &self.state.open {
            // the drawer is modal; only the open stage tracks the pointer
            if open == id {
                self.state.tooltip_position = Some(position);
            }
            return;
        }

        let changed = self.state.hovered.as_ref() != Some(id);
        let previous = self.state.phase();
        self.state.hovered = Some(id.clone());
        self.state.tooltip_position = Some(position);

        if changed {
            dispatch(
                self.sink.as_ref(),
                AnalyticsEvent::StageHover {
                    stage_id: id.clone(),
                },
            );
            self.record(previous);
        }
    }

    pub fn leave(&mut self, id: &StageId) {
        if self.state.open.as_ref() == Some(id) {
            return;
        }
        if self.state.hovered.as_ref() != Some(id) {
            return;
        }

        let previous = self.state.phase();
        self.state = InteractionState::default();
        self.record(previous);
    }

    pub fn open(&mut self, id: &StageId) {
        self.open_from(id, None);
    }

    pub fn open_from(&mut self, id: &StageId, trigger: Option<Id>) {
        let was_open = self.state.open.is_some();
        let previous = self.state.phase();

        self.state = InteractionState {
            hovered: Some(id.clone()),
            open: Some(id.clone()),
            tooltip_position: self.last_pointer,
        };
        self.open_generation = self.open_generation.wrapping_add(1);
        self.focus.opened(trigger, was_open);

        dispatch(
            self.sink.as_ref(),
            AnalyticsEvent::StageOpen {
                stage_id: id.clone(),
            },
        );
        self.record(previous);
    }

    pub fn close_drawer(&mut self) {
        let was_open = self.state.open.is_some();
        let previous = self.state.phase();

        self.state = InteractionState::default();
        if was_open {
            self.open_generation = self.open_generation.wrapping_add(1);
            self.focus.closed();
        }
        self.record(previous);
    }

    pub fn escape_key(&mut self) {
        self.close_drawer();
    }

    /// Drops hover/open state whose stage no longer passes `keep`. Returns
    /// whether anything was invalidated. An open stage that is kept gets a
    /// fresh detail ticket.
    pub fn retain_stages(&mut self, keep: impl Fn(&StageId) -> bool) -> bool {
        let Some(current) = self.state.hovered.clone() else {
            return false;
        };
        if keep(&current) {
            if self.state.open.is_some() {
                self.open_generation += 1;
            }
            return false;
        }

        tracing::debug!(stage_id = %current, "dropping interaction on a stage that no longer exists");
        self.close_drawer();
        true
    }

    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.focus.take()
    }

    pub fn detail_ticket(&self) -> Option<DetailTicket> {
        self.state.open.as_ref().map(|stage_id| DetailTicket {
            stage_id: stage_id.clone(),
            generation: self.open_generation,
        })
    }

    pub fn accepts(&self, ticket: &DetailTicket) -> bool {
        ticket.generation == self.open_generation
            && self.state.open.as_ref() == Some(&ticket.stage_id)
    }

    fn record(&mut self, previous: Phase) {
        let next = self.state.phase();
        if previous == next {
            return;
        }
        tracing::debug!(from = ?previous, to = ?next, "interaction transition");
        self.transitions.push(self.timings.between(previous, next));
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::super::analytics::testing::{FailingSink, RecordingSink};
    use super::*;

    fn coordinator() -> (InteractionCoordinator, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::default());
        let coordinator = InteractionCoordinator::new(sink.clone(), TransitionTimings::default());
        (coordinator, sink)
    }

    fn id(value: &str) -> StageId {
        StageId::from(value)
    }

    #[test]
    fn starts_idle() {
        let (coordinator, _) = coordinator();
        assert_eq!(coordinator.render_state(), RenderState::Idle);
        assert!(coordinator.state().invariants_hold());
    }

    #[test]
    fn hover_is_edge_triggered_and_open_is_level_triggered() {
        let (mut coordinator, sink) = coordinator();

        coordinator.enter(&id("v1"), pos2(10.0, 10.0));
        coordinator.enter(&id("v1"), pos2(12.0, 11.0));
        assert_eq!(sink.count("stage_hover"), 1);

        coordinator.open(&id("v1"));
        coordinator.open(&id("v1"));
        assert_eq!(sink.count("stage_open"), 2);
    }

    #[test]
    fn hover_fires_again_after_leave_or_on_a_new_stage() {
        let (mut coordinator, sink) = coordinator();

        coordinator.enter(&id("v1"), pos2(0.0, 0.0));
        coordinator.enter(&id("v2"), pos2(5.0, 0.0));
        coordinator.leave(&id("v2"));
        coordinator.enter(&id("v2"), pos2(5.0, 0.0));

        assert_eq!(sink.count("stage_hover"), 3);
    }

    #[test]
    fn pointer_moves_update_the_tooltip_position() {
        let (mut coordinator, _) = coordinator();
        coordinator.enter(&id("v1"), pos2(1.0, 2.0));
        coordinator.enter(&id("v1"), pos2(3.0, 4.0));

        assert_eq!(
            coordinator.render_state(),
            RenderState::Hovered {
                stage_id: id("v1"),
                position: pos2(3.0, 4.0)
            }
        );
    }

    #[test]
    fn leave_returns_to_idle_only_for_the_hovered_stage() {
        let (mut coordinator, _) = coordinator();
        coordinator.enter(&id("v1"), pos2(0.0, 0.0));

        coordinator.leave(&id("v2"));
        assert_eq!(coordinator.phase(), Phase::Hovered(id("v1")));

        coordinator.leave(&id("v1"));
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.state().tooltip_position(), None);
    }

    #[test]
    fn leave_is_ignored_for_the_open_stage() {
        let (mut coordinator, _) = coordinator();
        coordinator.enter(&id("v3"), pos2(4.0, 4.0));
        coordinator.open(&id("v3"));

        coordinator.leave(&id("v3"));

        assert_eq!(coordinator.phase(), Phase::Open(id("v3")));
        assert_eq!(coordinator.state().hovered(), Some(&id("v3")));
        assert!(coordinator.state().invariants_hold());
    }

    #[test]
    fn open_keeps_the_last_pointer_position() {
        let (mut coordinator, _) = coordinator();
        coordinator.enter(&id("v1"), pos2(40.0, 50.0));
        coordinator.open(&id("v2"));

        assert_eq!(
            coordinator.render_state(),
            RenderState::Open {
                stage_id: id("v2"),
                position: Some(pos2(40.0, 50.0))
            }
        );
        assert!(coordinator.render_state().tooltip().is_none());
        assert!(coordinator.state().invariants_hold());
    }

    #[test]
    fn hovering_other_stages_while_open_does_not_break_the_invariant() {
        let (mut coordinator, sink) = coordinator();
        coordinator.open(&id("v1"));
        coordinator.enter(&id("v4"), pos2(1.0, 1.0));

        assert_eq!(coordinator.phase(), Phase::Open(id("v1")));
        assert_eq!(sink.count("stage_hover"), 0);
        assert!(coordinator.state().invariants_hold());

        coordinator.enter(&id("v1"), pos2(9.0, 9.0));
        assert_eq!(coordinator.state().tooltip_position(), Some(pos2(9.0, 9.0)));
    }

    #[test]
    fn reopening_switches_directly_between_stages() {
        let (mut coordinator, _) = coordinator();
        coordinator.open(&id("a"));
        coordinator.open(&id("b"));

        let last = coordinator.last_transition().expect("transition");
        assert_eq!(last.from, Phase::Open(id("a")));
        assert_eq!(last.to, Phase::Open(id("b")));

        let phases = coordinator
            .transitions()
            .map(|transition| transition.to.clone())
            .collect::<Vec<_>>();
        assert_eq!(phases, vec![Phase::Open(id("a")), Phase::Open(id("b"))]);
    }

    #[test]
    fn close_always_yields_idle() {
        let (mut coordinator, _) = coordinator();

        coordinator.close_drawer();
        assert_eq!(coordinator.render_state(), RenderState::Idle);

        coordinator.enter(&id("v2"), pos2(0.0, 0.0));
        coordinator.close_drawer();
        assert_eq!(coordinator.render_state(), RenderState::Idle);

        coordinator.enter(&id("v2"), pos2(0.0, 0.0));
        coordinator.open(&id("v5"));
        coordinator.close_drawer();
        assert_eq!(coordinator.render_state(), RenderState::Idle);
        assert!(coordinator.state().invariants_hold());
    }

    #[test]
    fn escape_behaves_like_close() {
        let (mut coordinator, _) = coordinator();
        coordinator.open(&id("v1"));
        coordinator.escape_key();
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn focus_moves_to_the_drawer_and_back_to_the_trigger() {
        let (mut coordinator, _) = coordinator();
        let trigger = Id::new("row-v2");

        coordinator.open_from(&id("v2"), Some(trigger));
        assert_eq!(
            coordinator.take_focus_request(),
            Some(FocusRequest::DrawerDismiss)
        );

        coordinator.close_drawer();
        let Some(FocusRequest::Restore(restore)) = coordinator.take_focus_request() else {
            panic!("expected focus restore");
        };
        let fallback = Id::new("root");
        assert_eq!(restore.resolve(|_| true, fallback), trigger);
        assert_eq!(restore.resolve(|_| false, fallback), fallback);
    }

    #[test]
    fn closing_without_an_open_drawer_requests_no_focus_change() {
        let (mut coordinator, _) = coordinator();
        coordinator.enter(&id("v1"), pos2(0.0, 0.0));
        coordinator.close_drawer();
        assert_eq!(coordinator.take_focus_request(), None);
    }

    #[test]
    fn stale_detail_tickets_are_rejected() {
        let (mut coordinator, _) = coordinator();
        assert!(coordinator.detail_ticket().is_none());

        coordinator.open(&id("a"));
        let first = coordinator.detail_ticket().expect("ticket");
        assert!(coordinator.accepts(&first));

        coordinator.open(&id("b"));
        let second = coordinator.detail_ticket().expect("ticket");
        assert!(!coordinator.accepts(&first));
        assert!(coordinator.accepts(&second));

        // reopening the same stage also supersedes the earlier request
        coordinator.open(&id("b"));
        assert!(!coordinator.accepts(&second));

        let third = coordinator.detail_ticket().expect("ticket");
        coordinator.close_drawer();
        assert!(!coordinator.accepts(&third));
    }

    #[test]
    fn retain_drops_missing_stages_only() {
        let (mut coordinator, _) = coordinator();
        coordinator.open(&id("s_repeat"));

        assert!(!coordinator.retain_stages(|stage| stage.as_str().starts_with("s_")));
        assert_eq!(coordinator.phase(), Phase::Open(id("s_repeat")));

        assert!(coordinator.retain_stages(|stage| stage.as_str().starts_with("e_")));
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert!(matches!(
            coordinator.take_focus_request(),
            Some(FocusRequest::Restore(_))
        ));

        coordinator.enter(&id("s_ltv"), pos2(0.0, 0.0));
        assert!(coordinator.retain_stages(|_| false));
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn kept_open_stage_renews_its_detail_ticket() {
        let (mut coordinator, _) = coordinator();
        coordinator.open(&id("f_nps"));
        let before = coordinator.detail_ticket().expect("ticket");

        assert!(!coordinator.retain_stages(|_| true));
        assert_eq!(coordinator.phase(), Phase::Open(id("f_nps")));
        assert!(!coordinator.accepts(&before));
        let after = coordinator.detail_ticket().expect("ticket");
        assert!(coordinator.accepts(&after));
        assert_eq!(after.stage_id, before.stage_id);
    }

    #[test]
    fn motion_follows_the_last_transition() {
        let timings = TransitionTimings {
            hover: Duration::from_millis(80),
            drawer: Duration::from_millis(300),
            easing: Easing::Linear,
        };
        let mut coordinator = InteractionCoordinator::new(Rc::new(RecordingSink::default()), timings);
        assert_eq!(coordinator.highlight_motion(), (timings.hover, Easing::Linear));
        assert_eq!(coordinator.drawer_motion(), (timings.drawer, Easing::Linear));

        coordinator.enter(&id("v1"), pos2(0.0, 0.0));
        assert_eq!(coordinator.highlight_motion().0, timings.hover);
        assert_eq!(coordinator.drawer_motion().0, timings.drawer);

        coordinator.open(&id("v1"));
        assert_eq!(coordinator.highlight_motion().0, timings.drawer);

        coordinator.close_drawer();
        let last = coordinator.last_transition().expect("transition");
        assert_eq!(last.to, Phase::Idle);
        assert_eq!(coordinator.drawer_motion(), (last.duration, last.easing));
    }

    #[test]
    fn failing_sink_never_interrupts_transitions() {
        let mut coordinator =
            InteractionCoordinator::new(Rc::new(FailingSink), TransitionTimings::default());
        coordinator.enter(&id("v1"), pos2(0.0, 0.0));
        coordinator.open(&id("v1"));
        assert_eq!(coordinator.phase(), Phase::Open(id("v1")));
    }

    #[test]
    fn invariants_hold_across_a_mixed_event_sequence() {
        let (mut coordinator, _) = coordinator();
        let ids = ["v1", "v2", "b1", "s_nps"];

        for step in 0..200usize {
            let target = id(ids[step % ids.len()]);
            match (step * 7) % 6 {
                0 => coordinator.enter(&target, pos2(step as f32, 0.0)),
                1 => coordinator.leave(&target),
                2 => coordinator.open(&target),
                3 => coordinator.close_drawer(),
                4 => coordinator.escape_key(),
                _ => {
                    coordinator.retain_stages(|stage| stage.as_str() != "b1");
                }
            }
            assert!(coordinator.state().invariants_hold(), "step {step}");
        }
    }
}
