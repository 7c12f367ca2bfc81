mod analytics;
mod coordinator;
mod focus;
mod state;
mod transition;

pub use analytics::{AnalyticsEvent, AnalyticsSink, TracingSink, dispatch};
pub use coordinator::{DetailTicket, InteractionCoordinator};
pub use focus::{FocusRequest, FocusRestore};
pub use state::{InteractionState, RenderState};
pub use transition::{Easing, Phase, Transition, TransitionTimings};

#[cfg(test)]
pub(crate) use analytics::testing;
