use serde::Serialize;

use crate::catalog::{BusinessModelId, StageId};

/// Named events consumed by the external analytics sink. The names and
/// payload fields are the compatibility surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    StageHover { stage_id: StageId },
    StageOpen { stage_id: StageId },
    ModelChange { model: BusinessModelId },
    FaqOpen { question_id: String },
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StageHover { .. } => "stage_hover",
            Self::StageOpen { .. } => "stage_open",
            Self::ModelChange { .. } => "model_change",
            Self::FaqOpen { .. } => "faq_open",
        }
    }
}

pub trait AnalyticsSink {
    fn emit(&self, event: &AnalyticsEvent) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn emit(&self, event: &AnalyticsEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(event)?;
        tracing::info!(target: "analytics", event = event.name(), %payload);
        Ok(())
    }
}

/// Fire-and-forget emission: sink failures are logged and dropped.
pub fn dispatch(sink: &dyn AnalyticsSink, event: AnalyticsEvent) {
    if let Err(error) = sink.emit(&event) {
        tracing::warn!(event = event.name(), error = %format!("{error:#}"), "dropped analytics event");
    }
}
