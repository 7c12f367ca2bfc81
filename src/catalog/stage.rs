use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessModelId {
    Services,
    Ecommerce,
    Subscription,
}

impl BusinessModelId {
    pub const ALL: [Self; 3] = [Self::Services, Self::Ecommerce, Self::Subscription];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Ecommerce => "ecommerce",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for BusinessModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown business model `{0}` (expected services, ecommerce or subscription)")]
pub struct UnknownModel(String);

impl FromStr for BusinessModelId {
    type Err = UnknownModel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == normalized)
            .ok_or_else(|| UnknownModel(value.to_owned()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageConnections {
    pub upstream: Vec<String>,
    pub downstream: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    pub id: StageId,
    pub metric_id: String,
    pub label: String,
    pub short_label: Option<String>,
    pub definition: String,
    pub insight: String,
    pub next_step: String,
    pub leakage: String,
    pub activation: String,
    pub bitrix_object: String,
    pub examples: Vec<String>,
    pub connections: Option<StageConnections>,
}

impl Stage {
    pub fn display_label(&self) -> &str {
        self.short_label.as_deref().unwrap_or(&self.label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessModel {
    pub id: BusinessModelId,
    pub label: String,
    pub summary: String,
    pub focus: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecondaryMetricGroup {
    pub title: String,
    pub metrics: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct StageCatalog {
    pub funnel: Vec<Stage>,
    pub bridge: Stage,
    pub flywheel: BTreeMap<BusinessModelId, Vec<Stage>>,
    pub models: Vec<BusinessModel>,
    pub secondary_groups: Vec<SecondaryMetricGroup>,
}

impl StageCatalog {
    pub fn flywheel_for(&self, model: BusinessModelId) -> &[Stage] {
        self.flywheel.get(&model).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn model(&self, model: BusinessModelId) -> Option<&BusinessModel> {
        self.models.iter().find(|entry| entry.id == model)
    }

    pub fn stage_count(&self, model: BusinessModelId) -> usize {
        self.funnel.len() + 1 + self.flywheel_for(model).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_parse_case_insensitively() {
        assert_eq!(
            "Ecommerce".parse::<BusinessModelId>().expect("parse"),
            BusinessModelId::Ecommerce
        );
        assert_eq!(
            " subscription ".parse::<BusinessModelId>().expect("parse"),
            BusinessModelId::Subscription
        );
        assert!("retail".parse::<BusinessModelId>().is_err());
    }

    #[test]
    fn model_ids_serialize_snake_case() {
        let encoded = serde_json::to_string(&BusinessModelId::Services).expect("serialize");
        assert_eq!(encoded, "\"services\"");
    }
}
