use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::stage::BusinessModelId;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawCatalog {
    #[serde(default)]
    pub(super) funnel: Vec<RawStage>,
    pub(super) bridge: RawStage,
    #[serde(default)]
    pub(super) flywheel: BTreeMap<BusinessModelId, Vec<RawStage>>,
    #[serde(default)]
    pub(super) models: Vec<RawModel>,
    #[serde(default)]
    pub(super) secondary_metrics: Vec<RawSecondaryGroup>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawStage {
    pub(super) id: String,
    pub(super) metric_id: String,
    pub(super) label: String,
    #[serde(default)]
    pub(super) short_label: Option<String>,
    #[serde(default)]
    pub(super) definition: String,
    #[serde(default)]
    pub(super) insight: String,
    #[serde(default)]
    pub(super) next_step: String,
    #[serde(default)]
    pub(super) leakage: String,
    #[serde(default)]
    pub(super) activation: String,
    #[serde(default)]
    pub(super) bitrix_object: String,
    #[serde(default)]
    pub(super) examples: Vec<String>,
    #[serde(default)]
    pub(super) connections: Option<RawConnections>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawConnections {
    #[serde(default)]
    pub(super) upstream: Vec<String>,
    #[serde(default)]
    pub(super) downstream: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawModel {
    pub(super) id: BusinessModelId,
    pub(super) label: String,
    #[serde(default)]
    pub(super) summary: String,
    #[serde(default)]
    pub(super) focus: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawSecondaryGroup {
    pub(super) title: String,
    #[serde(default)]
    pub(super) metrics: Vec<String>,
}

pub(super) fn parse_catalog_json(raw: &str) -> Result<RawCatalog> {
    serde_json::from_str(raw).context("invalid stage catalog JSON")
}

pub(super) fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
