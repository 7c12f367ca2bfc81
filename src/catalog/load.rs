use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use super::parse::{RawStage, clean_list, parse_catalog_json};
use super::stage::{
    BusinessModel, BusinessModelId, SecondaryMetricGroup, Stage, StageCatalog, StageConnections,
    StageId,
};

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.json");

pub fn builtin_catalog() -> Result<StageCatalog> {
    catalog_from_json(BUILTIN_CATALOG).context("failed to load the built-in stage catalog")
}

pub fn load_catalog(path: Option<&Path>) -> Result<StageCatalog> {
    let Some(path) = path else {
        return builtin_catalog();
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read stage catalog {}", path.display()))?;
    catalog_from_json(&raw)
        .with_context(|| format!("failed to load stage catalog {}", path.display()))
}

pub fn catalog_from_json(raw: &str) -> Result<StageCatalog> {
    let parsed = parse_catalog_json(raw)?;

    let funnel = parsed
        .funnel
        .into_iter()
        .map(convert_stage)
        .collect::<Result<Vec<_>>>()
        .context("invalid funnel stage")?;
    let bridge = convert_stage(parsed.bridge).context("invalid bridge stage")?;

    let mut base_ids = HashSet::with_capacity(funnel.len() + 1);
    for stage in funnel.iter().chain(std::iter::once(&bridge)) {
        if !base_ids.insert(stage.id.clone()) {
            bail!("duplicate funnel/bridge stage id `{}`", stage.id);
        }
    }

    let mut flywheel = BTreeMap::new();
    let mut owners: HashMap<StageId, Vec<BusinessModelId>> = HashMap::new();
    for (model, raw_stages) in parsed.flywheel {
        let stages = raw_stages
            .into_iter()
            .map(convert_stage)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid flywheel metric for model {model}"))?;

        let mut seen = HashSet::with_capacity(stages.len());
        for stage in &stages {
            if base_ids.contains(&stage.id) {
                bail!(
                    "flywheel metric `{}` of model {model} collides with a funnel or bridge stage",
                    stage.id
                );
            }
            if !seen.insert(stage.id.clone()) {
                bail!("duplicate flywheel metric id `{}` in model {model}", stage.id);
            }
            owners.entry(stage.id.clone()).or_default().push(model);
        }

        flywheel.insert(model, stages);
    }

    for (id, models) in &owners {
        if models.len() > 1 {
            tracing::debug!(stage_id = %id, ?models, "flywheel metric id shared across models");
        }
    }

    let models = parsed
        .models
        .into_iter()
        .map(|raw| BusinessModel {
            id: raw.id,
            label: raw.label.trim().to_string(),
            summary: raw.summary.trim().to_string(),
            focus: clean_list(raw.focus),
        })
        .collect::<Vec<_>>();

    for model in BusinessModelId::ALL {
        if !flywheel.contains_key(&model) {
            bail!("stage catalog has no flywheel metrics for model {model}");
        }
        if !models.iter().any(|entry| entry.id == model) {
            bail!("stage catalog has no description for model {model}");
        }
    }

    let secondary_groups = parsed
        .secondary_metrics
        .into_iter()
        .map(|raw| SecondaryMetricGroup {
            title: raw.title.trim().to_string(),
            metrics: clean_list(raw.metrics),
        })
        .filter(|group| !group.title.is_empty())
        .collect();

    Ok(StageCatalog {
        funnel,
        bridge,
        flywheel,
        models,
        secondary_groups,
    })
}

fn convert_stage(raw: RawStage) -> Result<Stage> {
    let id = raw.id.trim();
    if id.is_empty() {
        return Err(anyhow!("stage `{}` has an empty id", raw.label));
    }

    let label = raw.label.trim();
    if label.is_empty() {
        return Err(anyhow!("stage `{id}` has an empty label"));
    }

    let short_label = raw
        .short_label
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let connections = raw
        .connections
        .map(|raw| StageConnections {
            upstream: clean_list(raw.upstream),
            downstream: clean_list(raw.downstream),
        })
        .filter(|connections| {
            !connections.upstream.is_empty() || !connections.downstream.is_empty()
        });

    Ok(Stage {
        id: StageId::new(id),
        metric_id: raw.metric_id.trim().to_string(),
        label: label.to_string(),
        short_label,
        definition: raw.definition.trim().to_string(),
        insight: raw.insight.trim().to_string(),
        next_step: raw.next_step.trim().to_string(),
        leakage: raw.leakage.trim().to_string(),
        activation: raw.activation.trim().to_string(),
        bitrix_object: raw.bitrix_object.trim().to_string(),
        examples: clean_list(raw.examples),
        connections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_json(id: &str) -> String {
        format!(r#"{{"id": "{id}", "metricId": "{id}", "label": "Stage {id}"}}"#)
    }

    fn models_json() -> &'static str {
        r#"[
            {"id": "services", "label": "Services"},
            {"id": "ecommerce", "label": "E-commerce"},
            {"id": "subscription", "label": "Subscription"}
        ]"#
    }

    fn catalog_json(funnel: &[&str], bridge: &str, services: &[&str]) -> String {
        let funnel = funnel.iter().map(|id| stage_json(id)).collect::<Vec<_>>();
        let services = services.iter().map(|id| stage_json(id)).collect::<Vec<_>>();
        format!(
            r#"{{
                "funnel": [{}],
                "bridge": {},
                "flywheel": {{
                    "services": [{}],
                    "ecommerce": [{}],
                    "subscription": []
                }},
                "models": {}
            }}"#,
            funnel.join(","),
            stage_json(bridge),
            services.join(","),
            stage_json("e1"),
            models_json()
        )
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin_catalog().expect("builtin catalog");
        assert_eq!(catalog.funnel.len(), 6);
        assert_eq!(catalog.funnel[0].id.as_str(), "v1");
        for model in BusinessModelId::ALL {
            assert!(!catalog.flywheel_for(model).is_empty());
            assert!(catalog.model(model).is_some());
        }
        assert!(!catalog.secondary_groups.is_empty());
    }

    #[test]
    fn rejects_duplicate_funnel_ids() {
        let raw = catalog_json(&["v1", "v1"], "b1", &["s1"]);
        let error = catalog_from_json(&raw).expect_err("duplicate ids");
        assert!(format!("{error:#}").contains("duplicate"));
    }

    #[test]
    fn rejects_flywheel_ids_colliding_with_funnel() {
        let raw = catalog_json(&["v1", "v2"], "b1", &["v2"]);
        assert!(catalog_from_json(&raw).is_err());
    }

    #[test]
    fn rejects_missing_model_dataset() {
        let raw = format!(
            r#"{{"funnel": [], "bridge": {}, "flywheel": {{"services": []}}, "models": {}}}"#,
            stage_json("b1"),
            models_json()
        );
        let error = catalog_from_json(&raw).expect_err("missing models");
        assert!(format!("{error:#}").contains("ecommerce"));
    }

    #[test]
    fn empty_funnel_is_accepted() {
        let raw = catalog_json(&[], "b1", &["s1"]);
        let catalog = catalog_from_json(&raw).expect("catalog");
        assert!(catalog.funnel.is_empty());
    }

    #[test]
    fn trims_optional_fields_and_drops_empty_connections() {
        let raw = format!(
            r#"{{
                "funnel": [{{
                    "id": " v1 ", "metricId": "V1", "label": "Reach", "shortLabel": "  ",
                    "examples": ["one", " ", "two "],
                    "connections": {{"upstream": [], "downstream": [" "]}}
                }}],
                "bridge": {},
                "flywheel": {{"services": [], "ecommerce": [], "subscription": []}},
                "models": {}
            }}"#,
            stage_json("b1"),
            models_json()
        );
        let catalog = catalog_from_json(&raw).expect("catalog");
        let stage = &catalog.funnel[0];
        assert_eq!(stage.id.as_str(), "v1");
        assert_eq!(stage.short_label, None);
        assert_eq!(stage.display_label(), "Reach");
        assert_eq!(stage.examples, vec!["one".to_string(), "two".to_string()]);
        assert!(stage.connections.is_none());
    }
}
