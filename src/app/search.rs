use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::{Stage, StageId};

pub(super) struct SearchMatchCache {
    pub query: String,
    pub dataset_revision: u64,
    pub matches: Arc<HashSet<StageId>>,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn stage_score(matcher: &SkimMatcherV2, stage: &Stage, query: &str) -> Option<i64> {
    [
        stage.label.as_str(),
        stage.display_label(),
        stage.metric_id.as_str(),
        stage.bitrix_object.as_str(),
    ]
    .into_iter()
    .filter_map(|text| fuzzy_match_score(matcher, text, query))
    .max()
}

/// Stages matching `query`, best match first. Ties keep catalog order.
pub(super) fn rank_stages<'a>(
    stages: impl Iterator<Item = &'a Stage>,
    query: &str,
) -> Vec<(&'a Stage, i64)> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked = stages
        .filter_map(|stage| stage_score(&matcher, stage, query).map(|score| (stage, score)))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
