use crate::domain::chat::Source;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_attributions: Vec<GroundingEntry>,
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingEntry {
    #[serde(default)]
    pub web: Option<WebReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebReference {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Citations in order of first appearance, attributions before chunks.
/// Entries lacking a uri or title are dropped; duplicates (by uri) are collapsed.
pub fn collect_sources(meta: &GroundingMetadata) -> Vec<Source> {
    let mut seen = HashSet::new();
    meta.grounding_attributions
        .iter()
        .chain(meta.grounding_chunks.iter())
        .filter_map(|entry| {
            let web = entry.web.as_ref()?;
            let uri = web.uri.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
            let title = web.title.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
            Some(Source {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}
