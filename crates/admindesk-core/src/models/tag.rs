use serde::{Deserialize, Serialize};

/// Tag as stored by the backend, linked to its parent by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RawTag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub created_at: String,
}

/// Display form of a tag: the parent is resolved to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct TagPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Flatten the tag tree into display rows. A parent id that does not match
/// any tag in `raw` yields no parent.
pub fn flatten_tags(raw: &[RawTag]) -> Vec<Tag> {
    raw.iter()
        .map(|tag| Tag {
            id: tag.id.clone(),
            name: tag.name.clone(),
            parent: tag.parent_id.as_ref().and_then(|parent_id| {
                raw.iter()
                    .find(|candidate| &candidate.id == parent_id)
                    .map(|parent| parent.name.clone())
            }),
            created_at: tag.created_at.clone(),
        })
        .collect()
}
