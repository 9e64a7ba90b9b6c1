use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ArticleTranslation {
    pub language: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ArticleTags {
    pub primary: String,
    #[serde(default)]
    pub sub_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Advisor {
    pub id: String,
    pub title: String,
    pub full_name: String,
    #[serde(default)]
    pub group_id: Option<String>,
    pub created_at: String,
    pub article_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    pub address: String,
    pub created_at: String,
    pub article_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VisaType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub article_id: String,
}

/// An article as returned by the listing and detail endpoints.
///
/// Most fields are optional because the listing endpoints omit the heavier
/// relations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Option<ArticleTags>,
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub translations: Vec<ArticleTranslation>,
    #[serde(rename = "Advisor", default)]
    pub advisor: Option<Advisor>,
    #[serde(rename = "School", default)]
    pub school: Option<School>,
    #[serde(rename = "VisaType", default)]
    pub visa_type: Option<VisaType>,
    #[serde(default)]
    pub view_count: u64,
}

/// Body for creating or updating an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    pub title: String,
    pub description: String,
    pub content: String,
    #[serde(rename = "type")]
    pub article_type: String,
    pub status: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub lowest_tags: String,
    #[serde(rename = "ArticleType", default, skip_serializing_if = "Option::is_none")]
    pub article_kind: Option<String>,
    #[serde(default)]
    pub translations: Vec<ArticleTranslation>,
}

/// Entities that hang off an article through `/api/{kind}s/{articleId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedEntity {
    Advisor,
    School,
    VisaType,
}

impl RelatedEntity {
    /// Lowercase name as used in paths and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedEntity::Advisor => "advisor",
            RelatedEntity::School => "school",
            RelatedEntity::VisaType => "visatype",
        }
    }

    pub fn path(&self, article_id: &str) -> String {
        format!("/api/{}s/{}", self.as_str(), article_id)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "advisor" => Some(RelatedEntity::Advisor),
            "school" => Some(RelatedEntity::School),
            "visatype" | "visa-type" | "visa_type" => Some(RelatedEntity::VisaType),
            _ => None,
        }
    }
}
