//! Data models for admin-console entities.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `Article`, `ArticlePayload`, `ArticleTranslation`: Content and its translations
//! - `Advisor`, `School`, `VisaType`: Entities attached to an article
//! - `RawTag`, `Tag`: Tag tree as stored and as displayed
//! - `TeamMember`, `Role`: Users and their roles
//! - `TokenPair`, `LoginPayload`, `RegisterPayload`: Authentication bodies

pub mod article;
pub mod tag;
pub mod user;

pub use article::{
    Advisor, Article, ArticlePayload, ArticleTags, ArticleTranslation, RelatedEntity, School,
    VisaType,
};
pub use tag::{flatten_tags, RawTag, Tag, TagPayload};
pub use user::{LoginPayload, NewRole, RegisterPayload, Role, TeamMember, TokenPair};
