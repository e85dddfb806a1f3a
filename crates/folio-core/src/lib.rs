//! Folio: Core library.
//! Portfolio records, the sled store, chat context assembly and the completion client.

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod store;

pub use analytics::{AnalyticsEvent, AnalyticsOverview, EventKind, ProjectViewStat, TimelinePoint};
pub use auth::{AdminAuth, ADMIN_USERNAME};
pub use chat::{ChatResponder, NO_REPLY_FALLBACK};
pub use completion::{Candidate, ChatMessage, CompletionClient, OpenAiCompatClient, Role};
pub use config::{EnvFallbacks, FolioConfig};
pub use context::{assemble_context, render_context, FALLBACK_CONTEXT};
pub use error::{ChatError, CompletionError, StoreError, StoreResult};
pub use models::{
    Experience, ExperienceInput, ExperienceKind, ExperienceUpdate, Profile, ProfileInput, Project,
    ProjectInput, ProjectUpdate, Skill, SkillCategory, SkillInput, SkillUpdate,
};
pub use store::{PortfolioSnapshot, PortfolioSource, PortfolioStore};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
