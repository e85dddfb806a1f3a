//! Portfolio Store: sled-backed persistence, one tree per collection.
//!
//! | Tree        | Key                          | Value                 |
//! |-------------|------------------------------|-----------------------|
//! | profile     | `profile`                    | `Profile` JSON        |
//! | skills      | skill id                     | `Skill` JSON          |
//! | projects    | project id                   | `Project` JSON        |
//! | experience  | experience id                | `Experience` JSON     |
//! | analytics   | `{millis:020}_{uuid}`        | `AnalyticsEvent` JSON |
//!
//! The chat core only reads through [`PortfolioSource`]; every write lives here and is
//! reached from the admin routes.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    Experience, ExperienceInput, ExperienceKind, ExperienceUpdate, Profile, ProfileInput, Project,
    ProjectInput, ProjectUpdate, Skill, SkillInput, SkillUpdate,
};

const DEFAULT_PATH: &str = "./data/folio";

const PROFILE_TREE: &str = "profile";
const SKILLS_TREE: &str = "skills";
const PROJECTS_TREE: &str = "projects";
const EXPERIENCE_TREE: &str = "experience";
pub(crate) const ANALYTICS_TREE: &str = "analytics";

/// Single key in the profile tree; a second profile cannot exist.
const PROFILE_KEY: &[u8] = b"profile";

/// Everything the context assembler needs, read in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSnapshot {
    pub profile: Option<Profile>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
}

/// Read-only view over the four portfolio collections.
#[async_trait]
pub trait PortfolioSource: Send + Sync {
    async fn profile(&self) -> StoreResult<Option<Profile>>;
    async fn skills(&self) -> StoreResult<Vec<Skill>>;
    async fn projects(&self) -> StoreResult<Vec<Project>>;
    async fn experiences(&self) -> StoreResult<Vec<Experience>>;

    /// Reads all four collections; the first failure aborts the snapshot.
    async fn snapshot(&self) -> StoreResult<PortfolioSnapshot> {
        Ok(PortfolioSnapshot {
            profile: self.profile().await?,
            skills: self.skills().await?,
            projects: self.projects().await?,
            experiences: self.experiences().await?,
        })
    }
}

/// Sled-backed store for profile, skills, projects, experience and analytics.
pub struct PortfolioStore {
    db: sled::Db,
}

impl PortfolioStore {
    /// Open the store at the given path (defaults to `./data/folio`).
    pub fn open(path: Option<impl AsRef<Path>>) -> StoreResult<Self> {
        let p = path
            .map(|x| x.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new(DEFAULT_PATH).to_path_buf());
        let db = sled::open(&p)?;
        tracing::info!(path = %p.display(), "portfolio store opened");
        Ok(Self { db })
    }

    pub(crate) fn tree(&self, name: &str) -> StoreResult<sled::Tree> {
        Ok(self.db.open_tree(name)?)
    }

    /// Flush dirty pages to disk. Called on shutdown.
    pub fn flush(&self) -> StoreResult<usize> {
        Ok(self.db.flush()?)
    }

    // ---------------------------------------------------------------------
    // Profile
    // ---------------------------------------------------------------------

    pub fn get_profile(&self) -> StoreResult<Option<Profile>> {
        get_json(&self.tree(PROFILE_TREE)?, PROFILE_KEY)
    }

    /// Create the profile, or replace its content while keeping id and creation time.
    pub fn upsert_profile(&self, input: ProfileInput) -> StoreResult<Profile> {
        let tree = self.tree(PROFILE_TREE)?;
        let now = Utc::now();
        loop {
            let current = tree.get(PROFILE_KEY)?;
            let existing: Option<Profile> = match &current {
                Some(bytes) => Some(serde_json::from_slice(bytes)?),
                None => None,
            };
            let profile = input.clone().into_profile(existing.as_ref(), now)?;
            let next = serde_json::to_vec(&profile)?;
            if tree.compare_and_swap(PROFILE_KEY, current, Some(next))?.is_ok() {
                tracing::info!(id = %profile.id, created = existing.is_none(), "profile saved");
                return Ok(profile);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Skills
    // ---------------------------------------------------------------------

    /// All skills by category, then display order, then creation time.
    pub fn list_skills(&self) -> StoreResult<Vec<Skill>> {
        let mut skills: Vec<Skill> = scan_json(&self.tree(SKILLS_TREE)?)?;
        skills.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.order.cmp(&b.order))
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(skills)
    }

    pub fn create_skill(&self, input: SkillInput) -> StoreResult<Skill> {
        let skill = input.into_skill(Utc::now())?;
        put_json(&self.tree(SKILLS_TREE)?, skill.id.as_bytes(), &skill)?;
        tracing::info!(id = %skill.id, name = %skill.name, "skill created");
        Ok(skill)
    }

    pub fn update_skill(&self, id: &str, update: SkillUpdate) -> StoreResult<Skill> {
        let now = Utc::now();
        modify_json(&self.tree(SKILLS_TREE)?, "Skill", id, |skill: &mut Skill| {
            update.clone().apply(skill, now)
        })
    }

    pub fn delete_skill(&self, id: &str) -> StoreResult<()> {
        remove(&self.tree(SKILLS_TREE)?, "Skill", id)
    }

    // ---------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------

    /// All projects by display order, newest first within equal order.
    pub fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = scan_json(&self.tree(PROJECTS_TREE)?)?;
        projects.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(projects)
    }

    pub fn get_project(&self, id: &str) -> StoreResult<Project> {
        get_json(&self.tree(PROJECTS_TREE)?, id.as_bytes())?
            .ok_or_else(|| StoreError::not_found("Project", id))
    }

    /// Increment the project's view counter and return the updated record.
    pub fn record_project_view(&self, id: &str) -> StoreResult<Project> {
        modify_json(&self.tree(PROJECTS_TREE)?, "Project", id, |project: &mut Project| {
            project.view_count = project.view_count.saturating_add(1);
            Ok(())
        })
    }

    pub fn create_project(&self, input: ProjectInput) -> StoreResult<Project> {
        let project = input.into_project(Utc::now())?;
        put_json(&self.tree(PROJECTS_TREE)?, project.id.as_bytes(), &project)?;
        tracing::info!(id = %project.id, title = %project.title, "project created");
        Ok(project)
    }

    pub fn update_project(&self, id: &str, update: ProjectUpdate) -> StoreResult<Project> {
        let now = Utc::now();
        modify_json(&self.tree(PROJECTS_TREE)?, "Project", id, |project: &mut Project| {
            update.clone().apply(project, now)
        })
    }

    pub fn delete_project(&self, id: &str) -> StoreResult<()> {
        remove(&self.tree(PROJECTS_TREE)?, "Project", id)
    }

    // ---------------------------------------------------------------------
    // Experience
    // ---------------------------------------------------------------------

    /// Entries newest start date first, optionally restricted to one variant.
    pub fn list_experiences(&self, kind: Option<ExperienceKind>) -> StoreResult<Vec<Experience>> {
        let mut entries: Vec<Experience> = scan_json(&self.tree(EXPERIENCE_TREE)?)?;
        if let Some(kind) = kind {
            entries.retain(|e| e.kind == kind);
        }
        entries.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(a.order.cmp(&b.order))
                .then(a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    pub fn create_experience(&self, input: ExperienceInput) -> StoreResult<Experience> {
        let exp = input.into_experience(Utc::now())?;
        put_json(&self.tree(EXPERIENCE_TREE)?, exp.id.as_bytes(), &exp)?;
        tracing::info!(id = %exp.id, kind = exp.kind.as_str(), "experience created");
        Ok(exp)
    }

    pub fn update_experience(&self, id: &str, update: ExperienceUpdate) -> StoreResult<Experience> {
        let now = Utc::now();
        modify_json(&self.tree(EXPERIENCE_TREE)?, "Experience", id, |exp: &mut Experience| {
            update.clone().apply(exp, now)
        })
    }

    pub fn delete_experience(&self, id: &str) -> StoreResult<()> {
        remove(&self.tree(EXPERIENCE_TREE)?, "Experience", id)
    }
}

#[async_trait]
impl PortfolioSource for PortfolioStore {
    async fn profile(&self) -> StoreResult<Option<Profile>> {
        self.get_profile()
    }

    async fn skills(&self) -> StoreResult<Vec<Skill>> {
        self.list_skills()
    }

    async fn projects(&self) -> StoreResult<Vec<Project>> {
        self.list_projects()
    }

    async fn experiences(&self) -> StoreResult<Vec<Experience>> {
        self.list_experiences(None)
    }
}

pub(crate) fn get_json<T: DeserializeOwned>(tree: &sled::Tree, key: &[u8]) -> StoreResult<Option<T>> {
    match tree.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub(crate) fn put_json<T: Serialize>(tree: &sled::Tree, key: &[u8], value: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec(value)?;
    tree.insert(key, bytes)?;
    Ok(())
}

/// Decode every value in the tree, in key order.
pub(crate) fn scan_json<T: DeserializeOwned>(tree: &sled::Tree) -> StoreResult<Vec<T>> {
    tree.iter()
        .values()
        .map(|v| -> StoreResult<T> {
            let bytes = v?;
            Ok(serde_json::from_slice(&bytes)?)
        })
        .collect()
}

/// Read-modify-write of one record as a compare-and-swap loop, so concurrent edits
/// and view increments never overwrite each other. `edit` may run more than once.
pub(crate) fn modify_json<T, F>(
    tree: &sled::Tree,
    kind: &'static str,
    id: &str,
    mut edit: F,
) -> StoreResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnMut(&mut T) -> StoreResult<()>,
{
    loop {
        let current = tree
            .get(id.as_bytes())?
            .ok_or_else(|| StoreError::not_found(kind, id))?;
        let mut value: T = serde_json::from_slice(&current)?;
        edit(&mut value)?;
        let next = serde_json::to_vec(&value)?;
        if tree
            .compare_and_swap(id.as_bytes(), Some(&current), Some(next))?
            .is_ok()
        {
            return Ok(value);
        }
    }
}

fn remove(tree: &sled::Tree, kind: &'static str, id: &str) -> StoreResult<()> {
    match tree.remove(id.as_bytes())? {
        Some(_) => {
            tracing::info!(kind, id, "record removed");
            Ok(())
        }
        None => Err(StoreError::not_found(kind, id)),
    }
}
