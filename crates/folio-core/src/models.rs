//! Portfolio records and their validated write inputs.
//!
//! Records are what the store persists and the public API returns. Writes never merge
//! arbitrary JSON into a record: creates go through `*Input`, partial edits through
//! `*Update`, and both are validated before anything touches sled.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};

pub const DEFAULT_PROFICIENCY: u8 = 50;
const MAX_PROFICIENCY: u8 = 100;

// -----------------------------------------------------------------------------
// Enumerations
// -----------------------------------------------------------------------------

/// Skill category. Declaration order is the order categories appear in the chat context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    DevOps,
    Tools,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::DevOps,
        SkillCategory::Tools,
        SkillCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Database => "Database",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::Tools => "Tools",
            SkillCategory::Other => "Other",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Experience variant: `work` or `education` (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceKind {
    Work,
    Education,
}

impl ExperienceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceKind::Work => "work",
            ExperienceKind::Education => "education",
        }
    }
}

impl FromStr for ExperienceKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(ExperienceKind::Work),
            "education" => Ok(ExperienceKind::Education),
            other => Err(StoreError::Validation(format!(
                "unknown experience type '{}' (expected work or education)",
                other
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// Records
// -----------------------------------------------------------------------------

/// The portfolio owner. At most one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_bio: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Preferred biography text: long, then plain, then short.
    pub fn biography(&self) -> Option<&str> {
        self.long_bio
            .as_deref()
            .or(self.bio.as_deref())
            .or(self.short_bio.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    pub title: String,
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -----------------------------------------------------------------------------
// Write inputs
// -----------------------------------------------------------------------------

/// Full profile content for `PUT /api/profile` (create or replace).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: String,
    pub title: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub short_bio: Option<String>,
    #[serde(default)]
    pub long_bio: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl ProfileInput {
    /// Builds the stored profile. `existing` keeps id and creation time on replace.
    pub fn into_profile(self, existing: Option<&Profile>, now: DateTime<Utc>) -> StoreResult<Profile> {
        let (id, created_at) = match existing {
            Some(p) => (p.id.clone(), p.created_at),
            None => (new_id(), now),
        };
        Ok(Profile {
            id,
            name: required("name", self.name)?,
            title: required("title", self.title)?,
            email: required("email", self.email)?,
            bio: optional(self.bio),
            short_bio: optional(self.short_bio),
            long_bio: optional(self.long_bio),
            phone: optional(self.phone),
            location: optional(self.location),
            github: optional(self.github),
            linkedin: optional(self.linkedin),
            twitter: optional(self.twitter),
            website: optional(self.website),
            resume: optional(self.resume),
            profile_image: optional(self.profile_image),
            created_at,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub proficiency: Option<u8>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl SkillInput {
    pub fn into_skill(self, now: DateTime<Utc>) -> StoreResult<Skill> {
        Ok(Skill {
            id: new_id(),
            name: required("name", self.name)?,
            category: self.category,
            proficiency: proficiency(self.proficiency.unwrap_or(DEFAULT_PROFICIENCY))?,
            icon: optional(self.icon),
            order: self.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial skill edit. Absent fields are left alone; an empty `icon` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<SkillCategory>,
    #[serde(default)]
    pub proficiency: Option<u8>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl SkillUpdate {
    pub fn apply(self, skill: &mut Skill, now: DateTime<Utc>) -> StoreResult<()> {
        if let Some(name) = self.name {
            skill.name = required("name", name)?;
        }
        if let Some(category) = self.category {
            skill.category = category;
        }
        if let Some(p) = self.proficiency {
            skill.proficiency = proficiency(p)?;
        }
        if let Some(icon) = self.icon {
            skill.icon = optional(Some(icon));
        }
        if let Some(order) = self.order {
            skill.order = order;
        }
        skill.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: Option<i64>,
}

impl ProjectInput {
    pub fn into_project(self, now: DateTime<Utc>) -> StoreResult<Project> {
        Ok(Project {
            id: new_id(),
            title: required("title", self.title)?,
            description: required("description", self.description)?,
            long_description: optional(self.long_description),
            technologies: clean_list(self.technologies),
            image: optional(self.image),
            live_url: optional(self.live_url),
            github_url: optional(self.github_url),
            featured: self.featured,
            order: self.order.unwrap_or(0),
            view_count: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial project edit. Optional text fields are cleared by an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl ProjectUpdate {
    pub fn apply(self, project: &mut Project, now: DateTime<Utc>) -> StoreResult<()> {
        if let Some(title) = self.title {
            project.title = required("title", title)?;
        }
        if let Some(description) = self.description {
            project.description = required("description", description)?;
        }
        if let Some(v) = self.long_description {
            project.long_description = optional(Some(v));
        }
        if let Some(techs) = self.technologies {
            project.technologies = clean_list(techs);
        }
        if let Some(v) = self.image {
            project.image = optional(Some(v));
        }
        if let Some(v) = self.live_url {
            project.live_url = optional(Some(v));
        }
        if let Some(v) = self.github_url {
            project.github_url = optional(Some(v));
        }
        if let Some(featured) = self.featured {
            project.featured = featured;
        }
        if let Some(order) = self.order {
            project.order = order;
        }
        project.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(default, with = "flexible_date::option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl ExperienceInput {
    pub fn into_experience(self, now: DateTime<Utc>) -> StoreResult<Experience> {
        check_dates(self.start_date, self.end_date)?;
        Ok(Experience {
            id: new_id(),
            kind: self.kind,
            title: required("title", self.title)?,
            organization: required("organization", self.organization)?,
            location: optional(self.location),
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            description: optional(self.description),
            achievements: clean_list(self.achievements),
            order: self.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceUpdate {
    #[serde(default, rename = "type")]
    pub kind: Option<ExperienceKind>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub start_date: Option<NaiveDate>,
    /// Absent leaves the end date alone; `null` or `""` clears it.
    #[serde(default, with = "flexible_date::clearable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub current: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Option<Vec<String>>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl ExperienceUpdate {
    pub fn apply(self, exp: &mut Experience, now: DateTime<Utc>) -> StoreResult<()> {
        if let Some(kind) = self.kind {
            exp.kind = kind;
        }
        if let Some(title) = self.title {
            exp.title = required("title", title)?;
        }
        if let Some(org) = self.organization {
            exp.organization = required("organization", org)?;
        }
        if let Some(v) = self.location {
            exp.location = optional(Some(v));
        }
        if let Some(start) = self.start_date {
            exp.start_date = start;
        }
        if let Some(end) = self.end_date {
            exp.end_date = end;
        }
        if let Some(current) = self.current {
            exp.current = current;
            if current {
                exp.end_date = None;
            }
        }
        if let Some(v) = self.description {
            exp.description = optional(Some(v));
        }
        if let Some(items) = self.achievements {
            exp.achievements = clean_list(items);
        }
        if let Some(order) = self.order {
            exp.order = order;
        }
        check_dates(exp.start_date, exp.end_date)?;
        exp.updated_at = now;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn required(field: &str, value: String) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn proficiency(value: u8) -> StoreResult<u8> {
    if value > MAX_PROFICIENCY {
        return Err(StoreError::Validation(format!(
            "proficiency must be between 0 and {} (got {})",
            MAX_PROFICIENCY, value
        )));
    }
    Ok(value)
}

/// Trims entries and drops blanks; order is preserved.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_dates(start: NaiveDate, end: Option<NaiveDate>) -> StoreResult<()> {
    match end {
        Some(end) if end < start => Err(StoreError::Validation(format!(
            "endDate {} is before startDate {}",
            end, start
        ))),
        _ => Ok(()),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (as browsers send `Date` values).
mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let raw = raw.trim();
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(d);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .map_err(|_| format!("invalid date '{}'", raw))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(d)? {
                Some(raw) if !raw.trim().is_empty() => {
                    super::parse(&raw).map(Some).map_err(serde::de::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }

    /// For partial updates: only called when the field is present, so any blank maps to `Some(None)`.
    pub mod clearable {
        use chrono::NaiveDate;
        use serde::Deserializer;

        pub fn deserialize<'de, D>(d: D) -> Result<Option<Option<NaiveDate>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::option::deserialize(d).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn category_order_follows_declaration() {
        let mut cats = vec![SkillCategory::Other, SkillCategory::Backend, SkillCategory::Frontend];
        cats.sort();
        assert_eq!(
            cats,
            vec![SkillCategory::Frontend, SkillCategory::Backend, SkillCategory::Other]
        );
    }

    #[test]
    fn skill_input_rejects_out_of_range_proficiency() {
        let input = SkillInput {
            name: "Rust".into(),
            category: SkillCategory::Backend,
            proficiency: Some(101),
            icon: None,
            order: None,
        };
        assert!(matches!(input.into_skill(now()), Err(StoreError::Validation(_))));
    }

    #[test]
    fn skill_input_defaults_proficiency() {
        let input: SkillInput =
            serde_json::from_str(r#"{"name":"  Rust ","category":"Backend"}"#).unwrap();
        let skill = input.into_skill(now()).unwrap();
        assert_eq!(skill.name, "Rust");
        assert_eq!(skill.proficiency, DEFAULT_PROFICIENCY);
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let input = ProfileInput {
            name: "   ".into(),
            title: "Engineer".into(),
            email: "a@b.c".into(),
            ..Default::default()
        };
        let err = input.into_profile(None, now()).unwrap_err();
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn experience_accepts_browser_timestamps() {
        let input: ExperienceInput = serde_json::from_str(
            r#"{"type":"work","title":"Dev","organization":"Acme",
                "startDate":"2021-03-01T00:00:00.000Z","endDate":""}"#,
        )
        .unwrap();
        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(input.end_date, None);
    }

    #[test]
    fn experience_end_before_start_is_rejected() {
        let input: ExperienceInput = serde_json::from_str(
            r#"{"type":"education","title":"BSc","organization":"Uni",
                "startDate":"2020-09-01","endDate":"2019-06-01"}"#,
        )
        .unwrap();
        assert!(matches!(input.into_experience(now()), Err(StoreError::Validation(_))));
    }

    #[test]
    fn project_update_clears_optional_with_empty_string() {
        let mut project = ProjectInput {
            title: "Folio".into(),
            description: "Portfolio".into(),
            long_description: None,
            technologies: vec![" Rust ".into(), "".into(), "axum".into()],
            image: None,
            live_url: Some("https://example.com".into()),
            github_url: None,
            featured: false,
            order: None,
        }
        .into_project(now())
        .unwrap();
        assert_eq!(project.technologies, vec!["Rust", "axum"]);

        let update: ProjectUpdate =
            serde_json::from_str(r#"{"liveUrl":"","featured":true}"#).unwrap();
        update.apply(&mut project, now()).unwrap();
        assert_eq!(project.live_url, None);
        assert!(project.featured);
        assert_eq!(project.title, "Folio");
    }

    #[test]
    fn experience_kind_parses_case_insensitively() {
        assert_eq!("Work".parse::<ExperienceKind>().unwrap(), ExperienceKind::Work);
        assert!("hobby".parse::<ExperienceKind>().is_err());
    }

    #[test]
    fn profile_biography_prefers_long_bio() {
        let mut profile = ProfileInput {
            name: "Ada".into(),
            title: "Engineer".into(),
            email: "ada@example.com".into(),
            short_bio: Some("short".into()),
            bio: Some("plain".into()),
            ..Default::default()
        }
        .into_profile(None, now())
        .unwrap();
        assert_eq!(profile.biography(), Some("plain"));
        profile.long_bio = Some("long".into());
        assert_eq!(profile.biography(), Some("long"));
    }

    #[test]
    fn experience_update_clears_end_date() {
        let mut exp: Experience = serde_json::from_str::<ExperienceInput>(
            r#"{"type":"work","title":"Dev","organization":"Acme",
                "startDate":"2020-01-01","endDate":"2021-01-01"}"#,
        )
        .unwrap()
        .into_experience(now())
        .unwrap();

        let untouched: ExperienceUpdate = serde_json::from_str(r#"{"title":"Lead"}"#).unwrap();
        untouched.apply(&mut exp, now()).unwrap();
        assert_eq!(exp.end_date, NaiveDate::from_ymd_opt(2021, 1, 1));

        let cleared: ExperienceUpdate = serde_json::from_str(r#"{"endDate":""}"#).unwrap();
        cleared.apply(&mut exp, now()).unwrap();
        assert_eq!(exp.end_date, None);
        assert!(!exp.current);

        let moved: ExperienceUpdate = serde_json::from_str(r#"{"endDate":"2022-06-30"}"#).unwrap();
        moved.apply(&mut exp, now()).unwrap();
        assert_eq!(exp.end_date, NaiveDate::from_ymd_opt(2022, 6, 30));

        let nulled: ExperienceUpdate = serde_json::from_str(r#"{"endDate":null}"#).unwrap();
        nulled.apply(&mut exp, now()).unwrap();
        assert_eq!(exp.end_date, None);
    }

    #[test]
    fn records_use_underscore_id_on_the_wire() {
        let skill = SkillInput {
            name: "Rust".into(),
            category: SkillCategory::Backend,
            proficiency: None,
            icon: None,
            order: None,
        }
        .into_skill(now())
        .unwrap();
        let json = serde_json::to_value(&skill).unwrap();
        assert_eq!(json["_id"], skill.id.as_str());
        assert!(json.get("id").is_none());

        let mut legacy = json.clone();
        let id = legacy.as_object_mut().unwrap().remove("_id").unwrap();
        legacy["id"] = id;
        let back: Skill = serde_json::from_value(legacy).unwrap();
        assert_eq!(back.id, skill.id);
    }
}
