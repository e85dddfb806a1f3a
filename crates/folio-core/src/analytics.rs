//! Visitor analytics: page-view and project-view events in the `analytics` tree.
//!
//! Keys are `{unix_millis:020}_{uuid}` so a tree scan is chronological.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::StoreResult;
use crate::models::{new_id, Project};
use crate::store::{put_json, scan_json, PortfolioStore, ANALYTICS_TREE};

const OVERVIEW_WINDOW_DAYS: i64 = 7;
const TIMELINE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    ProjectView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn page_view(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            kind: EventKind::PageView,
            project_id: None,
            ip_address,
            user_agent,
            timestamp: Utc::now(),
        }
    }

    pub fn project_view(
        project_id: impl Into<String>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            kind: EventKind::ProjectView,
            project_id: Some(project_id.into()),
            ip_address,
            user_agent,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_page_views: u64,
    pub total_project_views: u64,
    pub recent_page_views: u64,
    pub recent_project_views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectViewStat {
    pub project_id: String,
    pub project_title: String,
    pub view_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    /// UTC day, `YYYY-MM-DD`.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub count: u64,
}

impl PortfolioStore {
    pub fn record_event(&self, event: &AnalyticsEvent) -> StoreResult<()> {
        let key = format!(
            "{:020}_{}",
            event.timestamp.timestamp_millis().max(0),
            new_id()
        );
        put_json(&self.tree(ANALYTICS_TREE)?, key.as_bytes(), event)
    }

    pub fn events(&self) -> StoreResult<Vec<AnalyticsEvent>> {
        scan_json(&self.tree(ANALYTICS_TREE)?)
    }

    /// Totals plus counts over the last seven days.
    pub fn overview(&self, now: DateTime<Utc>) -> StoreResult<AnalyticsOverview> {
        let since = now - Duration::days(OVERVIEW_WINDOW_DAYS);
        let mut out = AnalyticsOverview::default();
        for event in self.events()? {
            let recent = event.timestamp >= since;
            match event.kind {
                EventKind::PageView => {
                    out.total_page_views += 1;
                    out.recent_page_views += u64::from(recent);
                }
                EventKind::ProjectView => {
                    out.total_project_views += 1;
                    out.recent_project_views += u64::from(recent);
                }
            }
        }
        Ok(out)
    }

    /// Project views grouped by project, most viewed first.
    pub fn project_stats(&self, projects: &[Project]) -> StoreResult<Vec<ProjectViewStat>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for event in self.events()? {
            if event.kind != EventKind::ProjectView {
                continue;
            }
            if let Some(id) = event.project_id {
                *counts.entry(id).or_default() += 1;
            }
        }

        let mut stats: Vec<ProjectViewStat> = counts
            .into_iter()
            .map(|(project_id, view_count)| {
                let project_title = projects
                    .iter()
                    .find(|p| p.id == project_id)
                    .map(|p| p.title.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                ProjectViewStat {
                    project_id,
                    project_title,
                    view_count,
                }
            })
            .collect();
        stats.sort_by(|a, b| {
            b.view_count
                .cmp(&a.view_count)
                .then(a.project_id.cmp(&b.project_id))
        });
        Ok(stats)
    }

    /// Daily counts per event kind over the last thirty days, oldest first.
    pub fn timeline(&self, now: DateTime<Utc>) -> StoreResult<Vec<TimelinePoint>> {
        let since = now - Duration::days(TIMELINE_WINDOW_DAYS);
        let mut buckets: BTreeMap<(String, EventKind), u64> = BTreeMap::new();
        for event in self.events()? {
            if event.timestamp < since {
                continue;
            }
            let day = event.timestamp.format("%Y-%m-%d").to_string();
            *buckets.entry((day, event.kind)).or_default() += 1;
        }
        Ok(buckets
            .into_iter()
            .map(|((date, kind), count)| TimelinePoint { date, kind, count })
            .collect())
    }
}
