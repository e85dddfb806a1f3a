//! Context Assembler: renders the portfolio into the chat system prompt.
//!
//! Section order is fixed: preamble, PERSONAL INFORMATION, SKILLS, PROJECTS,
//! WORK EXPERIENCE, EDUCATION, closing instruction. A section whose data is empty is
//! omitted entirely, header included. Rendering sorts its own input, so the output
//! depends only on the records and never on the order a store returned them in.

use std::fmt::Write;

use crate::models::{Experience, ExperienceKind, Profile, Project, Skill, SkillCategory};
use crate::store::{PortfolioSnapshot, PortfolioSource};

pub const PREAMBLE: &str = "You are an AI assistant named Eve for a portfolio website. \
You were made by the website owner, and your design is based on the character Eve from WALL-E. \
Answer questions about the portfolio owner based on the following information:\n\n";

pub const CLOSING_INSTRUCTION: &str = "\nPlease provide helpful, friendly, and professional responses about this person. \
If asked about something not in the information above, politely say you don't have that information \
but encourage them to reach out directly via the contact information provided.";

/// Used when the store cannot be read.
pub const FALLBACK_CONTEXT: &str =
    "You are an AI assistant named Eve for a portfolio website. Please answer questions professionally.";

/// Read the store and render the context. Never fails: read errors yield [`FALLBACK_CONTEXT`].
pub async fn assemble_context(source: &dyn PortfolioSource) -> String {
    match source.snapshot().await {
        Ok(snapshot) => render_context(&snapshot),
        Err(e) => {
            tracing::warn!(error = %e, "portfolio read failed; using fallback chat context");
            FALLBACK_CONTEXT.to_string()
        }
    }
}

/// Pure rendering of a snapshot. Same snapshot, same bytes.
pub fn render_context(snapshot: &PortfolioSnapshot) -> String {
    let mut out = String::from(PREAMBLE);

    if let Some(profile) = &snapshot.profile {
        write_profile(&mut out, profile);
    }
    write_skills(&mut out, &snapshot.skills);
    write_projects(&mut out, &snapshot.projects);
    write_experience(&mut out, "WORK EXPERIENCE", ExperienceKind::Work, &snapshot.experiences);
    write_experience(&mut out, "EDUCATION", ExperienceKind::Education, &snapshot.experiences);

    out.push_str(CLOSING_INSTRUCTION);
    out
}

fn write_profile(out: &mut String, profile: &Profile) {
    out.push_str("PERSONAL INFORMATION:\n");
    let _ = writeln!(out, "Name: {}", profile.name);
    let _ = writeln!(out, "Title: {}", profile.title);
    let optional = [
        ("Bio", profile.biography()),
        ("Email", Some(profile.email.as_str())),
        ("Phone", profile.phone.as_deref()),
        ("Location", profile.location.as_deref()),
        ("GitHub", profile.github.as_deref()),
        ("LinkedIn", profile.linkedin.as_deref()),
        ("Twitter", profile.twitter.as_deref()),
        ("Website", profile.website.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            let _ = writeln!(out, "{}: {}", label, v);
        }
    }
    out.push('\n');
}

fn write_skills(out: &mut String, skills: &[Skill]) {
    if skills.is_empty() {
        return;
    }
    out.push_str("SKILLS:\n");
    for category in SkillCategory::ALL {
        let mut in_category: Vec<&Skill> = skills.iter().filter(|s| s.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        in_category.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.name.cmp(&b.name))
        });
        let names: Vec<&str> = in_category.iter().map(|s| s.name.as_str()).collect();
        let _ = writeln!(out, "{}: {}", category, names.join(", "));
    }
    out.push('\n');
}

fn write_projects(out: &mut String, projects: &[Project]) {
    if projects.is_empty() {
        return;
    }
    let mut ordered: Vec<&Project> = projects.iter().collect();
    ordered.sort_by(|a, b| {
        b.featured
            .cmp(&a.featured)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });

    out.push_str("PROJECTS:\n");
    for (i, project) in ordered.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, project.title);
        let _ = writeln!(out, "   Description: {}", project.description);
        if !project.technologies.is_empty() {
            let _ = writeln!(out, "   Technologies: {}", project.technologies.join(", "));
        }
        if let Some(url) = &project.live_url {
            let _ = writeln!(out, "   Live URL: {}", url);
        }
        if let Some(url) = &project.github_url {
            let _ = writeln!(out, "   GitHub: {}", url);
        }
        out.push('\n');
    }
}

fn write_experience(out: &mut String, header: &str, kind: ExperienceKind, entries: &[Experience]) {
    let mut matching: Vec<&Experience> = entries.iter().filter(|e| e.kind == kind).collect();
    if matching.is_empty() {
        return;
    }
    matching.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then(a.order.cmp(&b.order))
            .then(a.id.cmp(&b.id))
    });

    let _ = writeln!(out, "{}:", header);
    for (i, entry) in matching.iter().enumerate() {
        let _ = writeln!(out, "{}. {} at {}", i + 1, entry.title, entry.organization);
        if let Some(desc) = &entry.description {
            let _ = writeln!(out, "   {}", desc);
        }
        out.push('\n');
    }
}
