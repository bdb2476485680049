//! Result Presenter. Turns an evaluation result into what the results screen shows.
//!
//! `present` is a pure function of (result, submitted profile, selected role):
//! no I/O, no shared state, safe to recompute on every render. Gaps are shown as
//! the service computed them and never recomputed here. Missing or dangling data
//! is skipped or defaulted to 0; nothing in this module returns an error.

pub mod explanation;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{EvaluationResult, Priority, Resource, Role, SkillProfile};

pub use explanation::percent;

// ────────────────────────────────────────────────────────────────────────────
// Presentation model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub skill: String,
    /// 0 – 100
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillImportance {
    pub skill: String,
    pub weight_percent: i64,
    pub required_percent: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBadge {
    High,
    Medium,
    Low,
    CanSkim,
}

impl PriorityBadge {
    fn for_resource(resource: &Resource) -> Self {
        match resource.priority {
            Priority::High => Self::High,
            Priority::Medium | Priority::Unspecified => Self::Medium,
            Priority::Low if resource.can_skim => Self::CanSkim,
            Priority::Low => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Priority",
            Self::Medium => "Medium Priority",
            Self::Low => "Low Priority",
            Self::CanSkim => "Can Skim",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceIcon {
    University,
    Code,
    Youtube,
    Book,
    File,
}

impl ResourceIcon {
    /// `icon_type`, then `type`, then "docs".
    fn for_resource(resource: &Resource) -> Self {
        let kind = [&resource.icon_type, &resource.resource_type]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("docs");

        match kind {
            "university" => Self::University,
            "code" => Self::Code,
            "youtube" => Self::Youtube,
            "docs" | "theory" => Self::Book,
            _ => Self::File,
        }
    }
}

/// One row of the learning plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceCard {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub icon: ResourceIcon,
    pub badge: PriorityBadge,
    pub badge_label: &'static str,
    pub covered_skills: Vec<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGroup {
    pub week: String,
    /// Empty when none of the week's ids resolved ("no tasks this week").
    pub resources: Vec<ResourceCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationModel {
    pub role_label: String,
    pub radar: Vec<RadarPoint>,
    pub importance: Vec<SkillImportance>,
    pub weeks: Vec<WeekGroup>,
    pub adjustment_note: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Derivation
// ────────────────────────────────────────────────────────────────────────────

pub fn present(result: &EvaluationResult, profile: &SkillProfile, role: &Role) -> PresentationModel {
    PresentationModel {
        role_label: role.label.clone(),
        radar: radar_points(profile, role),
        importance: importance_ranking(result, role),
        weeks: week_groups(result, profile),
        adjustment_note: result.plan.adjustment_note.clone(),
    }
}

/// One point per role skill, in role order. Unrated skills sit at 0.
pub fn radar_points(profile: &SkillProfile, role: &Role) -> Vec<RadarPoint> {
    role.skills
        .iter()
        .map(|skill| RadarPoint {
            skill: skill.clone(),
            value: profile.get(skill).copied().unwrap_or(0.0) * 100.0,
        })
        .collect()
}

/// Role skills with a positive weight, heaviest first. Ties keep role order.
pub fn importance_ranking(result: &EvaluationResult, role: &Role) -> Vec<SkillImportance> {
    let mut weighted: Vec<(&String, f64, f64)> = role
        .skills
        .iter()
        .filter_map(|skill| {
            let req = result.role_requirements_full.get(skill)?;
            (req.weight > 0.0).then_some((skill, req.weight, req.required))
        })
        .collect();

    // sort_by is stable
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

    weighted
        .into_iter()
        .map(|(skill, weight, required)| SkillImportance {
            skill: skill.clone(),
            weight_percent: percent(weight),
            required_percent: percent(required),
        })
        .collect()
}

/// Resolves each week's resource ids, dropping unknown ids. Weeks come out in
/// `week_order`.
pub fn week_groups(result: &EvaluationResult, profile: &SkillProfile) -> Vec<WeekGroup> {
    let lookup: HashMap<&str, &Resource> = result
        .plan
        .selected_resources
        .iter()
        .map(|r| (r.id.as_str(), r))
        .collect();

    week_order(&result.plan.weeks)
        .into_iter()
        .map(|(week, ids)| WeekGroup {
            week: week.clone(),
            resources: ids
                .iter()
                .filter_map(|id| lookup.get(id.as_str()))
                .map(|resource| resource_card(resource, result, profile))
                .collect(),
        })
        .collect()
}

/// Canonical integer labels ("1", "2", ..., "12") first in ascending numeric
/// order, then every other label in the order received.
fn week_order(weeks: &IndexMap<String, Vec<String>>) -> Vec<(&String, &Vec<String>)> {
    let mut ordered: Vec<_> = weeks.iter().collect();
    ordered.sort_by_key(|(week, _)| match week_index(week) {
        Some(n) => (false, n),
        None => (true, 0),
    });
    ordered
}

fn week_index(label: &str) -> Option<u32> {
    label
        .parse::<u32>()
        .ok()
        .filter(|n| n.to_string() == label)
}

fn resource_card(resource: &Resource, result: &EvaluationResult, profile: &SkillProfile) -> ResourceCard {
    let title = match resource.part.as_deref() {
        Some(part) if resource.is_split && !part.is_empty() => {
            format!("{} ({part})", resource.title)
        }
        _ => resource.title.clone(),
    };
    let badge = PriorityBadge::for_resource(resource);

    ResourceCard {
        id: resource.id.clone(),
        title,
        url: resource.url.clone().filter(|u| !u.is_empty()),
        icon: ResourceIcon::for_resource(resource),
        badge,
        badge_label: badge.label(),
        covered_skills: resource.covered_skills.clone(),
        explanation: explanation::explain_resource(
            resource,
            &result.role_requirements_full,
            &result.gaps,
            profile,
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
