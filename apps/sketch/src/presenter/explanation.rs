//! Priority / skim explanations shown under each resource card.
//!
//! Each category is an ordered table of `(predicate, phrase)` rules evaluated
//! per covered skill; the first rule that applies wins for that skill.
//! Priority and skim are evaluated independently and joined with `". "`.

use crate::models::evaluation::{Gaps, RoleRequirements};
use crate::models::{Priority, Resource, SkillProfile};

const HIGH_WEIGHT: f64 = 0.15;
const MEDIUM_WEIGHT: f64 = 0.10;
const SIGNIFICANT_GAP: f64 = 0.20;
const SMALL_GAP: f64 = 0.05;

/// Everything the rules need to know about one covered skill.
#[derive(Debug, Clone, Copy)]
struct SkillFacts<'a> {
    skill: &'a str,
    weight: f64,
    required: f64,
    current: f64,
    gap: f64,
}

struct Rule {
    applies: fn(&SkillFacts) -> bool,
    phrase: fn(&SkillFacts) -> String,
}

const MEDIUM_RULES: &[Rule] = &[
    Rule {
        applies: |f| f.weight >= HIGH_WEIGHT && f.gap > SMALL_GAP && f.gap <= SIGNIFICANT_GAP,
        phrase: |f| {
            format!(
                "high-weight skill ({}, {}%) with small gap",
                f.skill,
                percent(f.weight)
            )
        },
    },
    Rule {
        applies: |f| f.weight >= MEDIUM_WEIGHT && f.weight < HIGH_WEIGHT && f.gap > MEDIUM_WEIGHT,
        phrase: |f| format!("medium-weight skill ({}, {}%)", f.skill, percent(f.weight)),
    },
    Rule {
        applies: |f| f.gap > SIGNIFICANT_GAP,
        phrase: |f| format!("significant gap in {}", f.skill),
    },
];

const SKIM_RULES: &[Rule] = &[
    Rule {
        applies: |f| f.weight >= HIGH_WEIGHT && f.current >= f.required,
        phrase: |f| {
            format!(
                "already proficient in high-weight skill {} ({}% role weight)",
                f.skill,
                percent(f.weight)
            )
        },
    },
    Rule {
        applies: |f| f.weight >= HIGH_WEIGHT && f.gap <= SMALL_GAP,
        phrase: |f| {
            format!(
                "nearly proficient in high-weight skill {} ({}% role weight, {}% gap)",
                f.skill,
                percent(f.weight),
                percent(f.gap)
            )
        },
    },
    Rule {
        applies: |f| f.weight < MEDIUM_WEIGHT,
        phrase: |f| format!("low-weight skill ({}, {}% role weight)", f.skill, percent(f.weight)),
    },
    Rule {
        applies: |f| f.current >= f.required,
        phrase: |f| format!("already proficient in {}", f.skill),
    },
];

/// Rounds a 0–1 fraction to a whole display percent.
pub fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// Builds the explanation for one resource, or `None` when no rule fires.
///
/// Covered skills without a requirement entry are ignored. Missing gap or
/// profile values count as 0.
pub fn explain_resource(
    resource: &Resource,
    requirements: &RoleRequirements,
    gaps: &Gaps,
    profile: &SkillProfile,
) -> Option<String> {
    let facts: Vec<SkillFacts> = resource
        .covered_skills
        .iter()
        .filter_map(|skill| {
            let requirement = requirements.get(skill)?;
            Some(SkillFacts {
                skill,
                weight: requirement.weight,
                required: requirement.required,
                current: profile.get(skill).copied().unwrap_or(0.0),
                gap: gaps.get(skill).copied().unwrap_or(0.0),
            })
        })
        .collect();

    let mut parts = Vec::new();

    match resource.priority {
        Priority::High => parts.extend(high_priority_reason(&facts)),
        Priority::Medium => {
            parts.extend(category_reason("Medium priority", MEDIUM_RULES, &facts))
        }
        Priority::Low | Priority::Unspecified => {}
    }

    if resource.can_skim {
        parts.extend(category_reason("Can skim", SKIM_RULES, &facts));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(". "))
    }
}

fn high_priority_reason(facts: &[SkillFacts]) -> Option<String> {
    let critical: Vec<&SkillFacts> = facts
        .iter()
        .filter(|f| f.weight >= HIGH_WEIGHT && f.gap > SIGNIFICANT_GAP)
        .collect();

    let max_weight = critical.iter().map(|f| percent(f.weight)).max()?;
    let max_gap = critical.iter().map(|f| percent(f.gap)).max()?;
    let names: Vec<&str> = critical.iter().map(|f| f.skill).collect();

    Some(format!(
        "High priority: Covers critical skills ({}) with {max_weight}% role weight and {max_gap}% skill gap",
        names.join(", ")
    ))
}

fn category_reason(prefix: &str, rules: &[Rule], facts: &[SkillFacts]) -> Option<String> {
    let reasons: Vec<String> = facts
        .iter()
        .filter_map(|f| {
            rules
                .iter()
                .find(|rule| (rule.applies)(f))
                .map(|rule| (rule.phrase)(f))
        })
        .collect();

    if reasons.is_empty() {
        None
    } else {
        Some(format!("{prefix}: {}", reasons.join(", ")))
    }
}
