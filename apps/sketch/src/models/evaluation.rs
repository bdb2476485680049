use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Self-rated proficiency per skill, 0.0 – 1.0.
pub type SkillProfile = IndexMap<String, f64>;

/// Per-skill requirement entries keyed by skill name.
pub type RoleRequirements = IndexMap<String, RoleRequirement>;

/// Per-skill shortfall `max(0, required - current)`, computed upstream.
pub type Gaps = IndexMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    /// Relative importance within the role. Not guaranteed to sum to 1.
    #[serde(default, deserialize_with = "default_if_null")]
    pub weight: f64,
    /// Proficiency considered "proficient".
    #[serde(default, deserialize_with = "default_if_null")]
    pub required: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    /// Missing or unrecognised upstream value.
    #[default]
    #[serde(other)]
    Unspecified,
}

/// A learning item selected by the upstream recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub icon_type: Option<String>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "default_if_null")]
    pub can_skim: bool,
    #[serde(default, deserialize_with = "default_if_null")]
    pub covered_skills: Vec<String>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub is_split: bool,
    #[serde(default)]
    pub part: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Week label → resource ids as received. Display order is decided by the presenter.
    #[serde(default)]
    pub weeks: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub selected_resources: Vec<Resource>,
    #[serde(default)]
    pub adjustment_note: Option<String>,
}

/// Response body of `POST /evaluate`.
///
/// Only `plan`, `role_requirements_full` and `gaps` are read. Anything else the
/// service returns (alignment score, top gaps, ...) is kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub role_requirements_full: RoleRequirements,
    #[serde(default)]
    pub gaps: Gaps,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treats an explicit `null` like a missing field.
fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
