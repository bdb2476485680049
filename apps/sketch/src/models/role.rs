use serde::{Deserialize, Serialize};

/// A target job profile with an ordered skill list.
/// Served by the evaluation service at `GET /roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Catalog shown when the roles endpoint cannot be reached.
pub fn fallback_roles() -> Vec<Role> {
    vec![
        role(
            "SDE",
            "SDE",
            "Core CS & Systems",
            "code",
            &["DSA", "OS", "DBMS", "CN", "C++", "Git", "Linux", "SQL"],
        ),
        role(
            "DataAnalyst",
            "Data Scientist",
            "Stats & Analytics",
            "chart",
            &["Statistics", "SQL", "Python", "Pandas", "NumPy", "DSA", "Git"],
        ),
    ]
}

/// Looks up a role by id, case-sensitive.
pub fn find_role<'a>(catalog: &'a [Role], role_id: &str) -> Option<&'a Role> {
    catalog.iter().find(|r| r.id == role_id)
}

fn role(id: &str, label: &str, description: &str, icon: &str, skills: &[&str]) -> Role {
    Role {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        icon: Some(icon.to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}
