//! One user's wizard: view controller plus the screen-local state around it
//! (slider positions, error banner, pending submission, completion marks).

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation_client::EvaluationError;
use crate::models::role::{fallback_roles, find_role};
use crate::models::{EvaluationResult, Role, SkillProfile};
use crate::presenter::{present, PresentationModel};
use crate::wizard::completion::{CompletionKey, CompletionSet};
use crate::wizard::controller::{Screen, ScreenKind, TransitionError, ViewController};

const SLIDER_MAX: u8 = 100;

// ────────────────────────────────────────────────────────────────────────────
// View model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderView {
    pub skill: String,
    /// 0 – 100
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub presentation: PresentationModel,
    pub completed: Vec<CompletionKey>,
}

/// Everything the browser needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub screen: ScreenKind,
    pub selected_role: Option<Role>,
    pub banner: Option<String>,
    pub submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SliderView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// Handed out when a submission starts; only the matching ticket may finish it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    id: u64,
    pub role_id: String,
    pub profile: SkillProfile,
}

#[derive(Debug)]
pub struct WizardSession {
    controller: ViewController,
    sliders: IndexMap<String, u8>,
    banner: Option<String>,
    pending: Option<u64>,
    next_ticket: u64,
    completed: CompletionSet,
    catalog: Vec<Role>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            controller: ViewController::new(),
            sliders: IndexMap::new(),
            banner: None,
            pending: None,
            next_ticket: 0,
            completed: CompletionSet::default(),
            catalog: fallback_roles(),
        }
    }

    #[cfg(test)]
    pub fn screen(&self) -> ScreenKind {
        self.controller.kind()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn catalog(&self) -> &[Role] {
        &self.catalog
    }

    /// Replaces the role catalog. `notice` becomes the banner (or clears it).
    pub fn set_catalog(&mut self, roles: Vec<Role>, notice: Option<String>) {
        self.catalog = roles;
        self.banner = notice;
    }

    pub fn start(&mut self) -> Result<(), AppError> {
        self.controller.start()?;
        self.banner = None;
        Ok(())
    }

    pub fn choose_role(&mut self, role_id: &str) -> Result<(), AppError> {
        let role = find_role(&self.catalog, role_id)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {role_id}")))?;

        let sliders = role.skills.iter().map(|s| (s.clone(), 0)).collect();
        self.controller.choose_role(role)?;
        self.sliders = sliders;
        self.banner = None;
        Ok(())
    }

    /// Moves a slider. Values above 100 are clamped.
    pub fn set_skill(&mut self, skill: &str, value: u32) -> Result<u8, AppError> {
        if self.controller.kind() != ScreenKind::SkillInput {
            return Err(TransitionError {
                from: self.controller.kind(),
                action: "rate a skill",
            }
            .into());
        }
        let slot = self
            .sliders
            .get_mut(skill)
            .ok_or_else(|| AppError::Validation(format!("Skill '{skill}' is not part of this role")))?;

        *slot = value.min(u32::from(SLIDER_MAX)) as u8;
        Ok(*slot)
    }

    /// Current slider positions as proficiencies, for every skill of the role.
    pub fn profile(&self) -> SkillProfile {
        self.sliders
            .iter()
            .map(|(skill, value)| (skill.clone(), f64::from(*value) / 100.0))
            .collect()
    }

    /// Marks the session as submitting and snapshots what to send.
    /// A second call before `finish_submission` is rejected.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, AppError> {
        let role_id = match self.controller.screen() {
            Screen::SkillInput { role } => role.id.clone(),
            other => {
                return Err(TransitionError {
                    from: other.kind(),
                    action: "submit skills",
                }
                .into())
            }
        };
        if self.pending.is_some() {
            return Err(AppError::SubmissionInProgress);
        }

        self.next_ticket += 1;
        self.pending = Some(self.next_ticket);
        self.banner = None;

        Ok(SubmissionTicket {
            id: self.next_ticket,
            role_id,
            profile: self.profile(),
        })
    }

    /// Applies the outcome of a submission. Outcomes for a ticket that is no
    /// longer pending (the user went back or restarted meanwhile) are dropped.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<EvaluationResult, EvaluationError>,
    ) -> Result<(), AppError> {
        if self.pending != Some(ticket.id) {
            warn!("Discarding evaluation outcome for a submission that is no longer pending");
            return Ok(());
        }
        self.pending = None;

        match outcome {
            Ok(result) => {
                self.controller.complete_submission(ticket.profile, result)?;
                self.completed.clear();
            }
            Err(e) => {
                warn!("Evaluation failed: {e}");
                self.banner = Some(e.display_message());
            }
        }
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), AppError> {
        self.controller.back()?;
        self.pending = None;
        self.banner = None;
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), AppError> {
        self.controller.restart()?;
        self.sliders.clear();
        self.banner = None;
        self.pending = None;
        self.completed.clear();
        Ok(())
    }

    pub fn toggle_completed(&mut self, key: CompletionKey) -> Result<bool, AppError> {
        let submission = self.controller.submission().ok_or(TransitionError {
            from: self.controller.kind(),
            action: "mark a resource complete",
        })?;
        let in_plan = submission
            .result
            .plan
            .weeks
            .get(&key.week)
            .is_some_and(|ids| ids.contains(&key.resource_id));
        if !in_plan {
            return Err(AppError::Validation(format!(
                "Resource '{}' is not scheduled in week {}",
                key.resource_id, key.week
            )));
        }
        Ok(self.completed.toggle(key))
    }

    pub fn view(&self, session_id: Uuid) -> SessionView {
        let skills = (self.controller.kind() == ScreenKind::SkillInput).then(|| {
            self.sliders
                .iter()
                .map(|(skill, value)| SliderView {
                    skill: skill.clone(),
                    value: *value,
                })
                .collect()
        });

        let results = match self.controller.screen() {
            Screen::Results { role, submission } => Some(ResultsView {
                presentation: present(&submission.result, &submission.profile, role),
                completed: self.completed.keys().cloned().collect(),
            }),
            _ => None,
        };

        SessionView {
            session_id,
            screen: self.controller.kind(),
            selected_role: self.controller.selected_role().cloned(),
            banner: self.banner.clone(),
            submitting: self.is_submitting(),
            skills,
            results,
        }
    }
}
