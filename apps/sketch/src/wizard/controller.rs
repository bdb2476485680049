//! View Controller: the four-screen wizard as an explicit state machine.
//!
//! Landing → RoleSelect → SkillInput → Results, with Back on the two middle
//! screens and Restart from anywhere. Screens that need data carry it, so a
//! Results screen without a role, profile and result cannot be constructed.

use serde::Serialize;
use thiserror::Error;

use crate::models::{EvaluationResult, Role, SkillProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Landing,
    RoleSelect,
    SkillInput,
    Results,
}

/// What the user submitted and what the evaluation service returned for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub profile: SkillProfile,
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Landing,
    RoleSelect,
    SkillInput { role: Role },
    Results { role: Role, submission: Box<Submission> },
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Landing => ScreenKind::Landing,
            Screen::RoleSelect => ScreenKind::RoleSelect,
            Screen::SkillInput { .. } => ScreenKind::SkillInput,
            Screen::Results { .. } => ScreenKind::Results,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Start,
    ChooseRole(Role),
    Submitted(Submission),
    Back,
    Restart,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::ChooseRole(_) => "choose a role",
            Action::Submitted(_) => "show results",
            Action::Back => "go back",
            Action::Restart => "restart",
        }
    }
}

/// An action that is not in the transition table for the current screen.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} from the {from:?} screen")]
pub struct TransitionError {
    pub from: ScreenKind,
    pub action: &'static str,
}

#[derive(Debug, Clone)]
pub struct ViewController {
    screen: Screen,
    /// Role chosen before navigating back out of SkillInput. Cleared on restart.
    remembered_role: Option<Role>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            screen: Screen::Landing,
            remembered_role: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn selected_role(&self) -> Option<&Role> {
        match &self.screen {
            Screen::SkillInput { role } | Screen::Results { role, .. } => Some(role),
            Screen::Landing | Screen::RoleSelect => self.remembered_role.as_ref(),
        }
    }

    pub fn submission(&self) -> Option<&Submission> {
        match &self.screen {
            Screen::Results { submission, .. } => Some(&**submission),
            _ => None,
        }
    }

    /// Applies one action. On error the controller is left unchanged.
    pub fn apply(&mut self, action: Action) -> Result<ScreenKind, TransitionError> {
        let current = std::mem::replace(&mut self.screen, Screen::Landing);

        let next = match (current, action) {
            (_, Action::Restart) => {
                self.remembered_role = None;
                Screen::Landing
            }
            (Screen::Landing, Action::Start) => Screen::RoleSelect,
            (Screen::RoleSelect, Action::ChooseRole(role)) => Screen::SkillInput { role },
            (Screen::RoleSelect, Action::Back) => Screen::Landing,
            (Screen::SkillInput { role }, Action::Submitted(submission)) => Screen::Results {
                role,
                submission: Box::new(submission),
            },
            (Screen::SkillInput { role }, Action::Back) => {
                self.remembered_role = Some(role);
                Screen::RoleSelect
            }
            (current, action) => {
                let err = TransitionError {
                    from: current.kind(),
                    action: action.name(),
                };
                self.screen = current;
                return Err(err);
            }
        };

        self.screen = next;
        Ok(self.screen.kind())
    }

    pub fn start(&mut self) -> Result<ScreenKind, TransitionError> {
        self.apply(Action::Start)
    }

    pub fn choose_role(&mut self, role: Role) -> Result<ScreenKind, TransitionError> {
        self.apply(Action::ChooseRole(role))
    }

    /// Moves to Results with profile and result set together.
    pub fn complete_submission(
        &mut self,
        profile: SkillProfile,
        result: EvaluationResult,
    ) -> Result<ScreenKind, TransitionError> {
        self.apply(Action::Submitted(Submission { profile, result }))
    }

    pub fn back(&mut self) -> Result<ScreenKind, TransitionError> {
        self.apply(Action::Back)
    }

    /// Allowed from every screen.
    pub fn restart(&mut self) -> Result<ScreenKind, TransitionError> {
        self.apply(Action::Restart)
    }
}
