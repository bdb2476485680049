pub mod evaluation;
pub mod role;

pub use evaluation::{EvaluationResult, Priority, Resource, SkillProfile};
pub use role::Role;
