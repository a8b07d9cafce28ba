//! Selectable skills: a fixed built-in set plus user-added custom skills

pub mod builtin;
pub mod registry;
pub mod slug;

pub use registry::{
    load_custom_skills_from_storage, save_custom_skills_to_storage, RemoveOutcome, SkillRegistry,
    SkillRejection,
};
pub use slug::slugify;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Unique key across built-in and custom skills
    pub value: String,
    pub label: String,
}

impl Skill {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
