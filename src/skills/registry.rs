//! Skill registry backed by persistent storage
//!
//! The registry keeps every selectable skill in display order: built-ins
//! first, then custom skills in the order they were added. Only the custom
//! subset is ever persisted, always as the complete list.

use crate::error::JobFormError;
use crate::skills::builtin::{builtin_skills, is_builtin, BUILTIN_COUNT};
use crate::skills::slug::slugify;
use crate::skills::Skill;
use crate::storage::keys::CUSTOM_SKILLS_KEY;
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use thiserror::Error;

/// Why a new skill was not added. The caller keeps the user's input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillRejection {
    #[error("Please enter a skill name")]
    EmptyLabel,

    #[error("'{0}' does not contain any letters or digits usable as an identifier")]
    EmptySlug(String),

    #[error("Skill already exists: {label} ({value})")]
    Duplicate { value: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Skill),
    BuiltIn,
    NotFound,
}

pub struct SkillRegistry<S> {
    storage: S,
    all_skills: Vec<Skill>,
}

impl<S: KeyValueStore> SkillRegistry<S> {
    /// Load custom skills from storage and merge them after the built-ins.
    /// Storage problems only produce a warning and an empty custom set.
    pub fn initialize(storage: S) -> Self {
        let mut all_skills = builtin_skills();
        let mut seen: HashSet<String> = all_skills.iter().map(|s| s.value.clone()).collect();

        for skill in load_custom_skills_from_storage(&storage) {
            if seen.insert(skill.value.clone()) {
                all_skills.push(skill);
            } else {
                warn!("Ignoring stored custom skill with duplicate value: {}", skill.value);
            }
        }

        debug!(
            "Skill registry initialized with {} custom skills",
            all_skills.len() - BUILTIN_COUNT
        );

        Self {
            storage,
            all_skills,
        }
    }

    pub fn all_skills(&self) -> &[Skill] {
        &self.all_skills
    }

    pub fn builtin(&self) -> &[Skill] {
        &self.all_skills[..BUILTIN_COUNT]
    }

    pub fn get(&self, value: &str) -> Option<&Skill> {
        self.all_skills.iter().find(|s| s.value == value)
    }

    pub fn is_builtin(&self, value: &str) -> bool {
        is_builtin(value)
    }

    /// Custom skills only, recomputed from the full list
    pub fn list_custom(&self) -> Vec<Skill> {
        self.all_skills
            .iter()
            .filter(|s| !is_builtin(&s.value))
            .cloned()
            .collect()
    }

    /// Case-insensitive label filter. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Skill> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.all_skills.iter().collect();
        }

        self.all_skills
            .iter()
            .filter(|s| s.label.to_lowercase().contains(&query))
            .collect()
    }

    pub fn add_skill(&mut self, label: &str) -> std::result::Result<Skill, SkillRejection> {
        let label = label.trim();
        if label.is_empty() {
            return Err(SkillRejection::EmptyLabel);
        }

        let value = slugify(label);
        if value.is_empty() {
            return Err(SkillRejection::EmptySlug(label.to_string()));
        }

        if let Some(existing) = self
            .all_skills
            .iter()
            .find(|s| s.value == value || s.label == label)
        {
            return Err(SkillRejection::Duplicate {
                value: existing.value.clone(),
                label: existing.label.clone(),
            });
        }

        let skill = Skill::new(value, label);
        let mut updated = self.all_skills.clone();
        updated.push(skill.clone());
        self.update_skills(updated);

        info!("Added custom skill: {} ({})", skill.label, skill.value);
        Ok(skill)
    }

    pub fn remove_skill(&mut self, value: &str) -> RemoveOutcome {
        if is_builtin(value) {
            warn!("Built-in skills cannot be removed: {}", value);
            return RemoveOutcome::BuiltIn;
        }

        let Some(position) = self.all_skills.iter().position(|s| s.value == value) else {
            debug!("No custom skill to remove: {}", value);
            return RemoveOutcome::NotFound;
        };

        let mut updated = self.all_skills.clone();
        let removed = updated.remove(position);
        self.update_skills(updated);

        info!("Removed custom skill: {} ({})", removed.label, removed.value);
        RemoveOutcome::Removed(removed)
    }

    pub fn reset_to_base_skills(&mut self) {
        save_custom_skills_to_storage(&mut self.storage, &[]);
        self.all_skills = builtin_skills();
        info!("Custom skills cleared");
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Persist the custom subset of `updated`, then adopt it in memory
    fn update_skills(&mut self, updated: Vec<Skill>) {
        let custom: Vec<Skill> = updated
            .iter()
            .filter(|s| !is_builtin(&s.value))
            .cloned()
            .collect();
        save_custom_skills_to_storage(&mut self.storage, &custom);
        self.all_skills = updated;
    }
}

/// Read the persisted custom skills. Missing, unreadable or corrupt data
/// yields an empty list.
pub fn load_custom_skills_from_storage<S: KeyValueStore + ?Sized>(storage: &S) -> Vec<Skill> {
    match storage.get(CUSTOM_SKILLS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<Skill>>(&raw) {
            Ok(skills) => skills,
            Err(e) => {
                warn!("Failed to parse custom skills: {}", e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to load custom skills: {}", e);
            Vec::new()
        }
    }
}

/// Overwrite the persisted custom skills. Failures are logged, not returned.
pub fn save_custom_skills_to_storage<S: KeyValueStore + ?Sized>(storage: &mut S, skills: &[Skill]) {
    let result = serde_json::to_string(skills)
        .map_err(JobFormError::from)
        .and_then(|json| storage.set(CUSTOM_SKILLS_KEY, &json));

    if let Err(e) = result {
        error!("Failed to save custom skills: {}", e);
    }
}
