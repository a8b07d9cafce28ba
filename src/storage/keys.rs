//! Fixed storage keys. Draft Store and Skill Registry use disjoint sets.

pub const DRAFT_KEY: &str = "jobApplicationDraft";
pub const DRAFT_TIMESTAMP_KEY: &str = "jobApplicationDraftTimestamp";
pub const CUSTOM_SKILLS_KEY: &str = "customSkills";
