//! Statically typed snapshot of the application form

use crate::form::catalog::{self, SelectOption, RADIUS_MAX_KM, RADIUS_STEP_KM};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Current values of every form field. Serialized with the camelCase keys
/// the backend expects; keys missing from stored JSON take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSnapshot {
    pub job_title: String,
    pub location: String,
    #[serde(deserialize_with = "deserialize_radius")]
    pub radius: u32,
    pub discipline: String,
    pub job_sites: String,
    pub study_info: String,
    pub interests: String,
    /// Selected skill values, in selection order, without duplicates
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    JobTitle,
    Location,
    Radius,
    Discipline,
    JobSites,
    StudyInfo,
    Interests,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::JobTitle,
        FormField::Location,
        FormField::Radius,
        FormField::Discipline,
        FormField::JobSites,
        FormField::StudyInfo,
        FormField::Interests,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormField::JobTitle => "jobTitle",
            FormField::Location => "location",
            FormField::Radius => "radius",
            FormField::Discipline => "discipline",
            FormField::JobSites => "jobSites",
            FormField::StudyInfo => "studyInfo",
            FormField::Interests => "interests",
        }
    }

    pub fn options(&self) -> Option<&'static [SelectOption]> {
        match self {
            FormField::Location => Some(catalog::LOCATIONS),
            FormField::Discipline => Some(catalog::DISCIPLINES),
            FormField::JobSites => Some(catalog::JOB_SITES),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        FormField::ALL
            .into_iter()
            .find(|field| field.name().to_lowercase() == normalized)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// A rejected field edit. The previous value stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("'{value}' is not a valid option for {field}")]
    UnknownOption { field: FormField, value: String },

    #[error("Radius must be a multiple of 10 between 0 and 100 km, got '{0}'")]
    InvalidRadius(String),

    #[error("Choose a city before setting a radius")]
    RadiusWithoutLocation,
}

impl FormSnapshot {
    /// True when at least one text field has non-blank content or at least
    /// one skill is selected. The radius never counts on its own.
    pub fn is_populated(&self) -> bool {
        let text_fields = [
            &self.job_title,
            &self.location,
            &self.discipline,
            &self.job_sites,
            &self.study_info,
            &self.interests,
        ];

        text_fields.iter().any(|v| !v.trim().is_empty()) || !self.skills.is_empty()
    }

    /// Required fields that are still blank
    pub fn missing_required(&self) -> Vec<FormField> {
        [
            (FormField::JobTitle, &self.job_title),
            (FormField::Location, &self.location),
            (FormField::JobSites, &self.job_sites),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FieldError> {
        if let Some(options) = field.options() {
            if !value.is_empty() && catalog::find(options, value).is_none() {
                return Err(FieldError::UnknownOption {
                    field,
                    value: value.to_string(),
                });
            }
        }

        match field {
            FormField::JobTitle => self.job_title = value.to_string(),
            FormField::Location => {
                self.location = value.to_string();
                if value.is_empty() {
                    self.radius = 0;
                }
            }
            FormField::Radius => self.radius = self.parse_radius(value)?,
            FormField::Discipline => self.discipline = value.to_string(),
            FormField::JobSites => self.job_sites = value.to_string(),
            FormField::StudyInfo => self.study_info = value.to_string(),
            FormField::Interests => self.interests = value.to_string(),
        }
        Ok(())
    }

    /// Select the skill if unselected, deselect it otherwise.
    /// Returns whether the skill is selected afterwards.
    pub fn toggle_skill(&mut self, value: &str) -> bool {
        if let Some(position) = self.skills.iter().position(|s| s == value) {
            self.skills.remove(position);
            false
        } else {
            self.skills.push(value.to_string());
            true
        }
    }

    fn parse_radius(&self, value: &str) -> Result<u32, FieldError> {
        let radius: u32 = value
            .trim()
            .parse()
            .map_err(|_| FieldError::InvalidRadius(value.to_string()))?;

        if radius > RADIUS_MAX_KM || radius % RADIUS_STEP_KM != 0 {
            return Err(FieldError::InvalidRadius(value.to_string()));
        }
        if self.location.is_empty() {
            return Err(FieldError::RadiusWithoutLocation);
        }
        Ok(radius)
    }
}

/// Accepts the radius as a number or as a numeric string
fn deserialize_radius<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRadius {
        Number(u32),
        Text(String),
    }

    match RawRadius::deserialize(deserializer)? {
        RawRadius::Number(n) => Ok(n),
        RawRadius::Text(s) if s.trim().is_empty() => Ok(0),
        RawRadius::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
