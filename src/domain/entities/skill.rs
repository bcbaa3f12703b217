use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::validation::validate_trimmed,
    entities::option_fields::{OptionField, PatchString},
};

const MAX_NAME_LENGTH: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Language,
    Framework,
    Tool,
    Database,
    Other,
}

impl Default for SkillCategory {
    fn default() -> Self {
        SkillCategory::Other
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: i16,
    pub years_experience: Option<i16>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewSkillRequest {
    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub name: String,

    #[serde(default)]
    pub category: SkillCategory,

    #[validate(custom(function = validate_proficiency))]
    pub proficiency: i16,

    #[serde(default, deserialize_with = "blank_as_none_i16")]
    #[validate(custom(function = validate_years))]
    pub years_experience: Option<i16>,

    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateSkillRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: PatchString,

    pub category: OptionField<SkillCategory>,

    #[validate(custom(function = validate_proficiency_field))]
    pub proficiency: OptionField<i16>,

    pub years_experience: OptionField<i16>,
    pub display_order: OptionField<i32>,
}

fn validate_proficiency(value: i16) -> Result<(), ValidationError> {
    if (1..=100).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("proficiency_out_of_range");
        err.message = Some("Proficiency must be between 1 and 100".into());
        Err(err)
    }
}

fn validate_proficiency_field(value: &OptionField<i16>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(p) = value {
        validate_proficiency(*p)?;
    }
    Ok(())
}

fn validate_years(value: i16) -> Result<(), ValidationError> {
    if (0..=60).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("years_out_of_range"))
    }
}

/// HTML number inputs submit "" when cleared. Treat that as absent
/// instead of failing integer parsing.
fn blank_as_none_i16<'de, D>(deserializer: D) -> Result<Option<i16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i16),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<i16>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_years_deserializes_as_none() {
        let request: NewSkillRequest = serde_json::from_str(
            r#"{"name": "Rust", "category": "language", "proficiency": 90, "years_experience": ""}"#,
        )
        .unwrap();
        assert_eq!(request.years_experience, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn numeric_string_years_still_parses() {
        let request: NewSkillRequest = serde_json::from_str(
            r#"{"name": "Rust", "category": "language", "proficiency": 90, "years_experience": "4"}"#,
        )
        .unwrap();
        assert_eq!(request.years_experience, Some(4));
    }

    #[test]
    fn proficiency_out_of_range_is_rejected() {
        let request: NewSkillRequest = serde_json::from_str(
            r#"{"name": "Rust", "category": "language", "proficiency": 120}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn years_out_of_range_is_rejected() {
        let request: NewSkillRequest = serde_json::from_str(
            r#"{"name": "Rust", "category": "language", "proficiency": 90, "years_experience": 75}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn patched_proficiency_is_range_checked() {
        let patch: UpdateSkillRequest =
            serde_json::from_str(r#"{"proficiency": 0}"#).unwrap();
        assert!(patch.validate().is_err());

        let patch: UpdateSkillRequest =
            serde_json::from_str(r#"{"proficiency": 55}"#).unwrap();
        assert!(patch.validate().is_ok());
    }
}
