use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::validation::{new_validation_error, validate_trimmed},
    entities::blog_post::none_if_blank,
    entities::option_fields::{OptionField, PatchBool, PatchI32, PatchString},
};

const MAX_COMPANY_LENGTH: u64 = 100;
const MAX_POSITION_LENGTH: u64 = 100;
const MAX_LOCATION_LENGTH: u64 = 80;
const MAX_DESCRIPTION_LENGTH: u64 = 2000;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WorkExperience {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct WorkExperienceInsert {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewWorkExperienceRequest {
    #[validate(
        length(min = 1, max = MAX_COMPANY_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub company: String,

    #[validate(
        length(min = 1, max = MAX_POSITION_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub position: String,

    #[validate(length(max = MAX_LOCATION_LENGTH))]
    pub location: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_current: bool,

    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateWorkExperienceRequest {
    #[validate(length(min = 1, max = MAX_COMPANY_LENGTH))]
    pub company: PatchString,

    #[validate(length(min = 1, max = MAX_POSITION_LENGTH))]
    pub position: PatchString,

    #[validate(length(max = MAX_LOCATION_LENGTH))]
    pub location: PatchString,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: PatchString,

    pub start_date: OptionField<NaiveDate>,
    pub end_date: OptionField<NaiveDate>,
    pub is_current: PatchBool,
    pub display_order: PatchI32,
}

/// Cross-field date rules shared by experience and education entries:
/// an entry that is not current must carry an end date, and the end date
/// must not precede the start date. Violations land on `end_date`.
pub fn validate_date_bounds(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_current: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match end_date {
        None if !is_current => {
            errors.add(
                "end_date",
                new_validation_error("end_date_required", "End date is required unless this entry is current"),
            );
        }
        Some(end) if end < start_date => {
            errors.add(
                "end_date",
                new_validation_error("end_date_before_start", "End date must not precede the start date"),
            );
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewWorkExperienceRequest> for WorkExperienceInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewWorkExperienceRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        validate_date_bounds(value.start_date, value.end_date, value.is_current)?;

        let now = Utc::now();
        Ok(WorkExperienceInsert {
            company: value.company,
            position: value.position,
            location: none_if_blank(value.location),
            description: none_if_blank(value.description),
            start_date: value.start_date,
            // A current entry keeps its end date open regardless of input.
            end_date: if value.is_current { None } else { value.end_date },
            is_current: value.is_current,
            display_order: value.display_order,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateWorkExperienceRequest {
    /// Validate the patch against the row it will be applied to, so the
    /// date rules see the merged values rather than the sparse patch.
    pub fn validate_against(&self, current: &WorkExperience) -> Result<(), ValidationErrors> {
        self.validate()?;

        let start = self.start_date.value_ref().copied().unwrap_or(current.start_date);
        let end = match &self.end_date {
            OptionField::Unchanged => current.end_date,
            OptionField::SetToNull => None,
            OptionField::SetToValue(d) => Some(*d),
        };
        let is_current = self.is_current.value_ref().copied().unwrap_or(current.is_current);

        validate_date_bounds(start, end, is_current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(end_date: Option<&str>, is_current: bool) -> NewWorkExperienceRequest {
        NewWorkExperienceRequest {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: None,
            description: Some("Shipped things".to_string()),
            start_date: "2020-03-01".parse().unwrap(),
            end_date: end_date.map(|d| d.parse().unwrap()),
            is_current,
            display_order: 0,
        }
    }

    #[test]
    fn missing_end_date_without_is_current_is_rejected() {
        let err = WorkExperienceInsert::try_from(request(None, false)).unwrap_err();
        assert!(err.field_errors().contains_key("end_date"));
    }

    #[test]
    fn is_current_entry_needs_no_end_date() {
        let insert = WorkExperienceInsert::try_from(request(None, true)).unwrap();
        assert!(insert.end_date.is_none());
        assert!(insert.is_current);
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let err = WorkExperienceInsert::try_from(request(Some("2019-12-31"), false)).unwrap_err();
        assert!(err.field_errors().contains_key("end_date"));
    }

    #[test]
    fn current_entry_drops_supplied_end_date() {
        let insert = WorkExperienceInsert::try_from(request(Some("2024-01-01"), true)).unwrap();
        assert!(insert.end_date.is_none());
    }

    #[test]
    fn patch_is_validated_against_merged_row() {
        let now = Utc::now();
        let current = WorkExperience {
            id: Uuid::new_v4(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: None,
            description: None,
            start_date: "2020-03-01".parse().unwrap(),
            end_date: Some("2022-03-01".parse().unwrap()),
            is_current: false,
            display_order: 0,
            created_at: now,
            updated_at: now,
        };

        // Clearing the end date while the row stays non-current must fail.
        let patch = UpdateWorkExperienceRequest {
            end_date: OptionField::SetToNull,
            ..Default::default()
        };
        let err = patch.validate_against(&current).unwrap_err();
        assert!(err.field_errors().contains_key("end_date"));

        // Clearing it together with is_current = true is fine.
        let patch = UpdateWorkExperienceRequest {
            end_date: OptionField::SetToNull,
            is_current: OptionField::SetToValue(true),
            ..Default::default()
        };
        assert!(patch.validate_against(&current).is_ok());
    }
}
