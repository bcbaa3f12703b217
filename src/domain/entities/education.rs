use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    domain::validation::validate_trimmed,
    entities::blog_post::none_if_blank,
    entities::experience::validate_date_bounds,
    entities::option_fields::{OptionField, PatchBool, PatchI32, PatchString},
};

const MAX_INSTITUTION_LENGTH: u64 = 120;
const MAX_DEGREE_LENGTH: u64 = 100;
const MAX_FIELD_LENGTH: u64 = 100;
const MAX_DESCRIPTION_LENGTH: u64 = 2000;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Education {
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct EducationInsert {
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewEducationRequest {
    #[validate(
        length(min = 1, max = MAX_INSTITUTION_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub institution: String,

    #[validate(
        length(min = 1, max = MAX_DEGREE_LENGTH),
        custom(function = validate_trimmed)
    )]
    pub degree: String,

    #[validate(length(max = MAX_FIELD_LENGTH))]
    pub field_of_study: Option<String>,

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
pub struct UpdateEducationRequest {
    #[validate(length(min = 1, max = MAX_INSTITUTION_LENGTH))]
    pub institution: PatchString,

    #[validate(length(min = 1, max = MAX_DEGREE_LENGTH))]
    pub degree: PatchString,

    #[validate(length(max = MAX_FIELD_LENGTH))]
    pub field_of_study: PatchString,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: PatchString,

    pub start_date: OptionField<NaiveDate>,
    pub end_date: OptionField<NaiveDate>,
    pub is_current: PatchBool,
    pub display_order: PatchI32,
}

impl TryFrom<NewEducationRequest> for EducationInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewEducationRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        validate_date_bounds(value.start_date, value.end_date, value.is_current)?;

        let now = Utc::now();
        Ok(EducationInsert {
            institution: value.institution,
            degree: value.degree,
            field_of_study: none_if_blank(value.field_of_study),
            description: none_if_blank(value.description),
            start_date: value.start_date,
            end_date: if value.is_current { None } else { value.end_date },
            is_current: value.is_current,
            display_order: value.display_order,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateEducationRequest {
    pub fn validate_against(&self, current: &Education) -> Result<(), ValidationErrors> {
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

    #[test]
    fn ongoing_studies_need_no_end_date() {
        let request = NewEducationRequest {
            institution: "University of Example".to_string(),
            degree: "BSc".to_string(),
            field_of_study: Some("Computer Science".to_string()),
            description: None,
            start_date: "2022-09-01".parse().unwrap(),
            end_date: None,
            is_current: true,
            display_order: 0,
        };
        assert!(EducationInsert::try_from(request).is_ok());
    }

    #[test]
    fn finished_studies_require_end_date() {
        let request = NewEducationRequest {
            institution: "University of Example".to_string(),
            degree: "BSc".to_string(),
            field_of_study: None,
            description: None,
            start_date: "2018-09-01".parse().unwrap(),
            end_date: None,
            is_current: false,
            display_order: 0,
        };
        let err = EducationInsert::try_from(request).unwrap_err();
        assert!(err.field_errors().contains_key("end_date"));
    }
}
