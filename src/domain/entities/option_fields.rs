use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use validator::{Validate, ValidateLength, ValidationErrors};

/// Optional-field semantics for PATCH requests.
///
/// - `Unchanged` → field absent from the payload
/// - `SetToNull` → explicit `null`
/// - `SetToValue` → set to the provided value
///
/// Relies on `#[serde(default)]` at the struct level: absent fields fall
/// back to `Unchanged`, while a present field deserializes through the
/// `Option<T>` impl below.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OptionField<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

/// `SetToValue` serializes as the value itself, the other variants as
/// null. Validator error params embed the rejected field through this.
impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionField::SetToValue(value) => value.serialize(serializer),
            OptionField::Unchanged | OptionField::SetToNull => serializer.serialize_none(),
        }
    }
}

// ---------------------- Validation support ----------------------

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>,
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }

    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

impl<T: Validate> Validate for OptionField<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            OptionField::SetToValue(value) => value.validate(),
            _ => Ok(()),
        }
    }
}

// ---------------------- Helpers ----------------------

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_set_to_null(&self) -> bool {
        matches!(self, Self::SetToNull)
    }

    /// Reference to the inner value when `SetToValue`.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Consume into the inner value when `SetToValue`.
    pub fn take_value(self) -> Option<T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> OptionField<U> {
        match self {
            Self::Unchanged => OptionField::Unchanged,
            Self::SetToNull => OptionField::SetToNull,
            Self::SetToValue(v) => OptionField::SetToValue(f(v)),
        }
    }
}

impl OptionField<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.value_ref().map(|s| s.as_str())
    }
}

pub type PatchString = OptionField<String>;
pub type PatchBool = OptionField<bool>;
pub type PatchI32 = OptionField<i32>;
pub type PatchUuid = OptionField<Uuid>;
pub type PatchDateTimeUtc = OptionField<DateTime<Utc>>;
pub type PatchVec<T> = OptionField<Vec<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        title: OptionField<String>,
        excerpt: OptionField<String>,
        order: OptionField<i32>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let patch: Patch = serde_json::from_str(r#"{"excerpt": null, "order": 3}"#).unwrap();

        assert!(patch.title.is_unchanged());
        assert!(patch.excerpt.is_set_to_null());
        assert_eq!(patch.order, OptionField::SetToValue(3));
    }

    #[test]
    fn serializes_value_or_null() {
        let value: OptionField<i32> = OptionField::SetToValue(3);
        assert_eq!(serde_json::to_value(&value).unwrap(), serde_json::json!(3));

        let null: OptionField<i32> = OptionField::SetToNull;
        assert_eq!(serde_json::to_value(&null).unwrap(), serde_json::Value::Null);

        let unchanged: OptionField<i32> = OptionField::Unchanged;
        assert_eq!(serde_json::to_value(&unchanged).unwrap(), serde_json::Value::Null);
    }
}
