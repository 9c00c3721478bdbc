use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::{CoreError, Result};
use crate::mapping::{FieldSource, FieldValue, IntoFieldValue};

/// A persisted patient.
///
/// Medical tests reference their patient by id; the inverse side of that
/// relationship is served by storage queries rather than held here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "crate::time::iso_date_option")]
    pub birthdate: Option<Date>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on `today`, or `None` without a birthdate.
    pub fn age_on(&self, today: Date) -> Option<i32> {
        self.birthdate
            .map(|birthdate| crate::time::whole_years_between(birthdate, today))
    }

    /// Age in whole years as of the current UTC date.
    pub fn age(&self) -> Option<i32> {
        self.age_on(crate::time::today_utc())
    }
}

impl FieldSource for Patient {
    fn source_name(&self) -> &'static str {
        "Patient"
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => self.id.into_field_value(),
            "first_name" => self.first_name.clone().into_field_value(),
            "last_name" => self.last_name.clone().into_field_value(),
            "birthdate" => self.birthdate.into_field_value(),
            "full_name" => self.full_name().into_field_value(),
            "age" => self.age().into_field_value(),
            _ => return None,
        };
        Some(value)
    }
}

/// Insert shape for a patient; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "crate::time::iso_date_option")]
    pub birthdate: Option<Date>,
}

impl NewPatient {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate: None,
        }
    }

    pub fn with_birthdate(mut self, birthdate: Date) -> Self {
        self.birthdate = Some(birthdate);
        self
    }

    /// Both name columns are NOT NULL in storage; blank names are rejected too.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(CoreError::invalid_entity("first name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(CoreError::invalid_entity("last name is required"));
        }
        Ok(())
    }

    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
        }
    }
}
