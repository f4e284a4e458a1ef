//! Query parameters of `GET /jobs`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::binding::query::{FormParam, QueryArgs};
use crate::binding::ParamError;

const START_TIME_BEFORE: FormParam = FormParam::optional("start_time_before");
const START_TIME_AFTER: FormParam = FormParam::optional("start_time_after");
const END_TIME_BEFORE: FormParam = FormParam::optional("end_time_before");
const END_TIME_AFTER: FormParam = FormParam::optional("end_time_after");
const ACTIVITY: FormParam = FormParam::optional("activity");
const PETS: &str = "pets";
const LIMIT: FormParam = FormParam::optional("limit");
const CURSOR: FormParam = FormParam::optional("cursor");
const SORT: FormParam = FormParam::optional("sort");

const PET_FILTER_FIELDS: &[&str] = &["age_above", "age_below", "species"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_after: Option<DateTime<Utc>>,
    /// Full-text phrase matched against job activities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<PetFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl JobSearchParams {
    /// Binds every declared parameter; the first failure aborts the whole binding.
    pub fn bind(args: &QueryArgs) -> Result<Self, ParamError> {
        Ok(Self {
            start_time_before: args.form(&START_TIME_BEFORE)?,
            start_time_after: args.form(&START_TIME_AFTER)?,
            end_time_before: args.form(&END_TIME_BEFORE)?,
            end_time_after: args.form(&END_TIME_AFTER)?,
            activity: args.form(&ACTIVITY)?,
            pets: args
                .deep_object(PETS)?
                .map(|pets| -> Result<PetFilter, ParamError> {
                    pets.deny_unknown(PET_FILTER_FIELDS)?;
                    Ok(PetFilter {
                        age_above: pets.field("age_above")?,
                        age_below: pets.field("age_below")?,
                        species: pets.field("species")?,
                    })
                })
                .transpose()?,
            limit: args.form(&LIMIT)?,
            cursor: args.form(&CURSOR)?,
            sort: args.form(&SORT)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PetFilter {
    /// Only pets of this age or older.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_above: Option<i32>,
    /// Only pets of this age or younger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_below: Option<i32>,
    /// Comma-separated list of species.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

impl PetFilter {
    #[cfg(test)]
    pub fn species_list(&self) -> Vec<&str> {
        self.species
            .as_deref()
            .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    StartTime,
    EndTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// `<field>[:asc|:desc]`, restricted to the sortable job fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("unknown sort field '{0}', expected start_time or end_time")]
    UnknownField(String),

    #[error("unknown sort direction '{0}', expected asc or desc")]
    UnknownDirection(String),
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s, None),
        };

        let field = match field {
            "start_time" => SortField::StartTime,
            "end_time" => SortField::EndTime,
            other => return Err(SortError::UnknownField(other.to_string())),
        };
        let direction = match direction {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => return Err(SortError::UnknownDirection(other.to_string())),
        };

        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::StartTime => "start_time",
            SortField::EndTime => "end_time",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{field}:{direction}")
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
