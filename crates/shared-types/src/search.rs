use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "validation")]
use validator::{Validate, ValidationError};

/// Treat empty or whitespace-only form values as "not supplied".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

#[cfg(feature = "validation")]
fn digits_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Day and month fields accept one or two ASCII digits.
#[cfg(feature = "validation")]
fn validate_day_or_month(value: &str) -> Result<(), ValidationError> {
    if (1..=2).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(digits_error("day_or_month", "Must be 1 or 2 digits"))
    }
}

/// Year fields accept exactly four ASCII digits.
#[cfg(feature = "validation")]
fn validate_year(value: &str) -> Result<(), ValidationError> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(digits_error("year", "Must be exactly 4 digits"))
    }
}

/// Calendar mode chosen for a birth or death date facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DateSearchType {
    /// Day / month / year, degrading to month or year precision.
    Exact,
    /// Open interval of whole years.
    Range,
}

/// One row of the relatives facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct RelativeFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Relationship id must be positive"))
    )]
    pub relationship_id: Option<i32>,
}

/// Public obituary search form, as submitted by the search page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct ObituarySearchRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub given_names: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub maiden_name: Option<String>,

    #[serde(default)]
    #[cfg_attr(feature = "validation", validate(nested))]
    pub relatives: Vec<RelativeFilter>,

    #[serde(default)]
    pub birth_date_type: Option<DateSearchType>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_day_or_month")))]
    pub birth_day: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_day_or_month")))]
    pub birth_month: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_year")))]
    pub birth_year: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_year")))]
    pub birth_year_from: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_year")))]
    pub birth_year_to: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub birth_place: Option<String>,

    #[serde(default)]
    pub death_date_type: Option<DateSearchType>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_day_or_month")))]
    pub death_day: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_day_or_month")))]
    pub death_month: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_year")))]
    pub death_year: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_year")))]
    pub death_year_from: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_year")))]
    pub death_year_to: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub death_place: Option<String>,

    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Page must be a positive integer"))
    )]
    pub page: Option<i64>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, message = "Page size must be a positive integer"))
    )]
    pub page_size: Option<i64>,
}

/// A matching obituary, projected to the columns the results table shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub reference: String,
    pub given_names: Option<String>,
    pub surname: Option<String>,
    pub maiden_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub death_date: Option<DateTime<Utc>>,
}

/// One page of search results plus the total match count.
///
/// `is_partial_match` is set when the strict search found nothing and a
/// relaxed any-name search was used instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: i64,
    pub is_partial_match: bool,
}

/// A relationship type offered in the relatives facet (e.g. "Spouse").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Relationship {
    pub id: i32,
    pub name: String,
}
