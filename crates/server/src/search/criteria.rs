use shared_types::{AppError, DateSearchType, ObituarySearchRequest};
use validator::Validate;

use super::SearchError;
use crate::dates::{self, DateCondition};

/// Name facet. Each value is matched as a case-insensitive substring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameCriteria {
    pub surname: Option<String>,
    pub given_names: Option<String>,
    pub maiden_name: Option<String>,
}

impl NameCriteria {
    /// True when at least one name field was supplied.
    pub fn any(&self) -> bool {
        self.surname.is_some() || self.given_names.is_some() || self.maiden_name.is_some()
    }
}

/// One relative entry; at least one side is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeCriteria {
    pub name: Option<String>,
    pub relationship_id: Option<i32>,
}

/// Date facet in the mode the searcher picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Exact {
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    },
    Range {
        year_from: Option<i32>,
        year_to: Option<i32>,
    },
}

impl DateFilter {
    pub fn resolve(&self) -> Option<DateCondition> {
        match *self {
            DateFilter::Exact { year, month, day } => dates::resolve_exact(year, month, day),
            DateFilter::Range { year_from, year_to } => dates::resolve_range(year_from, year_to),
        }
    }
}

/// Birth or death facet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifeEventCriteria {
    pub date: Option<DateFilter>,
    pub place: Option<String>,
}

/// Validated, typed search input.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub names: NameCriteria,
    pub relatives: Vec<RelativeCriteria>,
    pub birth: LifeEventCriteria,
    pub death: LifeEventCriteria,
    pub page: i64,
    pub page_size: i64,
}

/// Unparseable parts count as absent.
fn parse_part<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

fn date_filter(
    mode: Option<DateSearchType>,
    day: Option<&str>,
    month: Option<&str>,
    year: Option<&str>,
    year_from: Option<&str>,
    year_to: Option<&str>,
) -> Option<DateFilter> {
    match mode? {
        DateSearchType::Exact => Some(DateFilter::Exact {
            year: parse_part(year),
            month: parse_part(month),
            day: parse_part(day),
        }),
        DateSearchType::Range => Some(DateFilter::Range {
            year_from: parse_part(year_from),
            year_to: parse_part(year_to),
        }),
    }
}

impl SearchCriteria {
    /// Validate the submitted form and convert it into typed criteria.
    ///
    /// `default_page_size` applies when the form omits `pageSize`.
    pub fn from_request(
        req: &ObituarySearchRequest,
        default_page_size: i64,
    ) -> Result<Self, SearchError> {
        req.validate()
            .map_err(|e| SearchError::InvalidInput(AppError::from(e).field_errors))?;

        let relatives = req
            .relatives
            .iter()
            .filter(|r| r.name.is_some() || r.relationship_id.is_some())
            .map(|r| RelativeCriteria {
                name: r.name.clone(),
                relationship_id: r.relationship_id,
            })
            .collect();

        Ok(Self {
            names: NameCriteria {
                surname: req.surname.clone(),
                given_names: req.given_names.clone(),
                maiden_name: req.maiden_name.clone(),
            },
            relatives,
            birth: LifeEventCriteria {
                date: date_filter(
                    req.birth_date_type,
                    req.birth_day.as_deref(),
                    req.birth_month.as_deref(),
                    req.birth_year.as_deref(),
                    req.birth_year_from.as_deref(),
                    req.birth_year_to.as_deref(),
                ),
                place: req.birth_place.clone(),
            },
            death: LifeEventCriteria {
                date: date_filter(
                    req.death_date_type,
                    req.death_day.as_deref(),
                    req.death_month.as_deref(),
                    req.death_year.as_deref(),
                    req.death_year_from.as_deref(),
                    req.death_year_to.as_deref(),
                ),
                place: req.death_place.clone(),
            },
            page: req.page.unwrap_or(1),
            page_size: req.page_size.unwrap_or(default_page_size.max(1)),
        })
    }
}
