//! In-memory [`ObituaryStore`] used by tests and local demos.
//!
//! Predicates are evaluated directly against nested records. Page and count
//! are computed under one read guard, so they always agree.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use shared_types::{Relationship, SearchResult};

use super::{ObituaryStore, SearchPage, StoreError};
use crate::query::{Field, ObituaryQuery, Predicate, Relation, Scalar, SortKey};

/// A city with its province and country name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub name: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
}

impl Place {
    pub fn new(name: &str, province: &str, country: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            province: Some(province.to_string()),
            country: Some(country.to_string()),
        }
    }
}

/// Alternate name recorded for an obituary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlsoKnownAs {
    pub surname: Option<String>,
    pub other_names: Option<String>,
}

/// A named family member of the deceased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relative {
    pub name: Option<String>,
    pub relationship_id: Option<i32>,
}

/// An obituary with its relations inlined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObituaryRecord {
    pub reference: String,
    pub surname: Option<String>,
    pub given_names: Option<String>,
    pub maiden_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub death_date: Option<DateTime<Utc>>,
    pub birth_place: Option<Place>,
    pub death_place: Option<Place>,
    pub also_known_as: Vec<AlsoKnownAs>,
    pub relatives: Vec<Relative>,
}

impl ObituaryRecord {
    pub fn new(reference: &str, surname: &str, given_names: &str) -> Self {
        Self {
            reference: reference.to_string(),
            surname: Some(surname.to_string()),
            given_names: Some(given_names.to_string()),
            ..Default::default()
        }
    }

    fn to_result(&self) -> SearchResult {
        SearchResult {
            reference: self.reference.clone(),
            given_names: self.given_names.clone(),
            surname: self.surname.clone(),
            maiden_name: self.maiden_name.clone(),
            birth_date: self.birth_date,
            death_date: self.death_date,
        }
    }
}

#[derive(Default)]
struct Fixture {
    records: Vec<ObituaryRecord>,
    relationships: Vec<Relationship>,
}

/// Fixture-backed store.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Fixture>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new(records: Vec<ObituaryRecord>) -> Self {
        Self {
            data: RwLock::new(Fixture {
                records,
                relationships: Vec::new(),
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn with_relationships(self, relationships: Vec<Relationship>) -> Self {
        if let Ok(mut data) = self.data.write() {
            data.relationships = relationships;
        }
        self
    }

    pub fn insert(&self, record: ObituaryRecord) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::new("fixture lock poisoned"))?;
        data.records.push(record);
        Ok(())
    }

    /// Make every call fail, to exercise error paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            Err(StoreError::new("memory store marked unavailable"))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Fixture>, StoreError> {
        self.check_available()?;
        self.data
            .read()
            .map_err(|_| StoreError::new("fixture lock poisoned"))
    }
}

// ── Predicate evaluation ────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Scope<'a> {
    Record(&'a ObituaryRecord),
    Aka(&'a AlsoKnownAs),
    Relative(&'a Relative),
    Place(&'a Place),
}

enum Value<'a> {
    Text(Option<&'a str>),
    Int(Option<i64>),
    Time(Option<DateTime<Utc>>),
    /// Field does not exist in this scope.
    Missing,
}

fn field_value<'a>(scope: Scope<'a>, field: Field) -> Value<'a> {
    match (scope, field) {
        (Scope::Record(r), Field::Surname) => Value::Text(r.surname.as_deref()),
        (Scope::Record(r), Field::GivenNames) => Value::Text(r.given_names.as_deref()),
        (Scope::Record(r), Field::MaidenName) => Value::Text(r.maiden_name.as_deref()),
        (Scope::Record(r), Field::BirthDate) => Value::Time(r.birth_date),
        (Scope::Record(r), Field::DeathDate) => Value::Time(r.death_date),
        (Scope::Aka(a), Field::AkaSurname) => Value::Text(a.surname.as_deref()),
        (Scope::Aka(a), Field::AkaOtherNames) => Value::Text(a.other_names.as_deref()),
        (Scope::Relative(r), Field::RelativeName) => Value::Text(r.name.as_deref()),
        (Scope::Relative(r), Field::RelationshipId) => {
            Value::Int(r.relationship_id.map(i64::from))
        }
        (Scope::Place(p), Field::PlaceName) => Value::Text(p.name.as_deref()),
        (Scope::Place(p), Field::PlaceProvince) => Value::Text(p.province.as_deref()),
        (Scope::Place(p), Field::PlaceCountry) => Value::Text(p.country.as_deref()),
        _ => Value::Missing,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(scope: Scope<'_>, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::And(children) => children.iter().all(|p| matches(scope, p)),
        Predicate::Or(children) => children.iter().any(|p| matches(scope, p)),
        Predicate::Contains { field, value } => match field_value(scope, *field) {
            Value::Text(Some(text)) => contains_ignore_case(text, value),
            _ => false,
        },
        Predicate::Equals { field, value } => match (field_value(scope, *field), value) {
            (Value::Int(Some(a)), Scalar::Int(b)) => a == *b,
            (Value::Time(Some(a)), Scalar::Timestamp(b)) => a == *b,
            _ => false,
        },
        Predicate::DateRange { field, gte, lte } => match field_value(scope, *field) {
            Value::Time(Some(at)) => {
                gte.map_or(true, |from| at >= from) && lte.map_or(true, |to| at <= to)
            }
            _ => false,
        },
        Predicate::Exists {
            relation,
            predicate,
        } => {
            let Scope::Record(record) = scope else {
                return false;
            };
            match relation {
                Relation::AlsoKnownAs => record
                    .also_known_as
                    .iter()
                    .any(|a| matches(Scope::Aka(a), predicate)),
                Relation::Relatives => record
                    .relatives
                    .iter()
                    .any(|r| matches(Scope::Relative(r), predicate)),
                Relation::BirthPlace => record
                    .birth_place
                    .as_ref()
                    .is_some_and(|p| matches(Scope::Place(p), predicate)),
                Relation::DeathPlace => record
                    .death_place
                    .as_ref()
                    .is_some_and(|p| matches(Scope::Place(p), predicate)),
            }
        }
    }
}

/// Ascending with nulls last, as Postgres sorts by default.
/// Case-folded comparison, raw bytes as the tiebreak. Matches the
/// `LOWER(..) COLLATE "C"` ordering of the Postgres store.
fn cmp_nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &ObituaryRecord, b: &ObituaryRecord, order: &[SortKey]) -> Ordering {
    order
        .iter()
        .map(|key| match key {
            SortKey::Surname => cmp_nulls_last(a.surname.as_deref(), b.surname.as_deref()),
            SortKey::GivenNames => {
                cmp_nulls_last(a.given_names.as_deref(), b.given_names.as_deref())
            }
            SortKey::Reference => a.reference.cmp(&b.reference),
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl ObituaryStore for MemoryStore {
    async fn find_and_count(&self, query: &ObituaryQuery) -> Result<SearchPage, StoreError> {
        let data = self.read()?;

        let mut hits: Vec<&ObituaryRecord> = data
            .records
            .iter()
            .filter(|r| matches(Scope::Record(*r), &query.predicate))
            .collect();
        hits.sort_by(|a, b| compare(a, b, &query.order));

        let total = hits.len() as i64;
        let skip = usize::try_from(query.skip).unwrap_or(0);
        let take = usize::try_from(query.take).unwrap_or(0);
        let rows = hits
            .into_iter()
            .skip(skip)
            .take(take)
            .map(ObituaryRecord::to_result)
            .collect();

        Ok(SearchPage { rows, total })
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<SearchResult>, StoreError> {
        let data = self.read()?;
        Ok(data
            .records
            .iter()
            .find(|r| r.reference == reference)
            .map(ObituaryRecord::to_result))
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, StoreError> {
        let data = self.read()?;
        let mut relationships = data.relationships.clone();
        relationships.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(relationships)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
