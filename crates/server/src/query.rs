//! Storage-neutral predicate tree for obituary queries.
//!
//! The search service builds a [`Predicate`] and an [`ObituaryQuery`]; each
//! store adapter compiles or evaluates them in its own way.

use chrono::{DateTime, Utc};

/// A column of the obituary record or of one of its relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Surname,
    GivenNames,
    MaidenName,
    BirthDate,
    DeathDate,
    /// `also_known_as.surname`
    AkaSurname,
    /// `also_known_as.other_names`
    AkaOtherNames,
    /// `family_relationships.name`
    RelativeName,
    /// `family_relationships.relationship_id`
    RelationshipId,
    /// `cities.name`
    PlaceName,
    /// `cities.province`
    PlaceProvince,
    /// `countries.name` of the city
    PlaceCountry,
}

/// A relation reachable from an obituary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    AlsoKnownAs,
    Relatives,
    BirthPlace,
    DeathPlace,
}

/// Right-hand side of an equality test.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Timestamp(DateTime<Utc>),
}

/// Boolean query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All children match. An empty list matches everything.
    And(Vec<Predicate>),
    /// At least one child matches. An empty list matches nothing.
    Or(Vec<Predicate>),
    /// Case-insensitive substring match.
    Contains { field: Field, value: String },
    Equals { field: Field, value: Scalar },
    /// Inclusive bounds; a missing bound is open.
    DateRange {
        field: Field,
        gte: Option<DateTime<Utc>>,
        lte: Option<DateTime<Utc>>,
    },
    /// Some element of the relation satisfies the inner predicate.
    Exists {
        relation: Relation,
        predicate: Box<Predicate>,
    },
}

impl Predicate {
    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            value: value.into(),
        }
    }

    pub fn exists(relation: Relation, predicate: Predicate) -> Self {
        Predicate::Exists {
            relation,
            predicate: Box::new(predicate),
        }
    }

    /// Predicate that matches every record.
    pub fn all() -> Self {
        Predicate::And(Vec::new())
    }
}

/// Sort column of the results list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Surname,
    GivenNames,
    Reference,
}

/// Results ordering: surname, then given names, then reference so that
/// page windows never overlap. All keys ascending with nulls last.
pub const RESULT_ORDER: [SortKey; 3] = [SortKey::Surname, SortKey::GivenNames, SortKey::Reference];

/// A paginated find whose count shares the same predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ObituaryQuery {
    pub predicate: Predicate,
    pub order: Vec<SortKey>,
    pub skip: i64,
    pub take: i64,
}

impl ObituaryQuery {
    /// Build a query for 1-indexed `page` of `page_size` rows.
    ///
    /// A window starting beyond `i64::MAX` rows clamps there and reads empty.
    pub fn paged(predicate: Predicate, page: i64, page_size: i64) -> Self {
        Self {
            predicate,
            order: RESULT_ORDER.to_vec(),
            skip: page.saturating_sub(1).saturating_mul(page_size),
            take: page_size,
        }
    }
}
