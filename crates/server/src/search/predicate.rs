//! Translation of [`SearchCriteria`] into a [`Predicate`] tree.

use crate::dates::DateCondition;
use crate::query::{Field, Predicate, Relation, Scalar};

use super::criteria::{DateFilter, NameCriteria, RelativeCriteria, SearchCriteria};

/// Primary surname or any also-known-as surname.
fn surname_condition(surname: &str) -> Predicate {
    Predicate::Or(vec![
        Predicate::contains(Field::Surname, surname),
        Predicate::exists(
            Relation::AlsoKnownAs,
            Predicate::contains(Field::AkaSurname, surname),
        ),
    ])
}

/// Primary given names or any also-known-as other names.
fn given_names_condition(given_names: &str) -> Predicate {
    Predicate::Or(vec![
        Predicate::contains(Field::GivenNames, given_names),
        Predicate::exists(
            Relation::AlsoKnownAs,
            Predicate::contains(Field::AkaOtherNames, given_names),
        ),
    ])
}

/// Maiden name or any also-known-as surname.
fn maiden_name_condition(maiden_name: &str) -> Predicate {
    Predicate::Or(vec![
        Predicate::contains(Field::MaidenName, maiden_name),
        Predicate::exists(
            Relation::AlsoKnownAs,
            Predicate::contains(Field::AkaSurname, maiden_name),
        ),
    ])
}

/// Any one of the supplied name fields. `None` when no name was given.
pub fn relaxed_name_block(names: &NameCriteria) -> Option<Predicate> {
    let mut conditions = Vec::new();
    if let Some(s) = &names.surname {
        conditions.push(surname_condition(s));
    }
    if let Some(g) = &names.given_names {
        conditions.push(given_names_condition(g));
    }
    if let Some(m) = &names.maiden_name {
        conditions.push(maiden_name_condition(m));
    }
    if conditions.is_empty() {
        None
    } else {
        Some(Predicate::Or(conditions))
    }
}

/// Name block of the primary search.
///
/// Surname with given names, or given names with maiden name, is treated
/// as a strong identity and every supplied field must match. Any other
/// combination matches on any one supplied field.
pub fn name_block(names: &NameCriteria) -> Option<Predicate> {
    match (&names.surname, &names.given_names, &names.maiden_name) {
        (Some(s), Some(g), maiden) => {
            let mut all = vec![surname_condition(s), given_names_condition(g)];
            if let Some(m) = maiden {
                all.push(maiden_name_condition(m));
            }
            Some(Predicate::And(all))
        }
        (None, Some(g), Some(m)) => Some(Predicate::And(vec![
            given_names_condition(g),
            maiden_name_condition(m),
        ])),
        _ => relaxed_name_block(names),
    }
}

fn relative_clause(relative: &RelativeCriteria) -> Option<Predicate> {
    let mut parts = Vec::new();
    if let Some(name) = &relative.name {
        parts.push(Predicate::contains(Field::RelativeName, name));
    }
    if let Some(id) = relative.relationship_id {
        parts.push(Predicate::Equals {
            field: Field::RelationshipId,
            value: Scalar::Int(i64::from(id)),
        });
    }
    if parts.is_empty() {
        None
    } else {
        Some(Predicate::And(parts))
    }
}

/// Some relative matches any one of the entries.
fn relatives_block(relatives: &[RelativeCriteria]) -> Option<Predicate> {
    let clauses: Vec<Predicate> = relatives.iter().filter_map(relative_clause).collect();
    if clauses.is_empty() {
        return None;
    }
    Some(Predicate::exists(Relation::Relatives, Predicate::Or(clauses)))
}

fn date_block(field: Field, filter: Option<&DateFilter>) -> Option<Predicate> {
    match filter?.resolve()? {
        DateCondition::On(at) => Some(Predicate::Equals {
            field,
            value: Scalar::Timestamp(at),
        }),
        DateCondition::Between { gte, lte } => Some(Predicate::DateRange { field, gte, lte }),
    }
}

/// City name, province or country of the linked place.
fn place_block(relation: Relation, text: Option<&str>) -> Option<Predicate> {
    let text = text?;
    Some(Predicate::exists(
        relation,
        Predicate::Or(vec![
            Predicate::contains(Field::PlaceName, text),
            Predicate::contains(Field::PlaceProvince, text),
            Predicate::contains(Field::PlaceCountry, text),
        ]),
    ))
}

/// AND of every active facet. Matches everything when no facet is active.
pub fn primary_predicate(criteria: &SearchCriteria) -> Predicate {
    let blocks = [
        name_block(&criteria.names),
        relatives_block(&criteria.relatives),
        date_block(Field::BirthDate, criteria.birth.date.as_ref()),
        date_block(Field::DeathDate, criteria.death.date.as_ref()),
        place_block(Relation::BirthPlace, criteria.birth.place.as_deref()),
        place_block(Relation::DeathPlace, criteria.death.place.as_deref()),
    ];
    Predicate::And(blocks.into_iter().flatten().collect())
}

/// Partial-match predicate: any supplied name, every other facet dropped.
pub fn relaxed_predicate(criteria: &SearchCriteria) -> Option<Predicate> {
    relaxed_name_block(&criteria.names)
}
