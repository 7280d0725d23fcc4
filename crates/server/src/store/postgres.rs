//! Postgres [`ObituaryStore`]: compiles the predicate tree to SQL.
//!
//! Every value is bound as a parameter. Relations become correlated
//! `EXISTS` sub-selects. The page and the count run in one read-only
//! repeatable-read transaction so both see the same snapshot.

use shared_types::{Relationship, SearchResult};
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{ObituaryStore, SearchPage, StoreError};
use crate::query::{Field, ObituaryQuery, Predicate, Relation, Scalar, SortKey};

const SELECT_RESULTS: &str = "SELECT o.reference, o.given_names, o.surname, o.maiden_name, \
                              o.birth_date, o.death_date FROM obituaries o";

const COUNT_RESULTS: &str = "SELECT COUNT(*) FROM obituaries o";

/// Table alias in scope while compiling a sub-predicate.
enum SqlScope {
    Obituary(String),
    AlsoKnownAs(String),
    Relative(String),
    Place { city: String, country: String },
}

impl SqlScope {
    /// Qualified column for `field`, or `None` if the field is not
    /// reachable from this scope.
    fn column(&self, field: Field) -> Option<String> {
        let col = match (self, field) {
            (SqlScope::Obituary(t), Field::Surname) => format!("{t}.surname"),
            (SqlScope::Obituary(t), Field::GivenNames) => format!("{t}.given_names"),
            (SqlScope::Obituary(t), Field::MaidenName) => format!("{t}.maiden_name"),
            (SqlScope::Obituary(t), Field::BirthDate) => format!("{t}.birth_date"),
            (SqlScope::Obituary(t), Field::DeathDate) => format!("{t}.death_date"),
            (SqlScope::AlsoKnownAs(t), Field::AkaSurname) => format!("{t}.surname"),
            (SqlScope::AlsoKnownAs(t), Field::AkaOtherNames) => format!("{t}.other_names"),
            (SqlScope::Relative(t), Field::RelativeName) => format!("{t}.name"),
            (SqlScope::Relative(t), Field::RelationshipId) => format!("{t}.relationship_id"),
            (SqlScope::Place { city, .. }, Field::PlaceName) => format!("{city}.name"),
            (SqlScope::Place { city, .. }, Field::PlaceProvince) => format!("{city}.province"),
            (SqlScope::Place { country, .. }, Field::PlaceCountry) => format!("{country}.name"),
            _ => return None,
        };
        Some(col)
    }
}

/// Escape `LIKE` metacharacters so user text matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Compiles predicates, handing out unique aliases for sub-selects.
struct Compiler {
    next_alias: usize,
}

impl Compiler {
    fn new() -> Self {
        Self { next_alias: 0 }
    }

    fn alias(&mut self, prefix: &str) -> String {
        self.next_alias += 1;
        format!("{prefix}{}", self.next_alias)
    }

    fn push_joined<'args>(
        &mut self,
        qb: &mut QueryBuilder<'args, Postgres>,
        children: &[Predicate],
        scope: &SqlScope,
        separator: &str,
    ) {
        qb.push("(");
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                qb.push(separator);
            }
            self.push(qb, child, scope);
        }
        qb.push(")");
    }

    fn push<'args>(
        &mut self,
        qb: &mut QueryBuilder<'args, Postgres>,
        predicate: &Predicate,
        scope: &SqlScope,
    ) {
        match predicate {
            Predicate::And(children) if children.is_empty() => {
                qb.push("TRUE");
            }
            Predicate::Or(children) if children.is_empty() => {
                qb.push("FALSE");
            }
            Predicate::And(children) => self.push_joined(qb, children, scope, " AND "),
            Predicate::Or(children) => self.push_joined(qb, children, scope, " OR "),
            Predicate::Contains { field, value } => match scope.column(*field) {
                Some(col) => {
                    qb.push(col)
                        .push(" ILIKE ")
                        .push_bind(format!("%{}%", escape_like(value)));
                }
                None => {
                    qb.push("FALSE");
                }
            },
            Predicate::Equals { field, value } => match scope.column(*field) {
                Some(col) => {
                    qb.push(col).push(" = ");
                    match value {
                        Scalar::Int(v) => qb.push_bind(*v),
                        Scalar::Timestamp(at) => qb.push_bind(*at),
                    };
                }
                None => {
                    qb.push("FALSE");
                }
            },
            Predicate::DateRange { field, gte, lte } => match scope.column(*field) {
                Some(col) => match (gte, lte) {
                    (None, None) => {
                        qb.push(col).push(" IS NOT NULL");
                    }
                    (Some(from), None) => {
                        qb.push(col).push(" >= ").push_bind(*from);
                    }
                    (None, Some(to)) => {
                        qb.push(col).push(" <= ").push_bind(*to);
                    }
                    (Some(from), Some(to)) => {
                        qb.push("(")
                            .push(col.as_str())
                            .push(" >= ")
                            .push_bind(*from)
                            .push(" AND ")
                            .push(col.as_str())
                            .push(" <= ")
                            .push_bind(*to)
                            .push(")");
                    }
                },
                None => {
                    qb.push("FALSE");
                }
            },
            Predicate::Exists {
                relation,
                predicate,
            } => {
                let SqlScope::Obituary(parent) = scope else {
                    qb.push("FALSE");
                    return;
                };
                let inner_scope = match relation {
                    Relation::AlsoKnownAs => {
                        let t = self.alias("a");
                        qb.push(format!(
                            "EXISTS (SELECT 1 FROM also_known_as {t} WHERE {t}.obituary_id = {parent}.id AND "
                        ));
                        SqlScope::AlsoKnownAs(t)
                    }
                    Relation::Relatives => {
                        let t = self.alias("r");
                        qb.push(format!(
                            "EXISTS (SELECT 1 FROM family_relationships {t} WHERE {t}.obituary_id = {parent}.id AND "
                        ));
                        SqlScope::Relative(t)
                    }
                    Relation::BirthPlace | Relation::DeathPlace => {
                        let city = self.alias("c");
                        let country = self.alias("k");
                        let link = if *relation == Relation::BirthPlace {
                            "birth_city_id"
                        } else {
                            "death_city_id"
                        };
                        qb.push(format!(
                            "EXISTS (SELECT 1 FROM cities {city} \
                             LEFT JOIN countries {country} ON {country}.id = {city}.country_id \
                             WHERE {city}.id = {parent}.{link} AND "
                        ));
                        SqlScope::Place { city, country }
                    }
                };
                self.push(qb, predicate, &inner_scope);
                qb.push(")");
            }
        }
    }
}

fn order_column(key: SortKey) -> &'static str {
    match key {
        SortKey::Surname => {
            "LOWER(o.surname) COLLATE \"C\" ASC NULLS LAST, o.surname COLLATE \"C\" ASC"
        }
        SortKey::GivenNames => {
            "LOWER(o.given_names) COLLATE \"C\" ASC NULLS LAST, o.given_names COLLATE \"C\" ASC"
        }
        SortKey::Reference => "o.reference ASC",
    }
}

fn push_where<'args>(qb: &mut QueryBuilder<'args, Postgres>, predicate: &Predicate) {
    qb.push(" WHERE ");
    Compiler::new().push(qb, predicate, &SqlScope::Obituary("o".to_string()));
}

/// Page query: filtered, ordered, windowed.
pub fn build_select(query: &ObituaryQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_RESULTS);
    push_where(&mut qb, &query.predicate);
    if !query.order.is_empty() {
        let order: Vec<&str> = query.order.iter().copied().map(order_column).collect();
        qb.push(" ORDER BY ").push(order.join(", "));
    }
    qb.push(" LIMIT ")
        .push_bind(query.take)
        .push(" OFFSET ")
        .push_bind(query.skip);
    qb
}

/// Count query over the same predicate.
pub fn build_count(query: &ObituaryQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(COUNT_RESULTS);
    push_where(&mut qb, &query.predicate);
    qb
}

/// Store backed by the obituary tables in Postgres.
#[derive(Clone)]
pub struct PgObituaryStore {
    pool: Pool<Postgres>,
}

impl PgObituaryStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

impl ObituaryStore for PgObituaryStore {
    async fn find_and_count(&self, query: &ObituaryQuery) -> Result<SearchPage, StoreError> {
        let mut select = build_select(query);
        let mut count = build_count(query);

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = select
            .build_query_as::<SearchResult>()
            .fetch_all(&mut *tx)
            .await?;
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(SearchPage { rows, total })
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<SearchResult>, StoreError> {
        let row = sqlx::query_as::<_, SearchResult>(
            r#"
            SELECT reference, given_names, surname, maiden_name, birth_date, death_date
            FROM obituaries
            WHERE reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, StoreError> {
        let rows = sqlx::query_as::<_, Relationship>(
            "SELECT id, name FROM relationships ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
