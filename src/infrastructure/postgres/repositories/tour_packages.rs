use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl,
    dsl::{AsSelect, SqlTypeOf},
    pg::Pg,
    prelude::*,
};
use std::sync::Arc;

use crate::{
    domain::{
        entities::tour_packages::TourPackageEntity,
        repositories::tour_packages::TourPackageRepository,
        value_objects::{
            query_params::contains_pattern,
            tour_packages::{ListToursFilter, TourOrderingField},
        },
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::tour_packages},
};

type TourPackageQuery =
    tour_packages::BoxedQuery<'static, Pg, SqlTypeOf<AsSelect<TourPackageEntity, Pg>>>;

pub struct TourPackagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TourPackagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Active tours matching `filter`, newest first unless an ordering is given.
fn active_tours_query(filter: ListToursFilter) -> TourPackageQuery {
    let mut query = tour_packages::table
        .select(TourPackageEntity::as_select())
        .filter(tour_packages::is_active.eq(true))
        .into_boxed();

    for term in &filter.search_terms {
        let pattern = contains_pattern(term);
        query = query.filter(
            tour_packages::title
                .ilike(pattern.clone())
                .or(tour_packages::description.ilike(pattern.clone()))
                .or(tour_packages::location.ilike(pattern)),
        );
    }

    if let Some(location) = filter.location {
        query = query.filter(tour_packages::location.eq(location));
    }

    if let Some(location) = filter.location_contains {
        query = query.filter(tour_packages::location.ilike(contains_pattern(&location)));
    }

    if let Some(duration) = filter.duration {
        query = query.filter(tour_packages::duration.eq(duration));
    }

    if let Some(price) = filter.price {
        query = query.filter(tour_packages::price.eq(price));
    }

    if let Some(min_price) = filter.min_price {
        query = query.filter(tour_packages::price.ge(min_price));
    }

    if let Some(max_price) = filter.max_price {
        query = query.filter(tour_packages::price.le(max_price));
    }

    if filter.ordering.is_empty() {
        query = query.order(tour_packages::created_at.desc());
    }

    for term in &filter.ordering {
        query = match (term.field, term.is_descending()) {
            (TourOrderingField::Price, false) => query.then_order_by(tour_packages::price.asc()),
            (TourOrderingField::Price, true) => query.then_order_by(tour_packages::price.desc()),
            (TourOrderingField::Duration, false) => {
                query.then_order_by(tour_packages::duration.asc())
            }
            (TourOrderingField::Duration, true) => {
                query.then_order_by(tour_packages::duration.desc())
            }
            (TourOrderingField::CreatedAt, false) => {
                query.then_order_by(tour_packages::created_at.asc())
            }
            (TourOrderingField::CreatedAt, true) => {
                query.then_order_by(tour_packages::created_at.desc())
            }
        };
    }

    if let Some(limit) = filter.pagination.limit {
        query = query.limit(limit);
    }

    if let Some(offset) = filter.pagination.offset {
        query = query.offset(offset);
    }

    query
}

fn active_tour_query(tour_id: i64) -> TourPackageQuery {
    tour_packages::table
        .select(TourPackageEntity::as_select())
        .filter(tour_packages::id.eq(tour_id))
        .filter(tour_packages::is_active.eq(true))
        .into_boxed()
}

#[async_trait]
impl TourPackageRepository for TourPackagePostgres {
    async fn list_active(&self, filter: ListToursFilter) -> Result<Vec<TourPackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = active_tours_query(filter).load::<TourPackageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_active_by_id(&self, tour_id: i64) -> Result<Option<TourPackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = active_tour_query(tour_id)
            .first::<TourPackageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_id(&self, tour_id: i64) -> Result<Option<TourPackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = tour_packages::table
            .find(tour_id)
            .select(TourPackageEntity::as_select())
            .first::<TourPackageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use rust_decimal::Decimal;

    use crate::domain::value_objects::{enums::sort_order::SortOrder, query_params::OrderingTerm};

    fn sql(query: TourPackageQuery) -> String {
        debug_query::<Pg, _>(&query).to_string()
    }

    #[test]
    fn featured_query_takes_newest_active_tours() {
        let sql = sql(active_tours_query(ListToursFilter::featured()));

        assert!(sql.contains(r#"WHERE "tour_packages"."is_active" = $1"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "tour_packages"."created_at" DESC LIMIT $2"#),
            "{sql}"
        );
        assert!(sql.ends_with("-- binds: [true, 4]"), "{sql}");
    }

    #[test]
    fn search_terms_match_any_text_column_with_escaped_wildcards() {
        let sql = sql(active_tours_query(ListToursFilter {
            search_terms: vec!["50%".to_string()],
            ..ListToursFilter::default()
        }));

        assert!(sql.contains(r#""tour_packages"."title" ILIKE $2"#), "{sql}");
        assert!(sql.contains(r#""tour_packages"."description" ILIKE $3"#), "{sql}");
        assert!(sql.contains(r#""tour_packages"."location" ILIKE $4"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains(r#""%50\%%""#), "{sql}");
    }

    #[test]
    fn price_range_and_location_substring_are_bounded() {
        let sql = sql(active_tours_query(ListToursFilter {
            location_contains: Some("Dubai".to_string()),
            min_price: Some(Decimal::from(4_000_000)),
            max_price: Some(Decimal::from(6_000_000)),
            ..ListToursFilter::default()
        }));

        assert!(sql.contains(r#""tour_packages"."location" ILIKE $2"#), "{sql}");
        assert!(sql.contains(r#""tour_packages"."price" >= $3"#), "{sql}");
        assert!(sql.contains(r#""tour_packages"."price" <= $4"#), "{sql}");
        assert!(sql.contains(r#""%Dubai%""#), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
    }

    #[test]
    fn explicit_ordering_replaces_the_default() {
        let sql = sql(active_tours_query(ListToursFilter {
            ordering: vec![
                OrderingTerm {
                    field: TourOrderingField::Price,
                    sort_order: SortOrder::Desc,
                },
                OrderingTerm {
                    field: TourOrderingField::Duration,
                    sort_order: SortOrder::Asc,
                },
            ],
            ..ListToursFilter::default()
        }));

        assert!(
            sql.contains(r#"ORDER BY "tour_packages"."price" DESC, "tour_packages"."duration" ASC"#),
            "{sql}"
        );
        assert!(!sql.contains(r#""created_at" DESC"#), "{sql}");
    }

    #[test]
    fn single_tour_lookup_requires_active_flag() {
        let sql = sql(active_tour_query(7));

        assert!(sql.contains(r#""tour_packages"."id" = $1"#), "{sql}");
        assert!(sql.contains(r#""tour_packages"."is_active" = $2"#), "{sql}");
        assert!(sql.ends_with("-- binds: [7, true]"), "{sql}");
    }
}
