use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::tour_packages::TourPackageEntity,
    value_objects::{
        query_params::{
            OrderingTerm, Pagination, decimal_param, non_blank, number_param, parse_ordering,
            search_terms,
        },
        validation::ValidationErrors,
    },
};

pub const FEATURED_TOURS_LIMIT: i64 = 4;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TourPackageDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub price_uzs: String,
    pub duration: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TourPackageDto {
    pub fn from_entity(value: TourPackageEntity, media_url: &str) -> Self {
        Self {
            id: value.id,
            image: image_url(media_url, &value.image),
            price_uzs: format_price_uzs(value.price),
            title: value.title,
            description: value.description,
            location: value.location,
            start_date: value.start_date,
            end_date: value.end_date,
            price: value.price,
            duration: value.duration,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Formats a price as whole som with grouped thousands, e.g. `4,500,000 UZS`.
pub fn format_price_uzs(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push_str(" UZS");
    grouped
}

/// Resolves a stored image path against the public media prefix.
pub fn image_url(media_url: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    Some(format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourOrderingField {
    Price,
    Duration,
    CreatedAt,
}

impl TourOrderingField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "price" => Some(TourOrderingField::Price),
            "duration" => Some(TourOrderingField::Duration),
            "created_at" => Some(TourOrderingField::CreatedAt),
            _ => None,
        }
    }
}

/// Predicates applied on top of `is_active = true`. Every supplied filter must hold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListToursFilter {
    /// Each term must appear, case-insensitively, in title, description or location.
    pub search_terms: Vec<String>,
    pub location: Option<String>,
    pub location_contains: Option<String>,
    pub duration: Option<i32>,
    pub price: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Empty means newest first.
    pub ordering: Vec<OrderingTerm<TourOrderingField>>,
    pub pagination: Pagination,
}

impl ListToursFilter {
    pub fn featured() -> Self {
        Self {
            pagination: Pagination {
                limit: Some(FEATURED_TOURS_LIMIT),
                offset: None,
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListToursQuery {
    pub location: Option<String>,
    pub duration: Option<String>,
    pub price: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListToursQuery {
    pub fn into_filter(self) -> Result<ListToursFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let filter = ListToursFilter {
            search_terms: search_terms(self.search.as_deref()),
            location: non_blank(self.location.as_deref()).map(str::to_string),
            duration: number_param(&mut errors, "duration", self.duration.as_deref()),
            price: decimal_param(&mut errors, "price", self.price.as_deref()),
            ordering: parse_ordering(self.ordering.as_deref(), TourOrderingField::from_name),
            pagination: Pagination::parse(
                &mut errors,
                self.limit.as_deref(),
                self.offset.as_deref(),
            ),
            ..ListToursFilter::default()
        };

        errors.into_result(filter)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchToursQuery {
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchToursQuery {
    pub fn into_filter(self) -> Result<ListToursFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let filter = ListToursFilter {
            search_terms: non_blank(self.q.as_deref())
                .map(|q| vec![q.to_string()])
                .unwrap_or_default(),
            location_contains: non_blank(self.location.as_deref()).map(str::to_string),
            duration: number_param(&mut errors, "duration", self.duration.as_deref()),
            min_price: decimal_param(&mut errors, "min_price", self.min_price.as_deref()),
            max_price: decimal_param(&mut errors, "max_price", self.max_price.as_deref()),
            pagination: Pagination::parse(
                &mut errors,
                self.limit.as_deref(),
                self.offset.as_deref(),
            ),
            ..ListToursFilter::default()
        };

        errors.into_result(filter)
    }
}
