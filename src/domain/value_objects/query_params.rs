use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::value_objects::{enums::sort_order::SortOrder, validation::ValidationErrors};

pub const ENTER_NUMBER: &str = "Enter a number.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingTerm<F> {
    pub field: F,
    pub sort_order: SortOrder,
}

impl<F> OrderingTerm<F> {
    pub fn is_descending(&self) -> bool {
        self.sort_order == SortOrder::Desc
    }
}

/// Parses an `ordering=price,-created_at` style parameter. Unknown names are dropped.
pub fn parse_ordering<F>(raw: Option<&str>, lookup: impl Fn(&str) -> Option<F>) -> Vec<OrderingTerm<F>> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .filter_map(|term| {
            let (name, sort_order) = match term.strip_prefix('-') {
                Some(name) => (name, SortOrder::Desc),
                None => (term, SortOrder::Asc),
            };
            lookup(name).map(|field| OrderingTerm { field, sort_order })
        })
        .collect()
}

/// Splits free text into search terms on whitespace and commas.
pub fn search_terms(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.replace('\0', "")
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Wraps `term` for a `LIKE`/`ILIKE` substring match, escaping wildcard characters.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Treats an absent or blank parameter as "not supplied".
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

pub fn number_param<T: FromStr>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<T> {
    let raw = non_blank(raw)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, ENTER_NUMBER);
            None
        }
    }
}

pub fn decimal_param(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<Decimal> {
    let raw = non_blank(raw)?;
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, ENTER_NUMBER);
            None
        }
    }
}

pub fn bool_param(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<bool> {
    match non_blank(raw)? {
        "true" | "True" | "1" => Some(true),
        "false" | "False" | "0" => Some(false),
        _ => {
            errors.add(field, "Select a valid choice.");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn parse(errors: &mut ValidationErrors, limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: non_negative_param(errors, "limit", limit),
            offset: non_negative_param(errors, "offset", offset),
        }
    }
}

fn non_negative_param(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<i64> {
    let value = number_param::<i64>(errors, field, raw)?;
    if value < 0 {
        errors.add(field, "Ensure this value is greater than or equal to 0.");
        return None;
    }
    Some(value)
}
