//! # Field Matching Module
//!
//! ## Purpose
//! Exact-match predicates over an entry's secondary fields: address, birth
//! date, and identification numbers. One secondary-field match is sufficient
//! corroboration on its own, with or without a name score.
//!
//! ## Input/Output Specification
//! - **Input**: Watchlist entry, screening query
//! - **Output**: Per-field match verdicts and their logical OR
//! - **Missing data**: an absent field on either side is "no match for that
//!   predicate", never an error

use crate::normalize::normalize_identifier;
use crate::{Entry, ScreeningQuery};

/// Compare an optional entry field against a query value, case-insensitively.
fn field_eq(entry_field: Option<&str>, query_value: &str) -> bool {
    entry_field.is_some_and(|v| v.eq_ignore_ascii_case(query_value))
}

/// Check whether the query matches one of the entry's addresses.
///
/// The query must supply all five of address, city, country, postal code,
/// and state; otherwise no address match is attempted. Each field is exact
/// string equality, case-insensitive, with no further normalization.
pub fn matches_address(entry: &Entry, query: &ScreeningQuery) -> bool {
    let (Some(address), Some(city), Some(country), Some(postal_code), Some(state)) = (
        query.address.as_deref(),
        query.city.as_deref(),
        query.country.as_deref(),
        query.postal_code.as_deref(),
        query.state.as_deref(),
    ) else {
        return false;
    };

    entry.addresses.iter().any(|addr| {
        field_eq(addr.address.as_deref(), address)
            && field_eq(addr.city.as_deref(), city)
            && field_eq(addr.country.as_deref(), country)
            && field_eq(addr.postal_code.as_deref(), postal_code)
            && field_eq(addr.state.as_deref(), state)
    })
}

/// Check whether the query's birth date equals any of the entry's
/// date-of-birth strings.
///
/// Exact, case-sensitive string equality; no date parsing, so "1948" does
/// not match "1948-03-02".
pub fn matches_birth_date(entry: &Entry, query: &ScreeningQuery) -> bool {
    let Some(birthdate) = query.birthdate.as_deref() else {
        return false;
    };

    entry.dates_of_birth.iter().any(|dob| dob == birthdate)
}

/// Check whether the query's identification number or tax identifier equals
/// any of the entry's id numbers after normalization.
///
/// Either identifier is sufficient; both sides are stripped to
/// alphanumerics and compared case-insensitively. Identifiers that
/// normalize to empty never match.
pub fn matches_identifier(entry: &Entry, query: &ScreeningQuery) -> bool {
    let id_number = query
        .id_number
        .as_deref()
        .map(normalize_identifier)
        .filter(|s| !s.is_empty());
    let tax_id = query
        .ssn
        .as_deref()
        .map(normalize_identifier)
        .filter(|s| !s.is_empty());

    if id_number.is_none() && tax_id.is_none() {
        return false;
    }

    entry.ids.iter().any(|id| {
        let Some(number) = id.number.as_deref() else {
            return false;
        };
        let number = normalize_identifier(number);
        if number.is_empty() {
            return false;
        }

        id_number
            .as_deref()
            .is_some_and(|q| number.eq_ignore_ascii_case(q))
            || tax_id
                .as_deref()
                .is_some_and(|q| number.eq_ignore_ascii_case(q))
    })
}

/// Logical OR of the three secondary-field predicates.
pub fn matches_any(entry: &Entry, query: &ScreeningQuery) -> bool {
    matches_address(entry, query) || matches_birth_date(entry, query) || matches_identifier(entry, query)
}
