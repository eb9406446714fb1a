//! Checks raw command line input and turns it into a [`QueryFilter`].

use std::num::{IntErrorKind, ParseIntError};

use crate::model::{Borough, DistrictCode, GarbageType, QueryFilter};

/// Every problem found in one set of arguments, in the order the checks ran.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .messages.join("\n"))]
pub struct ValidationError {
    /// Human-readable messages, never empty.
    pub messages: Vec<String>,
}

/// Validate the borough, garbage type, and district arguments.
///
/// All checks run; failures are collected rather than returned on the first one.
/// Blank arguments count as missing. Districts outside 1..=18 are accepted as-is;
/// see [`DistrictCode::is_in_range`].
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every failed check.
pub fn validate(
    borough: Option<&str>,
    garbage_type: Option<&str>,
    district: Option<&str>,
) -> Result<QueryFilter, ValidationError> {
    let borough = present(borough);
    let garbage_type = present(garbage_type);
    let district = present(district);

    let mut messages = Vec::new();

    if borough.is_none() || garbage_type.is_none() || district.is_none() {
        messages.push(
            "A valid borough, garbage type, and district number must be provided to make an API query."
                .to_owned(),
        );
    }

    let parsed_borough = borough.map(str::parse::<Borough>).transpose();
    if parsed_borough.is_err() {
        messages.push("Borough not recognized.".to_owned());
    }

    let parsed_type = garbage_type.map(str::parse::<GarbageType>).transpose();
    if parsed_type.is_err() {
        messages.push("Type of garbage not recognized.".to_owned());
    }

    let parsed_district = district.map(parse_district).transpose();
    if parsed_district.is_err() {
        messages.push("District should be a number in the range [01-18].".to_owned());
    }

    match (parsed_borough, parsed_type, parsed_district, district) {
        (Ok(Some(borough)), Ok(Some(garbage_type)), Ok(Some(number)), Some(raw))
            if messages.is_empty() =>
        {
            Ok(QueryFilter::new(
                borough,
                garbage_type,
                pad_district(raw, number),
            ))
        }
        _ => Err(ValidationError { messages }),
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Integers too wide for `i64` are still integers; they saturate and count as out of range.
fn parse_district(raw: &str) -> Result<i64, ParseIntError> {
    match raw.parse::<i64>() {
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(error) if *error.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        parsed => parsed,
    }
}

/// The dataset stores single-digit districts with a leading zero.
fn pad_district(raw: &str, number: i64) -> DistrictCode {
    if (0..10).contains(&number) && !raw.starts_with('0') {
        DistrictCode(format!("{number:02}"))
    } else {
        DistrictCode(raw.to_owned())
    }
}
