//! Domain data structures for boroughs, garbage types, and district tonnage records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ports::QueryError;

/// The five boroughs of New York City.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Borough {
    /// The Bronx.
    Bronx,
    /// Queens.
    Queens,
    /// Staten Island.
    StatenIsland,
    /// Brooklyn.
    Brooklyn,
    /// Manhattan.
    Manhattan,
}

impl Borough {
    /// All boroughs in lookup order.
    pub const ALL: [Self; 5] = [
        Self::Bronx,
        Self::Queens,
        Self::StatenIsland,
        Self::Brooklyn,
        Self::Manhattan,
    ];

    /// Canonical spelling expected by the Socrata `borough` column.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bronx => "Bronx",
            Self::Queens => "Queens",
            Self::StatenIsland => "Staten Island",
            Self::Brooklyn => "Brooklyn",
            Self::Manhattan => "Manhattan",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Raised when a string names no known borough or garbage type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownName {
    kind: &'static str,
    value: String,
}

// Socrata filtering on the borough column is picky about casing, so accept any
// casing here and hand out the canonical name.
impl FromStr for Borough {
    type Err = UnknownName;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|borough| borough.name().to_uppercase() == wanted)
            .ok_or_else(|| UnknownName {
                kind: "borough",
                value: raw.to_owned(),
            })
    }
}

/// Waste streams tracked by the DSNY monthly tonnage dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GarbageType {
    /// Residual refuse.
    Refuse,
    /// Paper and cardboard recycling.
    Paper,
    /// Metal, glass, and plastic recycling.
    Mgp,
}

impl GarbageType {
    /// All garbage types in lookup order.
    pub const ALL: [Self; 3] = [Self::Refuse, Self::Paper, Self::Mgp];

    /// Upper-case token used on the command line and in reports.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Refuse => "REFUSE",
            Self::Paper => "PAPER",
            Self::Mgp => "MGP",
        }
    }
}

impl fmt::Display for GarbageType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.token())
    }
}

impl FromStr for GarbageType {
    type Err = UnknownName;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|garbage| garbage.token() == wanted)
            .ok_or_else(|| UnknownName {
                kind: "garbage type",
                value: raw.to_owned(),
            })
    }
}

/// Community districts are numbered within each borough from 1 up to this value.
pub const MAX_DISTRICT: i64 = 18;

/// Two-digit community district code as stored by the dataset (`"01"`..`"18"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DistrictCode(pub String);

impl DistrictCode {
    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code names a district between 1 and [`MAX_DISTRICT`].
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        self.0
            .parse::<i64>()
            .is_ok_and(|number| (1..=MAX_DISTRICT).contains(&number))
    }
}

impl fmt::Display for DistrictCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Calendar month a query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingMonth {
    /// Four-digit year.
    pub year: i32,
    /// Month of the year, 1-based.
    pub month: u32,
}

impl ReportingMonth {
    /// The only month this tool reports on.
    pub const JANUARY_2015: Self = Self {
        year: 2015,
        month: 1,
    };

    /// Value of the dataset's `month` column, e.g. `"2015 / 01"`.
    #[must_use]
    pub fn filter_value(self) -> String {
        format!("{} / {:02}", self.year, self.month)
    }

    /// Human-friendly label, e.g. `"January 2015"`.
    #[must_use]
    pub fn label(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).map_or_else(
            || self.filter_value(),
            |date| date.format("%B %Y").to_string(),
        )
    }
}

/// Fully normalized parameters of one remote query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// Borough in canonical form.
    pub borough: Borough,
    /// Waste stream whose tonnage is reported.
    pub garbage_type: GarbageType,
    /// Zero-padded district code.
    pub district: DistrictCode,
    /// Month the query is restricted to.
    pub month: ReportingMonth,
}

impl QueryFilter {
    /// Columns selected from the dataset.
    pub const FIELDS: [&'static str; 6] = [
        "month",
        "borough",
        "communitydistrict",
        "refusetonscollected",
        "papertonscollected",
        "mgptonscollected",
    ];

    /// Build a filter for the fixed reporting month.
    #[must_use]
    pub fn new(borough: Borough, garbage_type: GarbageType, district: DistrictCode) -> Self {
        Self {
            borough,
            garbage_type,
            district,
            month: ReportingMonth::JANUARY_2015,
        }
    }

    /// Field projection in SoQL `$select` form.
    #[must_use]
    pub fn select_clause() -> String {
        Self::FIELDS.join(", ")
    }
}

/// Row as returned by the remote dataset; every column is an optional string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Reporting month, e.g. `"2015 / 01"`.
    #[serde(default)]
    pub month: Option<String>,
    /// Borough name.
    #[serde(default)]
    pub borough: Option<String>,
    /// Community district code.
    #[serde(default)]
    pub communitydistrict: Option<String>,
    /// Refuse tonnage.
    #[serde(default)]
    pub refusetonscollected: Option<String>,
    /// Paper tonnage.
    #[serde(default)]
    pub papertonscollected: Option<String>,
    /// Metal/glass/plastic tonnage.
    #[serde(default)]
    pub mgptonscollected: Option<String>,
}

/// Monthly tonnage figures of one community district, keyed by its district code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRecord {
    /// Identity key of the record.
    #[serde(rename = "communitydistrict")]
    pub community_district: DistrictCode,
    /// Borough the district belongs to.
    pub borough: String,
    /// Refuse tonnage.
    #[serde(rename = "refusetonscollected")]
    pub refuse_tons_collected: f64,
    /// Paper tonnage.
    #[serde(rename = "papertonscollected")]
    pub paper_tons_collected: f64,
    /// Metal/glass/plastic tonnage.
    #[serde(rename = "mgptonscollected")]
    pub mgp_tons_collected: f64,
}

impl DistrictRecord {
    /// Tonnage collected for the given waste stream.
    #[must_use]
    pub fn tons(&self, garbage_type: GarbageType) -> f64 {
        match garbage_type {
            GarbageType::Refuse => self.refuse_tons_collected,
            GarbageType::Paper => self.paper_tons_collected,
            GarbageType::Mgp => self.mgp_tons_collected,
        }
    }
}

impl TryFrom<RawRow> for DistrictRecord {
    type Error = QueryError;

    /// Parse the string-typed tonnage columns. Socrata omits null columns, so an
    /// absent tonnage counts as zero; an absent key column makes the row unusable.
    fn try_from(row: RawRow) -> Result<Self, Self::Error> {
        let community_district = row
            .communitydistrict
            .ok_or(QueryError::MalformedRow("communitydistrict"))?;
        let borough = row.borough.ok_or(QueryError::MalformedRow("borough"))?;

        Ok(Self {
            community_district: DistrictCode(community_district),
            borough,
            refuse_tons_collected: parse_tons("refusetonscollected", row.refusetonscollected)?,
            paper_tons_collected: parse_tons("papertonscollected", row.papertonscollected)?,
            mgp_tons_collected: parse_tons("mgptonscollected", row.mgptonscollected)?,
        })
    }
}

/// Tonnages must be finite and non-negative; NaN would not survive a JSON round trip.
fn parse_tons(column: &'static str, raw: Option<String>) -> Result<f64, QueryError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let tons = trimmed.parse::<f64>()?;
    if tons.is_finite() && tons >= 0.0 {
        Ok(tons)
    } else {
        Err(QueryError::InvalidTonnage { column, value: raw })
    }
}
