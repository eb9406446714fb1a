//! Human-readable tonnage summaries.

use crate::model::{DistrictRecord, QueryFilter};

/// Round a tonnage to whole tons, half to even.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "monthly district tonnages are far below i64::MAX"
)]
pub fn round_tons(tons: f64) -> i64 {
    tons.round_ties_even() as i64
}

/// Report the requested tonnage of one district; a missing record reports zero tons.
#[must_use]
pub fn report_single(filter: &QueryFilter, record: Option<&DistrictRecord>) -> String {
    let tons = record.map_or(0, |found| round_tons(found.tons(filter.garbage_type)));
    format!(
        "{} collected in {} in district {} during {}: \n{tons} tons",
        filter.garbage_type,
        filter.borough,
        filter.district,
        filter.month.label(),
    )
}

/// Sum refuse, paper, and mgp over all records, rounding each figure first.
#[must_use]
pub fn total_tons<I>(records: I) -> i64
where
    I: IntoIterator<Item = DistrictRecord>,
{
    records
        .into_iter()
        .map(|record| {
            round_tons(record.refuse_tons_collected)
                + round_tons(record.paper_tons_collected)
                + round_tons(record.mgp_tons_collected)
        })
        .sum()
}

/// Report the combined tonnage of every stored district.
#[must_use]
pub fn report_total<I>(records: I) -> String
where
    I: IntoIterator<Item = DistrictRecord>,
{
    format!(
        "Total garbage (refuse, paper, mgp) collected in all districts queried: {} tons",
        total_tons(records)
    )
}
