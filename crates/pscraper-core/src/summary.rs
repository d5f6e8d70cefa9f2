//! Per-dealer and per-manufacturer aggregation over the master listing table.
//!
//! The master table holds one row per listing ever seen: the dealer name, how
//! many days the listing has been up, its price, its make, and the date it was
//! last observed. A listing whose `last_seen` is not today has dropped off the
//! marketplace and is counted as sold.
//!
//! Everything here is pure: rows in, statistics out. Reading the table is
//! limited to JSON Lines parsing via [`parse_master_table`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the persisted master table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterRow {
    /// Dealer (seller) name.
    pub name: String,
    pub duration_days: u32,
    pub price: Option<f64>,
    pub make: String,
    pub last_seen: NaiveDate,
}

/// Which rows take part in an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryScope {
    All,
    /// Rows whose `last_seen` differs from `today`.
    Sold { today: NaiveDate },
}

impl SummaryScope {
    fn includes(self, row: &MasterRow) -> bool {
        match self {
            SummaryScope::All => true,
            SummaryScope::Sold { today } => row.last_seen != today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerStats {
    pub count: u32,
    pub avg_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerStats {
    pub count: u32,
    pub avg_price: f64,
    pub avg_duration: f64,
}

/// Dealer and manufacturer statistics for both scopes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub dealers_all: BTreeMap<String, DealerStats>,
    pub manufacturers_all: BTreeMap<String, ManufacturerStats>,
    pub dealers_sold: BTreeMap<String, DealerStats>,
    pub manufacturers_sold: BTreeMap<String, ManufacturerStats>,
}

impl Summary {
    #[must_use]
    pub fn build(rows: &[MasterRow], today: NaiveDate) -> Self {
        let sold = SummaryScope::Sold { today };
        Self {
            dealers_all: dealer_summary(rows, SummaryScope::All),
            manufacturers_all: manufacturer_summary(rows, SummaryScope::All),
            dealers_sold: dealer_summary(rows, sold),
            manufacturers_sold: manufacturer_summary(rows, sold),
        }
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("invalid master table row on line {line}: {source}")]
    InvalidRow {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses a JSON Lines master table. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`SummaryError::InvalidRow`] with the 1-based line number of the
/// first row that does not decode into a [`MasterRow`].
pub fn parse_master_table(text: &str) -> Result<Vec<MasterRow>, SummaryError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| SummaryError::InvalidRow {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Listing count and average listing duration per dealer.
#[must_use]
pub fn dealer_summary(rows: &[MasterRow], scope: SummaryScope) -> BTreeMap<String, DealerStats> {
    let mut totals: BTreeMap<String, (u32, f64)> = BTreeMap::new();
    for row in rows.iter().filter(|r| scope.includes(r)) {
        let entry = totals.entry(row.name.clone()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += f64::from(row.duration_days);
    }

    totals
        .into_iter()
        .map(|(name, (count, duration))| {
            let stats = DealerStats {
                count,
                avg_duration: round2(average(duration, count)),
            };
            (name, stats)
        })
        .collect()
}

/// Listing count, average price, and average duration per make.
///
/// Rows without a price (or with a zero price) are left out entirely, so a
/// make's count only reflects priced listings.
#[must_use]
pub fn manufacturer_summary(
    rows: &[MasterRow],
    scope: SummaryScope,
) -> BTreeMap<String, ManufacturerStats> {
    let mut totals: BTreeMap<String, (u32, f64, f64)> = BTreeMap::new();
    for row in rows.iter().filter(|r| scope.includes(r)) {
        let Some(price) = row.price.filter(|p| *p != 0.0) else {
            continue;
        };
        let entry = totals.entry(row.make.clone()).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += price;
        entry.2 += f64::from(row.duration_days);
    }

    totals
        .into_iter()
        .map(|(make, (count, price, duration))| {
            let stats = ManufacturerStats {
                count,
                avg_price: round2(average(price, count)),
                avg_duration: round2(average(duration, count)),
            };
            (make, stats)
        })
        .collect()
}

fn average(total: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / f64::from(count)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
