//! Row selection for the chart: customer selector plus an inclusive
//! date window.

use crate::{
    error::{DashError, DashResult},
    record::ActivityRecord,
    table::ActivityTable,
    types::{CustomerId, Day},
};
use serde::{Deserialize, Serialize};

/// Dropdown value. A blank selection means every customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSelection {
    #[default]
    All,
    Customer(CustomerId),
}

impl CustomerSelection {
    /// Map a raw widget value. `None`, blank and `"all"` select everyone.
    pub fn from_widget(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(id) => Self::Customer(id.to_string()),
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Customer(id) => Some(id),
        }
    }

    pub fn matches(&self, record: &ActivityRecord) -> bool {
        match self {
            Self::All => true,
            Self::Customer(id) => record.customer_id == *id,
        }
    }
}

/// Closed interval [start, end] over calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Day,
    end:   Day,
}

impl DateRange {
    pub fn new(start: Day, end: Day) -> DashResult<Self> {
        if start > end {
            return Err(DashError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Day {
        self.start
    }

    pub fn end(&self) -> Day {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Records matching `selection` inside `range`, in table (date) order.
pub fn filter_records<'a>(
    table: &'a ActivityTable,
    selection: &CustomerSelection,
    range: &DateRange,
) -> Vec<&'a ActivityRecord> {
    table
        .records()
        .iter()
        .filter(|r| selection.matches(r) && range.contains(r.date))
        .collect()
}
