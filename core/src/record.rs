//! The single row type of the activity table.

use crate::types::{CustomerId, Day, SegmentIndex};
use serde::{Deserialize, Serialize};

/// Customer status on a given day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
    Undefined,
}

impl Status {
    /// Draw order for the synthesizer. Never reorder.
    pub const ALL: [Status; 3] = [Status::Active, Status::Inactive, Status::Undefined];

    /// Y-axis position: active=2, inactive=1, undefined=0.
    pub fn numeric(&self) -> u8 {
        match self {
            Self::Active    => 2,
            Self::Inactive  => 1,
            Self::Undefined => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active    => "active",
            Self::Inactive  => "inactive",
            Self::Undefined => "undefined",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub date:           Day,
    pub activity_label: String,
    pub status:         Status,
    pub customer_id:    CustomerId,
    pub is_key_event:   bool,
    /// Derived from `status` at load time.
    pub status_numeric: u8,
    /// Chronological third of this customer's records. See `segment.rs`.
    pub segment:        SegmentIndex,
}
