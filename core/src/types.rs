//! Shared primitive types used across the dashboard.

use chrono::NaiveDate;

/// A calendar day. One table row = one day.
pub type Day = NaiveDate;

/// A customer identifier such as `cust_2`.
pub type CustomerId = String;

/// The canonical session identifier.
pub type SessionId = String;

/// Segment index in `0..SEGMENT_COUNT`.
pub type SegmentIndex = u8;

/// Number of chronological bins each customer is split into.
pub const SEGMENT_COUNT: usize = 3;
