//! Segment assignment: each customer's records split into three
//! chronological bins.
//!
//! Bins are equal-width over record *position* (0..n-1), not over the
//! calendar span. Bin edges sit at (n-1)/3 and 2(n-1)/3, each bin closed
//! on the right, the first bin also closed on the left. Comparisons are
//! done in integers so boundary positions never flip on rounding.
//!
//! A lone record lands in the middle bin and two records land in bins
//! 0 and 2. Unused labels are accepted, not corrected.

use crate::{
    record::ActivityRecord,
    types::{CustomerId, SegmentIndex},
};
use std::collections::HashMap;

/// Segment of the record at `position` among `count` chronologically
/// sorted records of one customer.
pub fn segment_for_position(position: usize, count: usize) -> SegmentIndex {
    debug_assert!(position < count, "position {position} outside 0..{count}");
    if count == 1 {
        return 1;
    }
    let scaled = 3 * position as u64;
    let span = (count - 1) as u64;
    if scaled <= span {
        0
    } else if scaled <= 2 * span {
        1
    } else {
        2
    }
}

/// Overwrite `segment` on every record, per customer.
///
/// Records of one customer are ordered by date; equal dates keep their
/// input order, so the result is stable for a deterministic input.
pub fn assign_segments(records: &mut [ActivityRecord]) {
    let mut by_customer: HashMap<CustomerId, Vec<usize>> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        by_customer
            .entry(record.customer_id.clone())
            .or_default()
            .push(idx);
    }

    for indices in by_customer.values_mut() {
        indices.sort_by_key(|&i| records[i].date);
        let count = indices.len();
        for (position, &idx) in indices.iter().enumerate() {
            records[idx].segment = segment_for_position(position, count);
        }
    }
}
