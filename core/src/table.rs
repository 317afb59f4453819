//! The immutable in-memory activity table.
//!
//! RULE: A table is built once and never mutated afterwards.
//! Derived columns (status_numeric, segment) are computed here,
//! at construction, and nowhere else.

use crate::{
    record::{ActivityRecord, Status},
    segment::assign_segments,
    types::{CustomerId, Day},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTable {
    records: Vec<ActivityRecord>,
}

/// A raw row before derived columns are filled in.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub date:           Day,
    pub activity_label: String,
    pub status:         Status,
    pub customer_id:    CustomerId,
    pub is_key_event:   bool,
}

impl ActivityTable {
    /// Build a table from raw rows, deriving numeric status and segments.
    /// Rows are ordered by date; equal dates keep input order.
    pub fn from_raw(rows: Vec<RawRecord>) -> Self {
        let mut records: Vec<ActivityRecord> = rows
            .into_iter()
            .map(|r| ActivityRecord {
                status_numeric: r.status.numeric(),
                date:           r.date,
                activity_label: r.activity_label,
                status:         r.status,
                customer_id:    r.customer_id,
                is_key_event:   r.is_key_event,
                segment:        0,
            })
            .collect();
        records.sort_by_key(|r| r.date);
        assign_segments(&mut records);
        Self { records }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique customer ids in order of first appearance.
    pub fn customers(&self) -> Vec<CustomerId> {
        let mut seen: Vec<CustomerId> = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.customer_id) {
                seen.push(r.customer_id.clone());
            }
        }
        seen
    }

    /// (min, max) date over the whole table. None when empty.
    pub fn date_bounds(&self) -> Option<(Day, Day)> {
        let first = self.records.first()?.date;
        let last = self.records.last()?.date;
        Some((first, last))
    }

    pub fn records_for<'a>(
        &'a self,
        customer_id: &'a str,
    ) -> impl Iterator<Item = &'a ActivityRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.customer_id == customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(day: u32, customer: &str) -> RawRecord {
        RawRecord {
            date:           NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            activity_label: "ABCDEFG".into(),
            status:         Status::Inactive,
            customer_id:    customer.into(),
            is_key_event:   false,
        }
    }

    #[test]
    fn from_raw_sorts_and_derives() {
        let table = ActivityTable::from_raw(vec![raw(3, "b"), raw(1, "a"), raw(2, "a")]);
        let dates: Vec<u32> = table
            .records()
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert!(table.records().iter().all(|r| r.status_numeric == 1));
        assert_eq!(table.customers(), vec!["a".to_string(), "b".to_string()]);
        // "a" has two records → bins 0 and 2, "b" one record → bin 1
        let segs: Vec<u8> = table.records().iter().map(|r| r.segment).collect();
        assert_eq!(segs, vec![0, 2, 1]);
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let table = ActivityTable::from_raw(vec![]);
        assert!(table.is_empty());
        assert!(table.date_bounds().is_none());
        assert!(table.customers().is_empty());
    }
}
