//! Data synthesizer: one synthetic activity row per day.
//!
//! Every column is drawn independently from its own RNG stream, so the
//! customer assignment of day 17 never depends on how long day 16's
//! label was.

use crate::{
    config::DashboardConfig,
    error::DashResult,
    record::Status,
    rng::{ColumnRng, ColumnSlot, RngBank},
    table::{ActivityTable, RawRecord},
};

pub struct Synthesizer<'a> {
    config: &'a DashboardConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    /// Generate `config.rows` rows starting at `config.epoch`.
    pub fn generate(&self, bank: &RngBank) -> DashResult<ActivityTable> {
        self.config.validate()?;

        let n = self.config.rows;
        let mut label_rng = bank.for_column(ColumnSlot::ActivityLabel);
        let mut status_rng = bank.for_column(ColumnSlot::Status);
        let mut customer_rng = bank.for_column(ColumnSlot::CustomerId);
        let mut key_rng = bank.for_column(ColumnSlot::KeyEvent);

        let mut rows = Vec::with_capacity(n);
        for (offset, date) in self.config.epoch.iter_days().take(n).enumerate() {
            let customer_id = customer_rng
                .pick(&self.config.customer_pool)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("empty customer pool at row {offset}"))?;
            let status = *status_rng
                .pick(&Status::ALL)
                .ok_or_else(|| anyhow::anyhow!("no statuses to draw from"))?;

            rows.push(RawRecord {
                date,
                activity_label: self.activity_label(&mut label_rng),
                status,
                customer_id,
                is_key_event: key_rng.chance(self.config.key_event_probability),
            });
        }

        let table = ActivityTable::from_raw(rows);
        log::info!(
            "synth seed={}: generated {} rows across {} customers",
            bank.master_seed(),
            table.len(),
            table.customers().len()
        );
        Ok(table)
    }

    fn activity_label(&self, rng: &mut ColumnRng) -> String {
        let len = rng.between_inclusive(self.config.label_len_min, self.config.label_len_max);
        (0..len).map(|_| rng.uppercase_letter()).collect()
    }
}
