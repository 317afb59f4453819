//! The dashboard session: one synthetic table, many renders.
//!
//! RULES:
//!   - The table is generated exactly once, in `Dashboard::new`.
//!   - Every render reads the same immutable table; a widget change
//!     recomputes the whole figure from scratch.
//!   - All randomness flows through the RngBank seeded at construction.

use crate::{
    chart::{build_figure, Figure, LabelMode},
    config::DashboardConfig,
    error::DashResult,
    filter::{filter_records, CustomerSelection, DateRange},
    rng::RngBank,
    synth::Synthesizer,
    table::ActivityTable,
    types::{CustomerId, Day, SessionId},
};
use serde::{Deserialize, Serialize};

/// Current widget values. Missing dates fall back to the table bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControlState {
    pub customer:   CustomerSelection,
    pub start:      Option<Day>,
    pub end:        Option<Day>,
    pub label_mode: LabelMode,
}

/// One entry in the customer dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOption {
    pub label: String,
    /// Empty for the "all customers" entry.
    pub value: String,
}

/// Static description of the UI surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub session_id:       SessionId,
    pub title:            String,
    pub instructions:     Option<String>,
    pub customer_options: Vec<CustomerOption>,
    /// Picker bounds. None when the table is empty.
    pub date_min:         Option<Day>,
    pub date_max:         Option<Day>,
    pub label_mode:       LabelMode,
}

pub struct Dashboard {
    pub session_id: SessionId,
    config:         DashboardConfig,
    seed:           u64,
    table:          ActivityTable,
}

impl Dashboard {
    /// Generate the session table from `config` and `seed`.
    pub fn new(config: DashboardConfig, seed: u64) -> DashResult<Self> {
        let bank = RngBank::new(seed);
        let table = Synthesizer::new(&config).generate(&bank)?;
        let session_id = uuid::Uuid::new_v4().to_string();
        log::info!("session {session_id}: seed={seed} rows={}", table.len());
        Ok(Self {
            session_id,
            config,
            seed,
            table,
        })
    }

    /// Session over a prepared table. Used by tests and tooling.
    pub fn with_table(config: DashboardConfig, table: ActivityTable) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            config,
            seed: 0,
            table,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &ActivityTable {
        &self.table
    }

    /// Blank "all" option first, then customers in first-seen order.
    pub fn customer_options(&self) -> Vec<CustomerOption> {
        let mut options = vec![CustomerOption {
            label: "All customers".into(),
            value: String::new(),
        }];
        options.extend(self.table.customers().into_iter().map(|id: CustomerId| {
            CustomerOption {
                label: id.clone(),
                value: id,
            }
        }));
        options
    }

    pub fn date_bounds(&self) -> Option<(Day, Day)> {
        self.table.date_bounds()
    }

    /// Control state the page opens with.
    pub fn initial_controls(&self) -> ControlState {
        ControlState {
            label_mode: self.config.label_mode,
            ..ControlState::default()
        }
    }

    pub fn page(&self) -> PageLayout {
        let bounds = self.date_bounds();
        PageLayout {
            session_id:       self.session_id.clone(),
            title:            self.config.title.clone(),
            instructions:     self.config.instructions.clone(),
            customer_options: self.customer_options(),
            date_min:         bounds.map(|(lo, _)| lo),
            date_max:         bounds.map(|(_, hi)| hi),
            label_mode:       self.config.label_mode,
        }
    }

    /// Recompute the figure for the given widget values.
    pub fn render(&self, controls: &ControlState) -> DashResult<Figure> {
        let Some(range) = self.resolve_range(controls)? else {
            log::debug!("render: no rows can match, axes only");
            return Ok(build_figure(&[], &controls.customer, controls.label_mode));
        };

        let rows = filter_records(&self.table, &controls.customer, &range);
        let figure = build_figure(&rows, &controls.customer, controls.label_mode);
        log::debug!(
            "render customer={:?} range={}..={} rows={} segments={}",
            controls.customer.customer_id(),
            range.start(),
            range.end(),
            rows.len(),
            figure.segment_count()
        );
        Ok(figure)
    }

    /// Fill missing ends from the table bounds. None means nothing can
    /// match: an empty table, or a single explicit end that lies past
    /// the opposite bound of the data. Only two explicit, inverted ends
    /// are an error.
    fn resolve_range(&self, controls: &ControlState) -> DashResult<Option<DateRange>> {
        let bounds = self.date_bounds();
        let start = controls.start.or(bounds.map(|(lo, _)| lo));
        let end = controls.end.or(bounds.map(|(_, hi)| hi));
        let (Some(start), Some(end)) = (start, end) else {
            return Ok(None);
        };

        let both_explicit = controls.start.is_some() && controls.end.is_some();
        if start > end && !both_explicit {
            return Ok(None);
        }
        Ok(Some(DateRange::new(start, end)?))
    }
}
