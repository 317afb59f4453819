use crate::{
    chart::LabelMode,
    error::{DashError, DashResult},
    types::{CustomerId, Day},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROWS: usize = 100;
/// Upper bound on generated rows. The table lives in memory and is
/// re-rendered in full on every interaction.
pub const MAX_ROWS: usize = 10_000;
pub const MAX_LABEL_LEN: usize = 64;
pub const DEFAULT_TITLE: &str = "Filter Chart by Customer ID";
pub const DEFAULT_INSTRUCTIONS: &str =
    "Pick a customer (leave blank for all customers) and a date range. \
     Shaded bands mark each customer's three chronological segments; \
     labels are shown on key events unless all labels are enabled.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// One row per day.
    pub rows: usize,
    /// First day of the daily sequence.
    pub epoch: Day,
    pub customer_pool: Vec<CustomerId>,
    pub label_len_min: usize,
    pub label_len_max: usize,
    pub key_event_probability: f64,
    pub label_mode: LabelMode,
    pub title: String,
    /// None hides the instructions panel.
    pub instructions: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rows:                  DEFAULT_ROWS,
            epoch:                 default_epoch(),
            customer_pool:         (1..=3).map(|i| format!("cust_{i}")).collect(),
            label_len_min:         7,
            label_len_max:         10,
            key_event_probability: 0.2,
            label_mode:            LabelMode::KeyEventsOnly,
            title:                 DEFAULT_TITLE.into(),
            instructions:          Some(DEFAULT_INSTRUCTIONS.into()),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Small deterministic config for tests: 30 rows, fixed pool.
    pub fn default_test() -> Self {
        Self {
            rows: 30,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.customer_pool.is_empty() {
            return Err(invalid("customer_pool must not be empty"));
        }
        if self.customer_pool.iter().any(|c| c.trim().is_empty() || c == "all") {
            return Err(invalid("customer ids must be non-blank and not 'all'"));
        }
        if self.label_len_min == 0 {
            return Err(invalid("label_len_min must be > 0"));
        }
        if self.rows > MAX_ROWS {
            return Err(DashError::InvalidConfig {
                reason: format!("rows must be <= {MAX_ROWS}, got {}", self.rows),
            });
        }
        if self.label_len_max > MAX_LABEL_LEN {
            return Err(DashError::InvalidConfig {
                reason: format!(
                    "label_len_max must be <= {MAX_LABEL_LEN}, got {}",
                    self.label_len_max
                ),
            });
        }
        if self.label_len_min > self.label_len_max {
            return Err(invalid("label_len_min must be <= label_len_max"));
        }
        if !(0.0..=1.0).contains(&self.key_event_probability) {
            return Err(invalid("key_event_probability must be within [0, 1]"));
        }
        if self.rows > 0 && self.last_day().is_none() {
            return Err(invalid("rows overflow the calendar from epoch"));
        }
        Ok(())
    }

    /// Last day of the generated sequence, if any rows are generated.
    pub fn last_day(&self) -> Option<Day> {
        let span = self.rows.checked_sub(1)?;
        self.epoch.checked_add_days(chrono::Days::new(span as u64))
    }
}

fn default_epoch() -> Day {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn invalid(reason: &str) -> DashError {
    DashError::InvalidConfig {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        DashboardConfig::default().validate().unwrap();
        assert_eq!(DashboardConfig::default().epoch.to_string(), "2023-01-01");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "rows": 12, "label_mode": "always" }"#).unwrap();
        assert_eq!(config.rows, 12);
        assert_eq!(config.label_mode, LabelMode::Always);
        assert_eq!(config.customer_pool.len(), 3);
    }

    #[test]
    fn rejects_inverted_label_lengths() {
        let config = DashboardConfig {
            label_len_min: 11,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DashError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_empty_pool_and_bad_probability() {
        let empty = DashboardConfig {
            customer_pool: vec![],
            ..DashboardConfig::default()
        };
        assert!(empty.validate().is_err());

        let bad_p = DashboardConfig {
            key_event_probability: 1.5,
            ..DashboardConfig::default()
        };
        assert!(bad_p.validate().is_err());
    }

    #[test]
    fn rejects_oversized_tables_and_labels() {
        let too_many = DashboardConfig {
            rows: MAX_ROWS + 1,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(DashError::InvalidConfig { .. })
        ));

        let at_limit = DashboardConfig {
            rows: MAX_ROWS,
            ..DashboardConfig::default()
        };
        at_limit.validate().unwrap();

        let long_labels = DashboardConfig {
            label_len_max: MAX_LABEL_LEN + 1,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            long_labels.validate(),
            Err(DashError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn last_day_spans_rows() {
        let config = DashboardConfig::default();
        assert_eq!(config.last_day().unwrap().to_string(), "2023-04-10");
        let empty = DashboardConfig {
            rows: 0,
            ..DashboardConfig::default()
        };
        assert!(empty.last_day().is_none());
    }
}
