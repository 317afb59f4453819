//! Chart builder: filtered records → one Plotly-compatible figure.
//!
//! The figure is plain data. Serializing it with serde_json yields the
//! `{ "data": [...], "layout": {...} }` object that Plotly.js accepts
//! directly in `Plotly.newPlot` / `Plotly.react`.
//!
//! Layout rules:
//!   - One line+marker trace of status_numeric over date.
//!   - Up to SEGMENT_COUNT background rectangles, one per segment
//!     observed in the filtered rows, spanning that segment's min/max
//!     date within those rows.
//!   - Y ticks are fixed at 0/1/2 regardless of what is plotted.
//!   - No rows → no trace and no bands, axes still configured.

use crate::{
    error::{DashError, DashResult},
    filter::CustomerSelection,
    record::{ActivityRecord, Status},
    types::{Day, SegmentIndex, SEGMENT_COUNT},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const Y_TICK_VALS: [u8; 3] = [0, 1, 2];
pub const CHART_HEIGHT: u32 = 600;
pub const MARKER_SIZE: u32 = 8;
pub const LINE_COLOR: &str = "#333333";
pub const LINE_WIDTH: u32 = 2;
pub const KEY_EVENT_COLOR: &str = "red";
pub const REGULAR_EVENT_COLOR: &str = "blue";
pub const SEGMENT_COLORS: [&str; SEGMENT_COUNT] = ["#1f77b4", "#ff7f0e", "#2ca02c"];
pub const SEGMENT_OPACITY: f64 = 0.15;

/// Tick labels, index-aligned with `Y_TICK_VALS`.
pub fn y_tick_text() -> Vec<String> {
    let mut by_value = Status::ALL;
    by_value.sort_by_key(|s| s.numeric());
    by_value.iter().map(|s| s.label().to_string()).collect()
}

/// Which points carry their activity label as text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    Always,
    #[default]
    KeyEventsOnly,
}

impl LabelMode {
    pub fn shows(&self, record: &ActivityRecord) -> bool {
        match self {
            Self::Always        => true,
            Self::KeyEventsOnly => record.is_key_event,
        }
    }
}

impl FromStr for LabelMode {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "always" | "all" => Ok(Self::Always),
            "key-events" | "key_events" | "key_events_only" => Ok(Self::KeyEventsOnly),
            other => Err(DashError::UnknownLabelMode {
                mode: other.to_string(),
            }),
        }
    }
}

// ── Figure model ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Figure {
    pub data:   Vec<ScatterTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind:         String,
    pub x:            Vec<Day>,
    pub y:            Vec<u8>,
    pub mode:         String,
    pub text:         Vec<String>,
    pub textposition: String,
    /// Full activity labels, shown on hover even when `text` is blank.
    pub hovertext:    Vec<String>,
    /// Segment index of each point, so a client can rebuild the bands
    /// for a narrower window without another round trip.
    pub customdata:   Vec<SegmentIndex>,
    pub marker:       Marker,
    pub line:         Line,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub size:  u32,
    pub color: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub title:      Title,
    pub xaxis:      XAxis,
    pub yaxis:      YAxis,
    pub shapes:     Vec<Shape>,
    pub height:     u32,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct XAxis {
    pub title:         Title,
    #[serde(rename = "type")]
    pub kind:          String,
    pub rangeslider:   RangeSlider,
    pub rangeselector: RangeSelector,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeSelector {
    pub buttons: Vec<RangeButton>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count:    Option<u32>,
    pub label:    String,
    pub step:     String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<String>,
}

impl RangeButton {
    fn days_back(count: u32, label: &str) -> Self {
        Self {
            count:    Some(count),
            label:    label.into(),
            step:     "day".into(),
            stepmode: Some("backward".into()),
        }
    }

    fn all() -> Self {
        Self {
            count:    None,
            label:    "All".into(),
            step:     "all".into(),
            stepmode: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YAxis {
    pub title:    Title,
    pub tickvals: Vec<u8>,
    pub ticktext: Vec<String>,
    /// Padded so the top-center labels of `active` points stay visible.
    pub range:    [f64; 2],
}

/// A background band for one segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind:      String,
    pub name:      String,
    pub xref:      String,
    pub yref:      String,
    pub x0:        Day,
    pub x1:        Day,
    pub y0:        f64,
    pub y1:        f64,
    pub fillcolor: String,
    pub opacity:   f64,
    pub layer:     String,
    pub line:      ShapeLine,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShapeLine {
    pub width: u32,
}

impl Figure {
    /// Number of plotted points across all traces.
    pub fn point_count(&self) -> usize {
        self.data.iter().map(|t| t.x.len()).sum()
    }

    /// Number of background segment bands.
    pub fn segment_count(&self) -> usize {
        self.layout.shapes.len()
    }

    pub fn to_json(&self) -> DashResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ── Builder ───────────────────────────────────────────────────

/// Build the figure for already-filtered rows (in date order).
pub fn build_figure(
    rows: &[&ActivityRecord],
    selection: &CustomerSelection,
    label_mode: LabelMode,
) -> Figure {
    let data = if rows.is_empty() {
        Vec::new()
    } else {
        vec![status_trace(rows, label_mode)]
    };

    Figure {
        data,
        layout: Layout {
            title:      Title::new(chart_title(selection)),
            xaxis:      date_axis(),
            yaxis:      status_axis(),
            shapes:     segment_bands(rows),
            height:     CHART_HEIGHT,
            showlegend: false,
        },
    }
}

pub fn chart_title(selection: &CustomerSelection) -> String {
    match selection.customer_id() {
        Some(id) => format!("Activity Chart for Customer: {id}"),
        None => "Activity Chart".into(),
    }
}

fn status_trace(rows: &[&ActivityRecord], label_mode: LabelMode) -> ScatterTrace {
    let text: Vec<String> = rows
        .iter()
        .map(|r| {
            if label_mode.shows(r) {
                r.activity_label.clone()
            } else {
                String::new()
            }
        })
        .collect();
    let any_text = text.iter().any(|t| !t.is_empty());

    ScatterTrace {
        kind:         "scatter".into(),
        x:            rows.iter().map(|r| r.date).collect(),
        y:            rows.iter().map(|r| r.status_numeric).collect(),
        mode:         (if any_text { "markers+text+lines" } else { "markers+lines" }).into(),
        text,
        textposition: "top center".into(),
        hovertext:    rows.iter().map(|r| r.activity_label.clone()).collect(),
        customdata:   rows.iter().map(|r| r.segment).collect(),
        marker: Marker {
            size:  MARKER_SIZE,
            color: rows
                .iter()
                .map(|r| {
                    let color = if r.is_key_event { KEY_EVENT_COLOR } else { REGULAR_EVENT_COLOR };
                    color.to_string()
                })
                .collect(),
        },
        line: Line {
            color: LINE_COLOR.into(),
            width: LINE_WIDTH,
        },
    }
}

fn date_axis() -> XAxis {
    XAxis {
        title:         Title::new("Date"),
        kind:          "date".into(),
        rangeslider:   RangeSlider { visible: true },
        rangeselector: RangeSelector {
            buttons: vec![
                RangeButton::days_back(7, "1w"),
                RangeButton::days_back(30, "1m"),
                RangeButton::days_back(90, "3m"),
                RangeButton::all(),
            ],
        },
    }
}

fn status_axis() -> YAxis {
    YAxis {
        title:    Title::new("Status"),
        tickvals: Y_TICK_VALS.to_vec(),
        ticktext: y_tick_text(),
        range:    [-0.5, 2.5],
    }
}

/// One band per observed segment, in segment order.
fn segment_bands(rows: &[&ActivityRecord]) -> Vec<Shape> {
    let mut extents: [Option<(Day, Day)>; SEGMENT_COUNT] = [None; SEGMENT_COUNT];
    for r in rows {
        let Some(slot) = extents.get_mut(r.segment as usize) else {
            log::warn!("record {} has out-of-range segment {}", r.date, r.segment);
            continue;
        };
        *slot = Some(match *slot {
            None => (r.date, r.date),
            Some((lo, hi)) => (lo.min(r.date), hi.max(r.date)),
        });
    }

    extents
        .iter()
        .enumerate()
        .filter_map(|(seg, extent)| extent.map(|(x0, x1)| segment_band(seg as SegmentIndex, x0, x1)))
        .collect()
}

/// Background rectangle for `segment` spanning [x0, x1].
pub fn segment_band(segment: SegmentIndex, x0: Day, x1: Day) -> Shape {
    Shape {
        kind:      "rect".into(),
        name:      format!("segment {segment}"),
        xref:      "x".into(),
        yref:      "paper".into(),
        x0,
        x1,
        y0:        0.0,
        y1:        1.0,
        fillcolor: SEGMENT_COLORS[segment as usize % SEGMENT_COUNT].into(),
        opacity:   SEGMENT_OPACITY,
        layer:     "below".into(),
        line:      ShapeLine { width: 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_text_is_ordered_by_value() {
        assert_eq!(y_tick_text(), vec!["undefined", "inactive", "active"]);
    }

    #[test]
    fn label_mode_parses_cli_spellings() {
        assert_eq!("always".parse::<LabelMode>().unwrap(), LabelMode::Always);
        assert_eq!("key-events".parse::<LabelMode>().unwrap(), LabelMode::KeyEventsOnly);
        assert!(matches!(
            "sometimes".parse::<LabelMode>(),
            Err(DashError::UnknownLabelMode { .. })
        ));
    }

    #[test]
    fn empty_rows_build_axes_only() {
        let fig = build_figure(&[], &CustomerSelection::All, LabelMode::Always);
        assert!(fig.data.is_empty());
        assert!(fig.layout.shapes.is_empty());
        assert_eq!(fig.layout.yaxis.tickvals, vec![0, 1, 2]);
        assert_eq!(fig.layout.title.text, "Activity Chart");
    }

    #[test]
    fn range_selector_matches_week_month_quarter_all() {
        let labels: Vec<String> = date_axis()
            .rangeselector
            .buttons
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["1w", "1m", "3m", "All"]);
    }
}
