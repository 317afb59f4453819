//! Self-contained HTML page: title, instructions, customer dropdown,
//! date pickers and the chart. Plotly.js is loaded from its CDN.
//!
//! Figures are rendered in Rust ahead of time, one per dropdown entry,
//! over the whole table. Each point carries its segment index, so on
//! every picker change the page re-filters the points to the inclusive
//! window and rebuilds the segment bands from what is left.

use activity_chart_core::{
    chart::{segment_band, Figure, Shape},
    dashboard::{ControlState, CustomerOption, Dashboard, PageLayout},
    filter::CustomerSelection,
    types::{Day, SegmentIndex, SEGMENT_COUNT},
};
use anyhow::Result;
use serde::Serialize;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

#[derive(Debug, Serialize)]
struct Prerendered {
    value:  String,
    figure: Figure,
}

/// Dropdown entries and their figures. A selected customer with no
/// records still gets its own (empty) entry.
fn page_entries(
    dashboard: &Dashboard,
    layout: &PageLayout,
    controls: &ControlState,
) -> Result<(Vec<CustomerOption>, Vec<Prerendered>)> {
    let mut options = layout.customer_options.clone();
    if let Some(id) = controls.customer.customer_id() {
        if !options.iter().any(|o| o.value == id) {
            options.push(CustomerOption {
                label: format!("{id} (no records)"),
                value: id.to_string(),
            });
        }
    }

    let mut figures = Vec::with_capacity(options.len());
    for option in &options {
        let state = ControlState {
            customer:   CustomerSelection::from_widget(Some(option.value.as_str())),
            start:      None,
            end:        None,
            label_mode: controls.label_mode,
        };
        figures.push(Prerendered {
            value:  option.value.clone(),
            figure: dashboard.render(&state)?,
        });
    }
    Ok((options, figures))
}

/// Render the page with `controls` as the initial widget values.
pub fn render_page(dashboard: &Dashboard, controls: &ControlState) -> Result<String> {
    let layout = dashboard.page();
    let (options, figures) = page_entries(dashboard, &layout, controls)?;

    let selected = controls.customer.customer_id().unwrap_or_default();
    let start = controls.start.or(layout.date_min);
    let end = controls.end.or(layout.date_max);

    let templates: Vec<Shape> = (0..SEGMENT_COUNT)
        .map(|s| segment_band(s as SegmentIndex, Day::default(), Day::default()))
        .collect();

    Ok(fill_template(
        &layout,
        &options,
        selected,
        (start, end),
        &serde_json::to_string(&figures)?,
        &serde_json::to_string(&templates)?,
    ))
}

fn fill_template(
    layout: &PageLayout,
    options: &[CustomerOption],
    selected: &str,
    (start, end): (Option<Day>, Option<Day>),
    figures_json: &str,
    bands_json: &str,
) -> String {
    let options: String = options
        .iter()
        .map(|o| {
            let sel = if o.value == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{sel}>{}</option>"#,
                escape(&o.value),
                escape(&o.label)
            )
        })
        .collect();

    let instructions = layout
        .instructions
        .as_deref()
        .map(|text| {
            format!(
                "<details class=\"help\"><summary>Show instructions</summary><p>{}</p></details>",
                escape(text)
            )
        })
        .unwrap_or_default();

    let day_or_blank = |d: Option<Day>| d.map(|d| d.to_string()).unwrap_or_default();

    PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape(&layout.title))
        .replace("{{PLOTLY}}", PLOTLY_CDN)
        .replace("{{INSTRUCTIONS}}", &instructions)
        .replace("{{OPTIONS}}", &options)
        .replace("{{DATE_MIN}}", &day_or_blank(layout.date_min))
        .replace("{{DATE_MAX}}", &day_or_blank(layout.date_max))
        .replace("{{START}}", &day_or_blank(start))
        .replace("{{END}}", &day_or_blank(end))
        .replace("{{BANDS}}", bands_json)
        // Keep `</script>` inside labels from closing the data block.
        .replace("{{FIGURES}}", &figures_json.replace("</", "<\\/"))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{{TITLE}}</title>
<script src="{{PLOTLY}}"></script>
<style>
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:24px;color:#222}
.controls{display:flex;gap:16px;align-items:flex-end;margin:12px 0}
.controls label{display:flex;flex-direction:column;font-size:12px;color:#555;gap:4px}
select,input{padding:4px 8px;font-size:14px}
select{min-width:220px}
.help{margin:8px 0;font-size:14px}
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
{{INSTRUCTIONS}}
<div class="controls">
  <label>Customer<select id="customer">{{OPTIONS}}</select></label>
  <label>From<input type="date" id="start" min="{{DATE_MIN}}" max="{{DATE_MAX}}" value="{{START}}"></label>
  <label>To<input type="date" id="end" min="{{DATE_MIN}}" max="{{DATE_MAX}}" value="{{END}}"></label>
</div>
<div id="chart"></div>
<script>
const FIGURES = {{FIGURES}};
const BAND_TEMPLATES = {{BANDS}};
const chart = document.getElementById('chart');
const customer = document.getElementById('customer');
const start = document.getElementById('start');
const end = document.getElementById('end');

// Points of `trace` inside the inclusive [lo, hi] window. Blank ends are open.
function windowed(trace, lo, hi) {
  const keep = [];
  trace.x.forEach((d, i) => {
    if ((!lo || d >= lo) && (!hi || d <= hi)) keep.push(i);
  });
  const pick = arr => keep.map(i => arr[i]);
  const text = pick(trace.text);
  return Object.assign({}, trace, {
    x: pick(trace.x),
    y: pick(trace.y),
    text: text,
    hovertext: pick(trace.hovertext),
    customdata: pick(trace.customdata),
    marker: Object.assign({}, trace.marker, {color: pick(trace.marker.color)}),
    mode: text.some(t => t) ? 'markers+text+lines' : 'markers+lines',
  });
}

// One band per observed segment, spanning its min/max date in `data`.
function bands(data) {
  const extents = [];
  for (const trace of data) {
    trace.x.forEach((d, i) => {
      const s = trace.customdata[i];
      const e = extents[s];
      extents[s] = e ? [d < e[0] ? d : e[0], d > e[1] ? d : e[1]] : [d, d];
    });
  }
  const shapes = [];
  extents.forEach((e, s) => {
    if (e) shapes.push(Object.assign({}, BAND_TEMPLATES[s], {x0: e[0], x1: e[1]}));
  });
  return shapes;
}

function draw() {
  const entry = FIGURES.find(f => f.value === customer.value);
  if (!entry) {
    Plotly.purge(chart);
    return;
  }
  const data = entry.figure.data
    .map(t => windowed(t, start.value, end.value))
    .filter(t => t.x.length > 0);
  const layout = JSON.parse(JSON.stringify(entry.figure.layout));
  layout.shapes = bands(data);
  Plotly.react(chart, data, layout, {responsive: true});
}

customer.addEventListener('change', draw);
start.addEventListener('change', draw);
end.addEventListener('change', draw);
draw();
</script>
</body>
</html>
"##;
