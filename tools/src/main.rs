//! dashboard-runner: headless driver for the activity chart dashboard.
//!
//! Usage:
//!   dashboard-runner --seed 7 --customer cust_1 --labels always --json fig.json
//!   dashboard-runner --seed 7 --start 2023-02-01 --end 2023-02-28 --html page.html
//!   dashboard-runner --seed 7 --ipc-mode

mod page;

use activity_chart_core::{
    chart::LabelMode,
    config::DashboardConfig,
    dashboard::{ControlState, Dashboard},
    filter::CustomerSelection,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::io::{self, BufRead, Write};

const KNOWN_FLAGS: &[&str] = &[
    "--seed", "--rows", "--config", "--customer", "--start", "--end", "--labels", "--json",
    "--html", "--ipc-mode",
];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetPage,
    Select {
        #[serde(default)]
        customer: Option<String>,
        #[serde(default)]
        start: Option<NaiveDate>,
        #[serde(default)]
        end: Option<NaiveDate>,
    },
    SetLabelMode {
        mode: String,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    warn_unknown_flags(&args);

    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.rows = parse_arg(&args, "--rows", config.rows);
    if let Some(mode) = flag_value(&args, "--labels") {
        config.label_mode = mode.parse()?;
    }

    let dashboard = Dashboard::new(config, seed)?;
    let mut controls = dashboard.initial_controls();
    controls.customer = CustomerSelection::from_widget(flag_value(&args, "--customer"));
    controls.start = parse_date_flag(&args, "--start")?;
    controls.end = parse_date_flag(&args, "--end")?;

    if ipc_mode {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        return run_ipc_loop(&dashboard, controls, stdin.lock(), &mut stdout);
    }

    let json_out = flag_value(&args, "--json");
    let html_out = flag_value(&args, "--html");

    if let Some(path) = html_out {
        let html = page::render_page(&dashboard, &controls)?;
        std::fs::write(path, html).with_context(|| format!("Cannot write {path}"))?;
        log::info!("wrote page to {path}");
    }

    let figure = dashboard.render(&controls)?;
    match json_out {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&figure)?)
                .with_context(|| format!("Cannot write {path}"))?;
            log::info!("wrote figure to {path}");
        }
        None if html_out.is_none() => println!("{}", figure.to_json()?),
        None => {}
    }

    eprintln!(
        "session {} | seed {} | {} rows | {} points | {} segment bands",
        dashboard.session_id,
        dashboard.seed(),
        dashboard.table().len(),
        figure.point_count(),
        figure.segment_count()
    );
    Ok(())
}

/// One JSON request per line on stdin, one JSON reply per line on stdout.
/// Each `select` is a widget change: the figure is rebuilt from scratch.
fn run_ipc_loop(
    dashboard: &Dashboard,
    mut controls: ControlState,
    mut input: impl BufRead,
    stdout: &mut impl Write,
) -> Result<()> {
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = input.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetPage => {
                writeln!(stdout, "{}", serde_json::to_string(&dashboard.page())?)?;
            }
            IpcCommand::Select { customer, start, end } => {
                controls.customer = CustomerSelection::from_widget(customer.as_deref());
                controls.start = start;
                controls.end = end;
                write_figure(stdout, dashboard, &controls)?;
            }
            IpcCommand::SetLabelMode { mode } => match mode.parse::<LabelMode>() {
                Ok(mode) => {
                    controls.label_mode = mode;
                    write_figure(stdout, dashboard, &controls)?;
                }
                Err(e) => {
                    log::warn!("rejected label mode: {e}");
                    write_error(stdout, &e.to_string())?;
                }
            },
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_figure(out: &mut impl Write, dashboard: &Dashboard, controls: &ControlState) -> Result<()> {
    match dashboard.render(controls) {
        Ok(figure) => writeln!(out, "{}", figure.to_json()?)?,
        Err(e) => write_error(out, &e.to_string())?,
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn warn_unknown_flags(args: &[String]) {
    for arg in args.iter().skip(1).filter(|a| a.starts_with("--")) {
        if !KNOWN_FLAGS.contains(&arg.as_str()) {
            log::warn!("Unknown flag: {arg}");
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn parse_date_flag(args: &[String], flag: &str) -> Result<Option<NaiveDate>> {
    flag_value(args, flag)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("{flag} expects YYYY-MM-DD, got '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_chart_core::{
        record::Status,
        table::{ActivityTable, RawRecord},
    };
    use chrono::Days;

    /// cust_1 on days 0..9, cust_2 on days 9..12; every third day is a key event.
    fn fixed_dashboard() -> Dashboard {
        let epoch = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let rows = (0..12u64)
            .map(|d| RawRecord {
                date:           epoch + Days::new(d),
                activity_label: format!("EVENT{d:02}"),
                status:         Status::ALL[d as usize % 3],
                customer_id:    if d < 9 { "cust_1" } else { "cust_2" }.into(),
                is_key_event:   d % 3 == 0,
            })
            .collect();
        Dashboard::with_table(DashboardConfig::default(), ActivityTable::from_raw(rows))
    }

    fn run_session(requests: &[&str]) -> Vec<serde_json::Value> {
        let dashboard = fixed_dashboard();
        let input = requests.join("\n");
        let mut out: Vec<u8> = Vec::new();
        run_ipc_loop(&dashboard, dashboard.initial_controls(), input.as_bytes(), &mut out)
            .expect("ipc loop");
        String::from_utf8(out)
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("reply is JSON"))
            .collect()
    }

    #[test]
    fn every_request_gets_one_reply_and_errors_do_not_stop_the_loop() {
        let replies = run_session(&[
            r#"{"type":"get_page"}"#,
            "this is not json",
            r#"{"type":"set_label_mode","mode":"bogus"}"#,
            r#"{"type":"select","customer":"cust_2","start":"2023-01-10","end":"2023-01-11"}"#,
            r#"{"type":"quit"}"#,
            r#"{"type":"get_page"}"#,
        ]);

        assert_eq!(replies.len(), 4, "quit must end the loop: {replies:?}");

        let options = replies[0]["customer_options"].as_array().unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(replies[0]["date_min"], "2023-01-01");
        assert_eq!(replies[0]["date_max"], "2023-01-12");

        assert!(replies[1]["error"].is_string());
        assert!(replies[2]["error"].as_str().unwrap().contains("bogus"));

        let figure = &replies[3];
        assert_eq!(figure["layout"]["title"]["text"], "Activity Chart for Customer: cust_2");
        assert_eq!(figure["data"][0]["x"], serde_json::json!(["2023-01-10", "2023-01-11"]));
    }

    #[test]
    fn label_mode_change_rerenders_with_the_current_selection() {
        let replies = run_session(&[
            r#"{"type":"select","customer":"cust_2"}"#,
            r#"{"type":"set_label_mode","mode":"always"}"#,
        ]);
        assert_eq!(replies.len(), 2);

        // Key events only: day 9 is the single key event of cust_2.
        assert_eq!(
            replies[0]["data"][0]["text"],
            serde_json::json!(["EVENT09", "", ""])
        );
        assert_eq!(
            replies[1]["data"][0]["text"],
            serde_json::json!(["EVENT09", "EVENT10", "EVENT11"])
        );
        assert_eq!(replies[1]["layout"]["title"]["text"], "Activity Chart for Customer: cust_2");
    }

    #[test]
    fn inverted_window_and_unknown_customer_are_answered_in_band() {
        let replies = run_session(&[
            r#"{"type":"select","start":"2023-01-08","end":"2023-01-02"}"#,
            r#"{"type":"select","customer":"cust_404"}"#,
            "",
            r#"{"type":"select"}"#,
        ]);
        assert_eq!(replies.len(), 3, "blank lines get no reply");

        assert!(replies[0]["error"].as_str().unwrap().contains("Invalid date range"));
        assert_eq!(replies[1]["data"], serde_json::json!([]));
        assert_eq!(replies[1]["layout"]["yaxis"]["tickvals"], serde_json::json!([0, 1, 2]));
        assert_eq!(replies[2]["data"][0]["x"].as_array().unwrap().len(), 12);
    }
}
