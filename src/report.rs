//! Terminal rendering for the command line tool

use colored::{ColoredString, Colorize};
use tabled::{settings::Style, Table, Tabled};

use crate::history::AcwrHistory;
use crate::models::{AcwrResult, Zone};
use crate::roster::RosterSummary;

/// Zone name colored by risk
pub fn colored_zone(zone: Zone) -> ColoredString {
    let name = zone.as_str();
    match zone {
        Zone::Insufficient => name.dimmed(),
        Zone::Undertraining => name.blue(),
        Zone::Optimal => name.green(),
        Zone::Caution => name.yellow(),
        Zone::Danger => name.red(),
        Zone::Critical => name.red().bold(),
    }
}

fn format_ratio(acwr: Option<f64>) -> String {
    acwr.map(|ratio| format!("{:.2}", ratio))
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ACWR")]
    acwr: String,
    #[tabled(rename = "Zone")]
    zone: &'static str,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Load")]
    load: String,
}

#[derive(Tabled)]
struct RosterRow {
    #[tabled(rename = "Athlete")]
    athlete: String,
    #[tabled(rename = "Weekly miles")]
    weekly_miles: String,
    #[tabled(rename = "ACWR")]
    acwr: String,
    #[tabled(rename = "Zone")]
    zone: &'static str,
}

/// Snapshot block for one athlete
pub fn render_current(athlete_id: &str, result: &AcwrResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format!("Athlete {}", athlete_id).bold()));
    out.push_str(&format!(
        "  ACWR:          {} ({})\n",
        format_ratio(result.acwr),
        colored_zone(result.zone)
    ));
    out.push_str(&format!("  Acute load:    {:.1}\n", result.acute_load));
    out.push_str(&format!("  Chronic load:  {:.1}\n", result.chronic_load));
    out.push_str(&format!("  Training days: {}\n", result.days_with_data));
    out.push_str(&format!("  {}\n", result.zone.description()));
    out.push_str(&format!("  {}\n", result.zone.recommendation().italic()));
    out
}

/// Ratio history table followed by the raw load trend
pub fn render_history(athlete_id: &str, history: &AcwrHistory) -> String {
    let mut out = format!("{}\n", format!("ACWR history for {}", athlete_id).bold());

    if history.points.is_empty() {
        out.push_str("  No chronic load yet\n");
    } else {
        let rows: Vec<HistoryRow> = history
            .points
            .iter()
            .map(|point| HistoryRow {
                date: point.date.to_string(),
                acwr: format!("{:.2}", point.acwr),
                zone: crate::zones::classify(Some(point.acwr)).label(),
            })
            .collect();
        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", "Daily load".bold()));
    let rows: Vec<TrendRow> = history
        .raw_trend
        .iter()
        .map(|point| TrendRow {
            date: point.date.to_string(),
            load: format!("{:.1}", point.load),
        })
        .collect();
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');
    out
}

/// One row per athlete plus zone totals
pub fn render_roster(summary: &RosterSummary) -> String {
    let rows: Vec<RosterRow> = summary
        .athletes
        .iter()
        .map(|(athlete, entry)| RosterRow {
            athlete: athlete.clone(),
            weekly_miles: format!("{:.1}", entry.weekly_miles),
            acwr: format_ratio(entry.acwr),
            zone: entry.zone.label(),
        })
        .collect();

    let mut out = format!("{}\n", format!("Roster as of {}", summary.anchor).bold());
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out.push('\n');

    let totals: Vec<String> = summary
        .zone_counts()
        .iter()
        .map(|(zone, count)| format!("{}: {}", colored_zone(*zone), count))
        .collect();
    out.push_str(&format!("{}\n", totals.join("  ")));

    let elevated = summary.elevated();
    if !elevated.is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            "Needs attention:".yellow().bold(),
            elevated.join(", ")
        ));
    }
    out
}
