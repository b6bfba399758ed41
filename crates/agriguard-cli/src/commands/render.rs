use agriguard_core::models::AnalysisReport;
use agriguard_core::render::{ResultView, RiskTone};
use anyhow::Result;
use console::style;

use crate::cli::RenderArgs;
use crate::errors::invalid_result;
use crate::output::OutputWriter;
use crate::output_types::{RenderOutput, ZoneTableRow};

pub fn execute(args: RenderArgs, output: &OutputWriter) -> Result<()> {
    let text = super::read_input(&args.path, "render")?;

    let report = serde_json::from_str::<serde_json::Value>(&text)
        .map_err(agriguard_core::AgriguardError::from)
        .and_then(|value| AnalysisReport::from_json(&value))
        .map_err(|e| invalid_result(&args.path, &e))?;

    let view = ResultView::from_result(&report.result);
    print_report(&report, &view, output);

    output.result(RenderOutput { report, view })
}

/// Print the result panel to the terminal (human mode only).
///
/// Dropped response fields are already logged by validation.
pub fn print_report(report: &AnalysisReport, view: &ResultView, output: &OutputWriter) {
    if output.is_json() {
        return;
    }

    let badge = match view.risk.tone {
        RiskTone::Danger => style(&view.risk.label).red().bold(),
        RiskTone::Warning => style(&view.risk.label).yellow().bold(),
        RiskTone::Ok => style(&view.risk.label).green().bold(),
        RiskTone::Neutral => style(&view.risk.label).bold(),
    };

    output.section("Stress diagnosis");
    output.kv("Risk", badge);
    output.kv("Confidence", &view.confidence);
    output.kv("Received", report.received_at.format("%Y-%m-%d %H:%M:%S UTC"));

    output.section("Vegetation health trend");
    if let Some(status) = &view.trend.status {
        output.kv("Status", status);
    }
    if view.trend.points.is_empty() {
        output.line(style("(no trend data)").dim());
    } else {
        let first = &view.trend.points[0];
        let last = &view.trend.points[view.trend.points.len() - 1];
        output.line(format!("{}  {} → {}", view.trend.sparkline(), first.day, last.day));
    }
    if let Some(average) = view.trend.health_average {
        output.kv("Health average", format!("{:.2}", average));
    }

    output.section("Anomalies");
    if view.anomalies.is_empty() {
        output.line(style("(none)").dim());
    } else {
        output.line(view.anomalies.join(", "));
    }

    output.section("Weather");
    match (&view.weather, &view.weather_fallback) {
        (Some(weather), _) => {
            output.kv("Conditions", &weather.description);
            for (label, value) in [
                ("Temperature", &weather.temperature),
                ("Humidity", &weather.humidity),
                ("Wind", &weather.wind_speed),
            ] {
                if let Some(value) = value {
                    output.kv(label, value);
                }
            }
        }
        (None, Some(fallback)) => output.line(style(fallback).dim()),
        (None, None) => {}
    }

    output.section("Recommended actions");
    if view.actions.is_empty() {
        output.line(style("(none)").dim());
    }
    for (i, action) in view.actions.iter().enumerate() {
        if action.emphasized {
            output.line(format!("  {}. {}", i + 1, style(&action.text).cyan().bold()));
        } else {
            output.line(format!("  {}. {}", i + 1, action.text));
        }
    }

    if !view.zones.is_empty() {
        output.section("Zones");
        output.table(
            view.zones
                .iter()
                .map(|zone| ZoneTableRow {
                    zone: zone.zone_id.clone(),
                    risk: zone.risk.label.clone(),
                    confidence: zone.confidence.clone(),
                })
                .collect(),
        );
    }
}
