//! Plain renderings of a run for the terminal and for downstream tools.

use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rankfid_core::config::SimulationConfig;
use rankfid_core::table::EvaluationTable;
use rankfid_core::types::{CombinationRule, TruthDefinition};
use rankfid_sim::SimulationRun;
use serde::Serialize;

/// JSON envelope written by `run --format json`.
#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    version: &'static str,
    config: &'a SimulationConfig,
    table: &'a EvaluationTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<&'a SimulationRun>,
}

pub fn render_json(run: &SimulationRun, include_series: bool) -> Result<String> {
    let report = Report {
        generated_at: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        config: &run.config,
        table: &run.table,
        run: include_series.then_some(run),
    };
    let mut out = serde_json::to_string_pretty(&report)?;
    out.push('\n');
    Ok(out)
}

fn cell(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}

/// One line per (definition, regime, rule); one `sd / r` column pair per slice.
pub fn render_text(run: &SimulationRun) -> String {
    let cfg = &run.config;
    let regime_width = cfg
        .regimes
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("regime".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "entities={} attributes={} seed={} (rank_error_sd / log_correlation)",
        cfg.population_size, cfg.attribute_count, cfg.seed
    );

    let _ = write!(out, "{:<10} {:<regime_width$} {:<8}", "truth", "regime", "rule");
    for slice in &cfg.slices {
        let label = format!("{} (n={})", slice.name, slice.member_count(cfg.population_size));
        let _ = write!(out, " | {label:>20}");
    }
    out.push('\n');

    for definition in TruthDefinition::ALL {
        for regime in &cfg.regimes {
            for rule in CombinationRule::ALL {
                let _ = write!(
                    out,
                    "{:<10} {:<regime_width$} {:<8}",
                    definition.name(),
                    regime.name,
                    rule.name()
                );
                for c in run.table.row(definition, &regime.name, rule) {
                    let pair = format!(
                        "{} / {}",
                        cell(c.metrics.rank_error_sd, 1),
                        cell(c.metrics.log_correlation, 3)
                    );
                    let _ = write!(out, " | {pair:>20}");
                }
                out.push('\n');
            }
        }
    }
    out
}
