//! Implementation of the `dcr-timing mine` command.
//!
//! Imports an event log and a DCR model, mines the timings of all conditions and
//! responses, and writes the results together with annotated copies of the model.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use dcr_timing::analysis::case_centric::timing::{BoundMode, Histogram};
use dcr_timing::core::event_data::case_centric::io::EventTableImportOptions;
use dcr_timing::{
    get_timings_with_options, ConstraintKind, ConstraintSpec, DcrModel, EventTable, Importable,
    TimingOptions, TimingResults,
};

/// File name of the mined samples and summaries.
pub const TIMINGS_FILE: &str = "timings.json";
/// File name of the histograms of all sufficient results.
pub const HISTOGRAMS_FILE: &str = "histograms.json";

/// Options of the mine command, as read from `--options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MineOptions {
    /// Options for mining and summarizing timings
    pub timing: TimingOptions,
    /// Options for importing CSV and XES event logs
    pub import: EventTableImportOptions,
}

impl MineOptions {
    /// Load options from a JSON file, or use the defaults if no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let file = File::open(path)
            .with_context(|| format!("failed to open options file {}", path.display()))?;
        let options: Self = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse options file {}", path.display()))?;
        tracing::debug!(?options, "loaded options");
        Ok(options)
    }
}

#[derive(Debug, Serialize)]
struct ConstraintHistogram<'a> {
    constraint: &'a ConstraintSpec,
    histogram: Histogram,
}

/// Paths of all files written by [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineOutput {
    /// Samples and summaries of all constraints
    pub timings: PathBuf,
    /// Histograms of all constraints with enough samples
    pub histograms: PathBuf,
    /// Model annotated with the most extreme observed bounds
    pub model: PathBuf,
    /// Model annotated with bounds ignoring outliers
    pub model_no_outliers: PathBuf,
}

impl MineOutput {
    fn new(output_dir: &Path, model_path: &Path) -> Self {
        let stem = model_path
            .file_stem()
            .map_or_else(|| "model".into(), |s| s.to_string_lossy());
        Self {
            timings: output_dir.join(TIMINGS_FILE),
            histograms: output_dir.join(HISTOGRAMS_FILE),
            model: output_dir.join(format!("{stem}.txt")),
            model_no_outliers: output_dir.join(format!("{stem}_no_outliers.txt")),
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn log_summary(results: &TimingResults) {
    let conditions = results
        .iter()
        .filter(|r| r.constraint.kind == ConstraintKind::MinDelay)
        .count();
    let responses = results.len() - conditions;
    tracing::info!(
        conditions,
        responses,
        insufficient = results.num_insufficient(),
        "mined constraints"
    );
    for result in results.iter().filter(|r| !r.is_sufficient()) {
        tracing::info!(
            samples = result.samples.len(),
            "not enough data for {}",
            result.constraint
        );
    }
}

/// Run the mine command.
///
/// Writes [`TIMINGS_FILE`], [`HISTOGRAMS_FILE`] and two annotated copies of the model to `output_dir`.
pub fn run(
    log_path: &Path,
    model_path: &Path,
    output_dir: &Path,
    options: &MineOptions,
) -> Result<MineOutput> {
    let table = EventTable::import_from_path_with_options(log_path, options.import.clone())
        .with_context(|| format!("failed to import event log {}", log_path.display()))?;
    tracing::info!(
        cases = table.cases.len(),
        events = table.num_events(),
        "imported event log"
    );
    let model = DcrModel::import_from_path(model_path)
        .with_context(|| format!("failed to import DCR model {}", model_path.display()))?;

    let constraints = model.timing_constraints();
    let results = get_timings_with_options(&table, &constraints, &options.timing);
    log_summary(&results);

    fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    let output = MineOutput::new(output_dir, model_path);

    write_json(&output.timings, &results)?;
    let histograms: Vec<ConstraintHistogram<'_>> = results
        .iter()
        .filter_map(|r| {
            Some(ConstraintHistogram {
                constraint: &r.constraint,
                histogram: r.histogram(&options.timing)?,
            })
        })
        .collect();
    write_json(&output.histograms, &histograms)?;

    for (path, mode) in [
        (&output.model, BoundMode::Extreme),
        (&output.model_no_outliers, BoundMode::ExcludeOutliers),
    ] {
        model
            .export_with_bounds_to_path(path, &results.bounds(mode))
            .with_context(|| format!("failed to write model {}", path.display()))?;
    }
    tracing::info!(output = %output_dir.display(), "wrote results");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let mut csv = String::from("case:concept:name;concept:name;time:timestamp\n");
        // Delays of 1..=7 days, deadlines are the same since there are no repetitions
        for case in 1..=7 {
            writeln!(csv, "{case};Create Fine;2006-07-01T08:00:00+00:00").unwrap();
            writeln!(csv, "{case};Send Fine;2006-07-{:02}T09:00:00+00:00", 1 + case).unwrap();
        }
        // Never sent, so it does not qualify
        writeln!(csv, "8;Create Fine;2006-07-01T08:00:00+00:00").unwrap();
        let log = dir.join("fines.csv");
        fs::write(&log, csv).unwrap();

        let model = dir.join("fines.dcr");
        fs::write(
            &model,
            "EVENT,Create Fine\nEVENT,Send Fine\nEVENT,Payment\nCONDITION,Create Fine,Send Fine\nRESPONSE,Create Fine,Send Fine\nRESPONSE,Send Fine,Payment\nEXCLUDE,Payment,Payment\n",
        )
        .unwrap();
        (log, model)
    }

    #[test]
    fn test_mine_writes_all_outputs() {
        let input = tempfile::tempdir().unwrap();
        let (log, model) = write_inputs(input.path());
        let out_dir = input.path().join("out");

        let output = run(&log, &model, &out_dir, &MineOptions::default()).unwrap();
        assert_eq!(output.model, out_dir.join("fines.txt"));
        assert_eq!(output.model_no_outliers, out_dir.join("fines_no_outliers.txt"));

        let timings: TimingResults =
            serde_json::from_reader(File::open(&output.timings).unwrap()).unwrap();
        assert_eq!(timings.len(), 3);
        assert_eq!(timings.num_insufficient(), 1);
        let delay = &timings.results[0];
        assert_eq!(delay.constraint.kind, ConstraintKind::MinDelay);
        assert_eq!(delay.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        let histograms: serde_json::Value =
            serde_json::from_reader(File::open(&output.histograms).unwrap()).unwrap();
        assert_eq!(histograms.as_array().unwrap().len(), 2);

        let annotated = fs::read_to_string(&output.model).unwrap();
        assert!(annotated.contains("CONDITION,Create Fine,Send Fine,1\n"));
        assert!(annotated.contains("RESPONSE,Create Fine,Send Fine,7\n"));
        assert!(annotated.contains("RESPONSE,Send Fine,Payment\n"));
        assert!(annotated.contains("EXCLUDE,Payment,Payment\n"));
        assert!(fs::read_to_string(&output.model_no_outliers)
            .unwrap()
            .contains("RESPONSE,Create Fine,Send Fine,7\n"));
    }

    #[test]
    fn test_mine_xes_log() {
        let dir = tempfile::tempdir().unwrap();
        let (_, model) = write_inputs(dir.path());
        let mut xes = String::from("<log>\n");
        for case in 1..=6 {
            writeln!(
                xes,
                r#"<trace><string key="concept:name" value="{case}"/><event><string key="concept:name" value="Create Fine"/><date key="time:timestamp" value="2006-07-01T08:00:00+00:00"/></event><event><string key="concept:name" value="Send Fine"/><date key="time:timestamp" value="2006-07-{:02}T09:00:00+00:00"/></event></trace>"#,
                1 + case
            )
            .unwrap();
        }
        xes.push_str("</log>\n");
        let log = dir.path().join("fines.xes");
        fs::write(&log, xes).unwrap();

        let output = run(&log, &model, &dir.path().join("out"), &MineOptions::default()).unwrap();
        let timings: TimingResults =
            serde_json::from_reader(File::open(&output.timings).unwrap()).unwrap();
        assert_eq!(timings.results[0].samples, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(fs::read_to_string(&output.model)
            .unwrap()
            .contains("CONDITION,Create Fine,Send Fine,1\n"));
    }

    #[test]
    fn test_load_partial_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, r#"{"timing": {"min_samples": 2}}"#).unwrap();
        let options = MineOptions::load(Some(&path)).unwrap();
        assert_eq!(options.timing.min_samples, 2);
        assert_eq!(options.timing.whisker_factor, 1.5);
        assert_eq!(options.import, EventTableImportOptions::default());
        assert_eq!(MineOptions::load(None).unwrap(), MineOptions::default());
    }

    #[test]
    fn test_missing_log_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (_, model) = write_inputs(dir.path());
        let err = run(
            &dir.path().join("missing.csv"),
            &model,
            dir.path(),
            &MineOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to import event log"));
    }
}
