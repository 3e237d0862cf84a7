use crate::cli::ScanArgs;
use crate::config::FileConfig;
use crate::error::{CliError, Result};
use crate::output::{write_summary, SeriesFileWriter, SummaryRow, SUMMARY_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::{run_scan, ScanConfig, TemperatureRun};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

/// `interrupted` is polled between samples; once set, the scan stops and
/// nothing is written.
pub fn run(args: &ScanArgs, quiet: bool, interrupted: &AtomicBool) -> Result<()> {
    let cfg = FileConfig::resolve(args)?;
    let scan = cfg.scan_config();
    scan.check()?;
    debug!(?scan, output_dir = %cfg.output_dir.display(), "resolved scan configuration");

    prepare_output_dir(&cfg.output_dir)?;

    let pb = progress_bar(&scan, quiet);
    let runs = match run_scan(&scan, interrupted, &|| pb.inc(1)) {
        Ok(runs) => runs,
        Err(e) => {
            pb.abandon_with_message("aborted");
            return Err(e.into());
        }
    };
    pb.finish_with_message("done");

    let written = write_series(&cfg.output_dir, &scan, &runs)?;

    let rows: Vec<SummaryRow> = runs
        .iter()
        .map(|run| SummaryRow::from_run(run, scan.n_sites()))
        .collect();
    let summary_path = cfg.output_dir.join(SUMMARY_FILE);
    write_summary(&summary_path, &rows)?;

    info!(
        "Wrote {} series files and {} to {}",
        written,
        SUMMARY_FILE,
        cfg.output_dir.display()
    );
    Ok(())
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::Config(format!(
            "output path {} exists and is not a directory",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

fn progress_bar(scan: &ScanConfig, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(scan.total_samples());
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb.set_message("samples");
    pb
}

/// Persist every completed temperature; returns the number of files written.
fn write_series(dir: &Path, scan: &ScanConfig, runs: &[TemperatureRun]) -> Result<usize> {
    let mut writer = SeriesFileWriter::new(dir, scan.lattice_size);
    for run in runs {
        if run.is_completed() {
            run.series.replay_into(&mut writer)?;
        } else {
            warn!(temperature = run.temperature, "no series written for skipped temperature");
        }
    }
    Ok(writer.written().len())
}
