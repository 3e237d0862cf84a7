use crate::error::Result;
use ising_sim::statistics::SeriesSummary;
use ising_sim::{MagnetizationSink, RunStatus, TemperatureRun};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Metadata lines at the top of every series file; readers skip exactly
/// this many lines before the values.
pub const HEADER_LINES: usize = 2;

pub const SUMMARY_FILE: &str = "summary.csv";

/// `Temp_<T>.csv`, with `T` in its shortest round-trip form so distinct
/// temperatures never share a file.
pub fn series_file_name(temperature: f64) -> String {
    format!("Temp_{temperature}.csv")
}

/// Writes one `Temp_<T>.csv` per temperature into `dir`: two `# ` header
/// lines, then one signed magnetization per line.
pub struct SeriesFileWriter {
    dir: PathBuf,
    lattice_size: i64,
    writer: Option<BufWriter<File>>,
    written: Vec<PathBuf>,
}

impl SeriesFileWriter {
    pub fn new(dir: impl Into<PathBuf>, lattice_size: i64) -> Self {
        Self {
            dir: dir.into(),
            lattice_size,
            writer: None,
            written: Vec::new(),
        }
    }

    /// Files closed so far, in the order they were written.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn not_open() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "record called before begin_temperature")
    }
}

impl MagnetizationSink for SeriesFileWriter {
    fn begin_temperature(&mut self, temperature: f64) -> io::Result<()> {
        let path = self.dir.join(series_file_name(temperature));
        if self.written.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} was already written in this scan", path.display()),
            ));
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(
            writer,
            "# Magnetization at T = {temperature} on a {0}x{0} periodic lattice",
            self.lattice_size
        )?;
        writeln!(writer, "# one sample per line, total magnetization M")?;
        self.writer = Some(writer);
        self.written.push(path);
        Ok(())
    }

    fn record(&mut self, magnetization: i64) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(Self::not_open)?;
        writeln!(writer, "{magnetization}")
    }

    fn end_temperature(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Err(Self::not_open()),
        }
    }
}

/// Read back a series file, skipping the header.
pub fn read_series(path: &Path) -> Result<Vec<i64>> {
    let reader = BufReader::new(File::open(path)?);
    let mut values = Vec::new();
    for line in reader.lines().skip(HEADER_LINES) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = line.parse::<i64>().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: bad magnetization {line:?}: {e}", path.display()),
            )
        })?;
        values.push(value);
    }
    Ok(values)
}

#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub temperature: f64,
    pub mean_abs_magnetization: Option<f64>,
    pub std_abs_magnetization: Option<f64>,
    pub binder_cumulant: Option<f64>,
    pub onsager: f64,
    pub tau_int: Option<f64>,
    pub acceptance_rate: f64,
    pub status: String,
}

impl SummaryRow {
    pub fn from_run(run: &TemperatureRun, n_spins: usize) -> Self {
        let summary = SeriesSummary::from_series(&run.series, n_spins);
        let status = match &run.status {
            RunStatus::Completed => "completed".to_string(),
            RunStatus::Skipped(e) => format!("skipped: {e}"),
        };
        Self {
            temperature: run.temperature,
            mean_abs_magnetization: summary.map(|s| s.mean_abs_magnetization),
            std_abs_magnetization: summary.map(|s| s.std_abs_magnetization),
            binder_cumulant: summary.map(|s| s.binder_cumulant),
            onsager: ising_sim::statistics::onsager_magnetization(run.temperature),
            tau_int: summary.map(|s| s.tau_int),
            acceptance_rate: run.acceptance_rate,
            status,
        }
    }
}

pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ising_sim::{MagnetizationSeries, SimError, TemperatureRange};

    #[test]
    fn file_names_are_stable() {
        assert_eq!(series_file_name(0.1), "Temp_0.1.csv");
        assert_eq!(series_file_name(4.0), "Temp_4.csv");
        assert_eq!(series_file_name(1.000_000_5), "Temp_1.0000005.csv");
    }

    #[test]
    fn closely_spaced_temperatures_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let temperatures = TemperatureRange::new(1.0, 1.000_002, 5).values();
        let mut writer = SeriesFileWriter::new(dir.path(), 4);
        for (k, &t) in temperatures.iter().enumerate() {
            let series = MagnetizationSeries {
                temperature: t,
                values: vec![k as i64],
            };
            series.replay_into(&mut writer).unwrap();
        }

        assert_eq!(writer.written().len(), 5);
        for (k, path) in writer.written().iter().enumerate() {
            assert_eq!(read_series(path).unwrap(), vec![k as i64]);
        }
    }

    #[test]
    fn repeated_temperature_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let series = MagnetizationSeries {
            temperature: 2.0,
            values: vec![4, -4],
        };
        let mut writer = SeriesFileWriter::new(dir.path(), 2);
        series.replay_into(&mut writer).unwrap();

        let err = series.replay_into(&mut writer).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(writer.written().len(), 1);
        assert_eq!(read_series(&writer.written()[0]).unwrap(), vec![4, -4]);
    }

    #[test]
    fn series_file_has_two_header_lines() {
        let dir = tempfile::tempdir().unwrap();
        let series = MagnetizationSeries {
            temperature: 2.5,
            values: vec![16, -4, 0, -16],
        };
        let mut writer = SeriesFileWriter::new(dir.path(), 4);
        series.replay_into(&mut writer).unwrap();

        let path = dir.path().join(series_file_name(2.5));
        assert_eq!(writer.written(), &[path.clone()]);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HEADER_LINES + 4);
        assert!(lines[..HEADER_LINES].iter().all(|l| l.starts_with("# ")));
        assert_eq!(&lines[HEADER_LINES..], &["16", "-4", "0", "-16"]);

        assert_eq!(read_series(&path).unwrap(), series.values);
    }

    #[test]
    fn record_without_begin_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SeriesFileWriter::new(dir.path(), 4);
        assert!(writer.record(1).is_err());
        assert!(writer.end_temperature().is_err());
    }

    #[test]
    fn summary_has_one_row_per_temperature() {
        let dir = tempfile::tempdir().unwrap();
        let runs = vec![
            TemperatureRun {
                index: 0,
                temperature: 1.0,
                series: MagnetizationSeries {
                    temperature: 1.0,
                    values: vec![16, 16, -16, 16],
                },
                acceptance_rate: 0.01,
                status: RunStatus::Completed,
            },
            TemperatureRun {
                index: 1,
                temperature: 0.0,
                series: MagnetizationSeries::default(),
                acceptance_rate: 0.0,
                status: RunStatus::Skipped(SimError::InvalidTemperature { temperature: 0.0 }),
            },
        ];
        let rows: Vec<SummaryRow> = runs.iter().map(|r| SummaryRow::from_run(r, 16)).collect();
        assert_eq!(rows[0].mean_abs_magnetization, Some(1.0));
        assert!(rows[1].mean_abs_magnetization.is_none());

        let path = dir.path().join(SUMMARY_FILE);
        write_summary(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "temperature");
        assert_eq!(&headers[7], "status");
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][7], "completed");
        assert!(records[1][7].starts_with("skipped"));
        assert_eq!(&records[1][1], "");
    }
}
