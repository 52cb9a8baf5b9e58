use crate::error::DatasetError;
use analytics::CompositeReport;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Headline table read by the dashboard: `date,MoM_raw,MoM_smoothed`.
pub const HEADLINE_FILE: &str = "mom_scores.csv";
/// Section table read by the dashboard: `date,<section id>...`.
pub const SECTIONS_FILE: &str = "section_scores.csv";

/// Paths of the tables written by `write_report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub headline: PathBuf,
    pub sections: PathBuf,
}

/// Writes both score tables into `out_dir`, creating the directory if needed.
pub fn write_report(
    report: &CompositeReport,
    out_dir: impl AsRef<Path>,
) -> Result<ReportFiles, DatasetError> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|source| DatasetError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let files = ReportFiles {
        headline: out_dir.join(HEADLINE_FILE),
        sections: out_dir.join(SECTIONS_FILE),
    };
    write_headline(report, create(&files.headline)?)?;
    write_sections(report, create(&files.sections)?)?;

    tracing::info!(
        headline = %files.headline.display(),
        sections = %files.sections.display(),
        "Score tables written"
    );
    Ok(files)
}

/// Writes the raw and smoothed headline, one row per calendar month.
pub fn write_headline<W: Write>(report: &CompositeReport, writer: W) -> Result<(), DatasetError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "MoM_raw", "MoM_smoothed"])?;
    for (i, date) in report.calendar.dates().enumerate() {
        wtr.write_record([
            date.to_string(),
            cell(report.headline_raw.get(i)),
            cell(report.headline_smoothed.get(i)),
        ])?;
    }
    flush(wtr)
}

/// Writes one column per contributing section, one row per calendar month.
pub fn write_sections<W: Write>(report: &CompositeReport, writer: W) -> Result<(), DatasetError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date".to_string()];
    header.extend(report.section_ids().map(str::to_string));
    wtr.write_record(&header)?;

    for (i, date) in report.calendar.dates().enumerate() {
        let mut row = vec![date.to_string()];
        row.extend(report.sections.iter().map(|s| cell(s.scores.get(i))));
        wtr.write_record(&row)?;
    }
    flush(wtr)
}

/// Missing months are written as empty cells.
fn cell(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn create(path: &Path) -> Result<File, DatasetError> {
    File::create(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn flush<W: Write>(mut wtr: csv::Writer<W>) -> Result<(), DatasetError> {
    wtr.flush().map_err(|e| DatasetError::Csv(e.into()))
}
