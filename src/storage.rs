use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{CleanerError, Result};
use crate::types::{CleanedListing, Listing, ListingTable, COL_COMPANY_NAME, REQUIRED_COLUMNS};

/// Derived columns appended to the output, in order.
pub const DERIVED_COLUMNS: [&str; 10] = [
    "search_keyword",
    "City",
    "Country",
    "salary_currency",
    "salary_min",
    "salary_max",
    "salary_period",
    "salary_source",
    "salary_standardized",
    "median_annual_salary_gbp",
];

/// Provenance tag for a source file: the filename text before the first
/// underscore (e.g. "data_scientist_london.csv" tags rows as "data").
pub fn provenance_tag(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
        .split('_')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Discovers and merges every CSV file in a directory into one table.
///
/// Files are read in sorted name order so merge order (and therefore which
/// duplicate wins) is deterministic. A file that cannot be read is logged
/// and skipped; it is fatal only when no file could be loaded at all.
pub fn load_directory(dir: &Path) -> Result<ListingTable> {
    info!("Searching for CSV files in '{}'", dir.display());
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CleanerError::NoInputFiles(dir.to_path_buf()));
    }
    info!("Found {} files. Merging now", paths.len());

    let mut table = ListingTable::default();
    let mut loaded_files = 0usize;
    for path in &paths {
        let tag = provenance_tag(path);
        match read_file(path, &tag) {
            Ok((headers, rows)) => {
                for header in &headers {
                    table.add_header(header);
                }
                info!(
                    "Merged '{}' ({} rows, tagged as '{}')",
                    path.display(),
                    rows.len(),
                    tag
                );
                table.rows.extend(rows);
                loaded_files += 1;
            }
            Err(e) => warn!("Could not read or process '{}': {}", path.display(), e),
        }
    }

    if loaded_files == 0 {
        return Err(CleanerError::NoInputFiles(dir.to_path_buf()));
    }
    info!("Merge complete. Initial total rows: {}", table.len());
    Ok(table)
}

/// Loads a single pre-merged CSV file. The provenance tag is derived from
/// the filename the same way as in directory mode.
pub fn load_file(path: &Path) -> Result<ListingTable> {
    let tag = provenance_tag(path);
    let (headers, rows) = read_file(path, &tag)?;
    let mut table = ListingTable::default();
    for header in &headers {
        table.add_header(header);
    }
    table.rows.extend(rows);
    info!("Loaded '{}' ({} rows)", path.display(), table.len());
    Ok(table)
}

/// Reads one CSV file into listings. Rows are collected before being handed
/// back so a mid-file error discards the whole file, never half of it.
fn read_file(path: &Path, tag: &str) -> Result<(Vec<String>, Vec<Listing>)> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut listing = Listing::new(tag);
        for (i, header) in headers.iter().enumerate() {
            listing.set_field(header, record.get(i).unwrap_or(""));
        }
        rows.push(listing);
    }
    Ok((headers, rows))
}

/// Output header list: the source header union, with the key columns
/// synthesized when absent, then the derived columns.
fn output_headers(source_headers: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = source_headers.to_vec();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            headers.push(required.to_string());
        }
    }
    for derived in DERIVED_COLUMNS {
        if !headers.iter().any(|h| h == derived) {
            headers.push(derived.to_string());
        }
    }
    headers
}

/// Writes the cleaned table: all original columns (Company Name carrying the
/// normalized value) plus the derived columns.
pub fn write_cleaned(
    path: &Path,
    source_headers: &[String],
    rows: &[CleanedListing],
) -> Result<()> {
    let headers = output_headers(source_headers);
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(&headers)?;
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|column| cell_value(row, column))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("Wrote {} cleaned rows to '{}'", rows.len(), path.display());
    Ok(())
}

/// Writes a merged-but-uncleaned table: original columns plus the
/// provenance tag.
pub fn write_merged(path: &Path, table: &ListingTable) -> Result<()> {
    let mut headers = table.headers.clone();
    if !headers.iter().any(|h| h == "search_keyword") {
        headers.push("search_keyword".to_string());
    }

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(&headers)?;
    for listing in &table.rows {
        let record: Vec<String> = headers
            .iter()
            .map(|column| {
                if column == "search_keyword" {
                    listing.search_keyword.clone()
                } else {
                    listing.field(column).to_string()
                }
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("Wrote {} merged rows to '{}'", table.len(), path.display());
    Ok(())
}

/// Value of one output cell. Derived columns take priority; the normalized
/// company name replaces the raw one; everything else passes through.
fn cell_value(row: &CleanedListing, column: &str) -> String {
    match column {
        "search_keyword" => row.listing.search_keyword.clone(),
        "City" => row.city.clone(),
        "Country" => row.country.clone(),
        "salary_currency" => row.salary.currency.clone(),
        "salary_min" => row.salary.min_salary.map(format_number).unwrap_or_default(),
        "salary_max" => row.salary.max_salary.map(format_number).unwrap_or_default(),
        "salary_period" => row
            .salary
            .pay_period
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
        "salary_source" => row.salary.source.clone(),
        "salary_standardized" => row.salary.standardized(),
        "median_annual_salary_gbp" => row
            .median_annual_salary_gbp
            .map(format_number)
            .unwrap_or_default(),
        COL_COMPANY_NAME => row.company_name.clone(),
        other => row.listing.field(other).to_string(),
    }
}

/// Whole numbers print without a trailing ".0"; fractional values keep
/// their decimals.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_tag_takes_prefix_before_underscore() {
        assert_eq!(provenance_tag(Path::new("data_scientist_london.csv")), "data");
        assert_eq!(provenance_tag(Path::new("/tmp/raw/analyst_uk.csv")), "analyst");
    }

    #[test]
    fn test_provenance_tag_without_underscore_keeps_filename() {
        assert_eq!(provenance_tag(Path::new("jobs.csv")), "jobs.csv");
    }

    #[test]
    fn test_output_headers_synthesize_required_and_append_derived() {
        let source = vec!["Job Title".to_string(), "Salary".to_string()];
        let headers = output_headers(&source);
        assert!(headers.iter().any(|h| h == "Company Name"));
        assert!(headers.iter().any(|h| h == "Job Description"));
        assert_eq!(headers.last().map(String::as_str), Some("median_annual_salary_gbp"));
        // Source columns keep their position at the front
        assert_eq!(headers[0], "Job Title");
        assert_eq!(headers[1], "Salary");
    }

    #[test]
    fn test_format_number_drops_trailing_zero() {
        assert_eq!(format_number(40000.0), "40000");
        assert_eq!(format_number(12.5), "12.5");
    }
}
