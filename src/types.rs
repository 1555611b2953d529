use crate::salary::ParsedSalary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Source column names shared across the pipeline
pub const COL_JOB_TITLE: &str = "Job Title";
pub const COL_COMPANY_NAME: &str = "Company Name";
pub const COL_JOB_DESCRIPTION: &str = "Job Description";
pub const COL_LOCATION: &str = "Location";
pub const COL_SALARY: &str = "Salary";

/// Columns the cleaned output must carry even when a source file lacks them.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_JOB_TITLE, COL_COMPANY_NAME, COL_JOB_DESCRIPTION];

/// One raw job listing as read from a scraped CSV file.
///
/// Source files disagree on which columns they carry, so values are kept by
/// column name; a missing column simply reads as an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Raw field values keyed by source column name.
    pub fields: HashMap<String, String>,
    /// Provenance tag derived from the source filename (text before the
    /// first underscore).
    pub search_keyword: String,
}

impl Listing {
    pub fn new(search_keyword: impl Into<String>) -> Self {
        Self {
            fields: HashMap::new(),
            search_keyword: search_keyword.into(),
        }
    }

    /// Value of a column, or the empty string when the column is absent.
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, column: &str, value: &str) {
        self.fields.insert(column.to_string(), value.to_string());
    }

    pub fn title(&self) -> &str {
        self.field(COL_JOB_TITLE)
    }

    pub fn company_name(&self) -> &str {
        self.field(COL_COMPANY_NAME)
    }

    pub fn description(&self) -> &str {
        self.field(COL_JOB_DESCRIPTION)
    }

    pub fn location(&self) -> &str {
        self.field(COL_LOCATION)
    }

    pub fn salary(&self) -> &str {
        self.field(COL_SALARY)
    }

    /// Identity used for deduplication. Two listings are duplicates when
    /// title, company and description all match exactly.
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.title().to_string(),
            self.company_name().to_string(),
            self.description().to_string(),
        )
    }
}

/// The merged table of raw listings handed to the cleaning pipeline.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    /// Union of source headers in first-seen order.
    pub headers: Vec<String>,
    pub rows: Vec<Listing>,
}

impl ListingTable {
    pub fn add_header(&mut self, name: &str) {
        if !self.headers.iter().any(|h| h == name) {
            self.headers.push(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A listing after the cleaning pipeline has run: the raw row plus every
/// derived field. Produced once per row and never mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedListing {
    pub listing: Listing,
    /// Company name with a trailing legal-entity suffix removed.
    pub company_name: String,
    pub city: String,
    pub country: String,
    pub salary: ParsedSalary,
    /// Median of the parsed salary range annualized, kept only for GBP.
    pub median_annual_salary_gbp: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_reads_as_empty() {
        let listing = Listing::new("data");
        assert_eq!(listing.title(), "");
        assert_eq!(listing.salary(), "");
    }

    #[test]
    fn test_dedup_key_ignores_location() {
        let mut a = Listing::new("data");
        a.set_field(COL_JOB_TITLE, "Data Analyst");
        a.set_field(COL_COMPANY_NAME, "Acme");
        a.set_field(COL_JOB_DESCRIPTION, "Crunch numbers");
        a.set_field(COL_LOCATION, "London");

        let mut b = a.clone();
        b.set_field(COL_LOCATION, "Bristol");

        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_header_union_keeps_first_seen_order() {
        let mut table = ListingTable::default();
        table.add_header("Job Title");
        table.add_header("Salary");
        table.add_header("Job Title");
        table.add_header("Location");
        assert_eq!(table.headers, vec!["Job Title", "Salary", "Location"]);
    }
}
