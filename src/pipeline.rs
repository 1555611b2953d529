use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::info;
use uuid::Uuid;

use crate::company::normalize_company_name;
use crate::config::CleanerConfig;
use crate::error::Result;
use crate::location::split_location;
use crate::salary::parse_salary;
use crate::title::TitleFilter;
use crate::types::{CleanedListing, Listing, ListingTable};

/// Per-stage row counts and parse statistics for one cleaning run.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub merged_rows: usize,
    pub duplicates_removed: usize,
    pub after_dedup: usize,
    pub after_relevant_filter: usize,
    pub after_irrelevant_filter: usize,
    /// Rows where at least one salary figure was extracted.
    pub salaries_parsed: usize,
    pub currency_counts: BTreeMap<String, usize>,
    pub period_counts: BTreeMap<String, usize>,
    pub final_rows: usize,
}

impl CleanReport {
    fn new(merged_rows: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            merged_rows,
            duplicates_removed: 0,
            after_dedup: 0,
            after_relevant_filter: 0,
            after_irrelevant_filter: 0,
            salaries_parsed: 0,
            currency_counts: BTreeMap::new(),
            period_counts: BTreeMap::new(),
            final_rows: 0,
        }
    }
}

/// Runs the full cleaning pipeline over a merged table.
///
/// Stages, in order: deduplicate, relevant-title filter, irrelevant-title
/// filter, then one per-row transformation that splits the location, parses
/// the salary, annualizes it and normalizes the company name. Rows come out
/// in merge order, densely renumbered by position.
pub fn clean_listings(
    table: ListingTable,
    config: &CleanerConfig,
) -> Result<(Vec<CleanedListing>, CleanReport)> {
    let filter = TitleFilter::new(&config.relevant_keywords, &config.irrelevant_keywords)?;
    let mut report = CleanReport::new(table.len());

    // Stage 1: deduplicate on (title, company, description), first wins
    let mut seen = HashSet::new();
    let mut rows: Vec<Listing> = Vec::with_capacity(table.len());
    for listing in table.rows {
        if seen.insert(listing.dedup_key()) {
            rows.push(listing);
        }
    }
    report.after_dedup = rows.len();
    report.duplicates_removed = report.merged_rows - report.after_dedup;
    info!("Removed {} duplicate listings", report.duplicates_removed);

    // Stage 2: titles must contain at least one relevant keyword
    rows.retain(|listing| filter.is_relevant(listing.title()));
    report.after_relevant_filter = rows.len();
    info!(
        "Filtered to {} rows based on relevant keywords",
        report.after_relevant_filter
    );

    // Stage 3: and none of the irrelevant ones
    rows.retain(|listing| !filter.is_irrelevant(listing.title()));
    report.after_irrelevant_filter = rows.len();
    info!(
        "Filtered to {} rows after removing irrelevant keywords",
        report.after_irrelevant_filter
    );

    // Stages 4-7: per-row derivation of location, salary, annualization and
    // company name
    let cleaned: Vec<CleanedListing> = rows
        .into_iter()
        .map(|listing| transform_row(listing, &config.countries))
        .collect();

    for row in &cleaned {
        if row.salary.min_salary.is_some() {
            report.salaries_parsed += 1;
        }
        if !row.salary.currency.is_empty() {
            *report
                .currency_counts
                .entry(row.salary.currency.clone())
                .or_default() += 1;
        }
        if let Some(period) = row.salary.pay_period {
            *report
                .period_counts
                .entry(period.as_str().to_string())
                .or_default() += 1;
        }
    }
    report.final_rows = cleaned.len();

    info!(
        "Successfully processed {} salary entries",
        report.salaries_parsed
    );
    info!("Currency distribution: {:?}", report.currency_counts);
    info!("Pay period distribution: {:?}", report.period_counts);
    info!("Cleaning complete. Final total rows: {}", report.final_rows);

    Ok((cleaned, report))
}

/// The per-row transformation: one raw listing in, one cleaned listing out.
/// Missing fields read as empty strings, so no stage can fail on an absent
/// column.
fn transform_row(listing: Listing, countries: &[String]) -> CleanedListing {
    let (city, country) = split_location(listing.location(), countries);
    let salary = parse_salary(listing.salary());
    let median_annual_salary_gbp = salary.median_annual_gbp();
    let company_name = normalize_company_name(listing.company_name());

    CleanedListing {
        listing,
        company_name,
        city,
        country,
        salary,
        median_annual_salary_gbp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        COL_COMPANY_NAME, COL_JOB_DESCRIPTION, COL_JOB_TITLE, COL_LOCATION, COL_SALARY,
    };

    fn listing(title: &str, company: &str, description: &str) -> Listing {
        let mut listing = Listing::new("data");
        listing.set_field(COL_JOB_TITLE, title);
        listing.set_field(COL_COMPANY_NAME, company);
        listing.set_field(COL_JOB_DESCRIPTION, description);
        listing
    }

    fn table_of(rows: Vec<Listing>) -> ListingTable {
        ListingTable {
            headers: vec![
                COL_JOB_TITLE.to_string(),
                COL_COMPANY_NAME.to_string(),
                COL_JOB_DESCRIPTION.to_string(),
            ],
            rows,
        }
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut first = listing("Data Analyst", "Acme", "Crunch numbers");
        first.set_field(COL_LOCATION, "London, United Kingdom");
        let mut second = first.clone();
        second.set_field(COL_LOCATION, "Bristol, United Kingdom");

        let config = CleanerConfig::default();
        let (cleaned, report) = clean_listings(table_of(vec![first, second]), &config).unwrap();

        assert_eq!(report.merged_rows, 2);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].city, "London");
    }

    #[test]
    fn test_title_filters_apply_in_order() {
        let rows = vec![
            listing("Data Analyst", "Acme", "a"),
            listing("Sales Development Representative", "Acme", "b"),
            listing("Office Manager", "Acme", "c"),
            listing("Sales Data Analyst", "Acme", "d"),
        ];

        let config = CleanerConfig::default();
        let (cleaned, report) = clean_listings(table_of(rows), &config).unwrap();

        // "Office Manager" and "Sales Development Representative" fail the
        // relevant filter; "Sales Data Analyst" passes it but is vetoed
        assert_eq!(report.after_relevant_filter, 2);
        assert_eq!(report.after_irrelevant_filter, 1);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].listing.title(), "Data Analyst");
    }

    #[test]
    fn test_transform_derives_all_fields() {
        let mut row = listing("Data Analyst", "Acme Ltd", "Crunch numbers");
        row.set_field(COL_LOCATION, "London, England, United Kingdom");
        row.set_field(COL_SALARY, "£40K - £50K per annum");

        let config = CleanerConfig::default();
        let (cleaned, _) = clean_listings(table_of(vec![row]), &config).unwrap();
        let row = &cleaned[0];

        assert_eq!(row.company_name, "Acme");
        assert_eq!(row.city, "London");
        assert_eq!(row.country, "United Kingdom");
        assert_eq!(row.salary.currency, "GBP");
        assert_eq!(row.salary.min_salary, Some(40_000.0));
        assert_eq!(row.median_annual_salary_gbp, Some(45_000.0));
        // The raw company field is left untouched
        assert_eq!(row.listing.company_name(), "Acme Ltd");
    }

    #[test]
    fn test_missing_columns_degrade_to_empty_fields() {
        // No Location or Salary columns at all
        let row = listing("Data Analyst", "Acme", "Crunch numbers");

        let config = CleanerConfig::default();
        let (cleaned, report) = clean_listings(table_of(vec![row]), &config).unwrap();
        let row = &cleaned[0];

        assert_eq!(row.city, "");
        assert_eq!(row.country, "");
        assert_eq!(row.salary.min_salary, None);
        assert_eq!(row.salary.pay_period, None);
        assert_eq!(row.median_annual_salary_gbp, None);
        assert_eq!(report.salaries_parsed, 0);
    }

    #[test]
    fn test_report_counts_currencies_and_periods() {
        let mut a = listing("Data Analyst", "Acme", "a");
        a.set_field(COL_SALARY, "£30,000");
        let mut b = listing("Data Scientist", "Beta", "b");
        b.set_field(COL_SALARY, "$25/hour");

        let config = CleanerConfig::default();
        let (_, report) = clean_listings(table_of(vec![a, b]), &config).unwrap();

        assert_eq!(report.salaries_parsed, 2);
        assert_eq!(report.currency_counts.get("GBP"), Some(&1));
        assert_eq!(report.currency_counts.get("USD"), Some(&1));
        assert_eq!(report.period_counts.get("annual"), Some(&1));
        assert_eq!(report.period_counts.get("hourly"), Some(&1));
    }

    #[test]
    fn test_annualization_requires_gbp() {
        let mut gbp = listing("Data Analyst", "Acme", "a");
        gbp.set_field(COL_SALARY, "£20 per hour");
        let mut usd = listing("Data Scientist", "Beta", "b");
        usd.set_field(COL_SALARY, "$20 per hour");

        let config = CleanerConfig::default();
        let (cleaned, _) = clean_listings(table_of(vec![gbp, usd]), &config).unwrap();

        assert_eq!(cleaned[0].median_annual_salary_gbp, Some(41_600.0));
        assert_eq!(cleaned[1].median_annual_salary_gbp, None);
    }
}
