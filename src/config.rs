use crate::error::{CleanerError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for a cleaning run.
///
/// All knobs live here so the pipeline entry point can be called without any
/// ambient state. Defaults reproduce the keyword and country lists the
/// scraping project settled on; a TOML file can override any subset of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Directory holding the raw scraped CSV files.
    pub input_dir: Option<PathBuf>,
    /// A single pre-merged CSV file, used instead of `input_dir`.
    pub input_file: Option<PathBuf>,
    /// Where the cleaned master CSV is written.
    pub output_path: PathBuf,
    /// A job title must contain at least one of these words to be kept.
    pub relevant_keywords: Vec<String>,
    /// A job title containing any of these words is removed.
    pub irrelevant_keywords: Vec<String>,
    /// Country names recognized when splitting location strings.
    pub countries: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            input_file: None,
            output_path: PathBuf::from("master_cleaned_job_listings.csv"),
            relevant_keywords: to_strings(&[
                "analyst",
                "scientist",
                "engineer",
                "economic",
                "economist",
                "econometrics",
                "quantitative",
                "data",
                "machine learning",
                "intelligence",
                "developer",
                "consultant",
                "AI",
                "analytics",
            ]),
            irrelevant_keywords: to_strings(&[
                "sales",
                "recruiter",
                "recruitment",
                "development",
                "mail",
            ]),
            countries: to_strings(&[
                "England",
                "Scotland",
                "Wales",
                "Northern Ireland",
                "United Kingdom",
                "UK",
                "Ireland",
                "France",
                "Germany",
                "USA",
                "Canada",
            ]),
        }
    }
}

impl CleanerConfig {
    /// Loads configuration from a TOML file, falling back to defaults for
    /// any field the file does not set.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: CleanerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
