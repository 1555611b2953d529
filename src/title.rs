use crate::error::{CleanerError, Result};
use regex::Regex;

/// Whole-word, case-insensitive keyword matcher for job titles.
///
/// A title is kept when it contains at least one relevant keyword and none
/// of the irrelevant ones. Matching uses regex word boundaries, so "analyst"
/// matches "Data Analyst" but not "catalysts".
pub struct TitleFilter {
    relevant: Option<Regex>,
    irrelevant: Option<Regex>,
}

impl TitleFilter {
    pub fn new(relevant_keywords: &[String], irrelevant_keywords: &[String]) -> Result<Self> {
        Ok(Self {
            relevant: compile_keywords(relevant_keywords)?,
            irrelevant: compile_keywords(irrelevant_keywords)?,
        })
    }

    /// True when the title contains at least one relevant keyword.
    pub fn is_relevant(&self, title: &str) -> bool {
        self.relevant
            .as_ref()
            .map(|re| re.is_match(title))
            .unwrap_or(false)
    }

    /// True when the title contains at least one irrelevant keyword.
    pub fn is_irrelevant(&self, title: &str) -> bool {
        self.irrelevant
            .as_ref()
            .map(|re| re.is_match(title))
            .unwrap_or(false)
    }

    pub fn keep(&self, title: &str) -> bool {
        self.is_relevant(title) && !self.is_irrelevant(title)
    }
}

/// Builds a `\b(kw1|kw2|…)\b` alternation over the keyword list.
/// An empty list compiles to no pattern, which never matches.
fn compile_keywords(keywords: &[String]) -> Result<Option<Regex>> {
    if keywords.is_empty() {
        return Ok(None);
    }
    let alternation = keywords
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)\b({alternation})\b");
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| CleanerError::Config(format!("invalid title keyword pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleanerConfig;

    fn default_filter() -> TitleFilter {
        let config = CleanerConfig::default();
        TitleFilter::new(&config.relevant_keywords, &config.irrelevant_keywords).unwrap()
    }

    #[test]
    fn test_data_analyst_is_kept() {
        let filter = default_filter();
        assert!(filter.keep("Data Analyst"));
    }

    #[test]
    fn test_sales_development_representative_is_dropped() {
        let filter = default_filter();
        assert!(!filter.keep("Sales Development Representative"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let filter = default_filter();
        assert!(filter.is_relevant("DATA ANALYST"));
        assert!(filter.is_irrelevant("SALES EXECUTIVE"));
    }

    #[test]
    fn test_whole_word_boundaries() {
        let filter = default_filter();
        // "analyst" must not match inside a longer word
        assert!(!filter.is_relevant("Catalysts Specialist"));
        // but punctuation is a boundary
        assert!(filter.is_relevant("Analyst-in-residence"));
    }

    #[test]
    fn test_relevant_but_also_irrelevant_is_dropped() {
        let filter = default_filter();
        // "data" is relevant, "sales" is irrelevant; the veto wins
        assert!(!filter.keep("Sales Data Analyst"));
    }

    #[test]
    fn test_empty_title_is_dropped() {
        let filter = default_filter();
        assert!(!filter.keep(""));
    }

    #[test]
    fn test_empty_keyword_lists_never_match() {
        let filter = TitleFilter::new(&[], &[]).unwrap();
        assert!(!filter.is_relevant("Data Analyst"));
        assert!(!filter.is_irrelevant("Sales Executive"));
    }
}
