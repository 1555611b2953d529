use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Estimate annotations like "(Glassdoor Est.)" or "(Employer Est.)".
static ESTIMATE_SOURCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\((.*?Est\.?.*?)\)").unwrap());

static HOURLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)per hour|hourly|/hour|ph\b").unwrap());
static DAILY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)per day|daily|/day").unwrap());
static MONTHLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)per month|monthly|/month").unwrap());

/// Every period word that must be removed before number extraction, so that
/// e.g. "/hour" is never read as part of an amount.
static PERIOD_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)per\s*(hour|day|month|year)|hourly|daily|monthly|yearly|/hour|/day|/month|/year")
        .unwrap()
});

/// Currency detection patterns, tried in order. The first hit wins.
static CURRENCIES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new("£").unwrap(), "GBP"),
        // Some GBP listings come through mislabeled with the franc token
        (Regex::new(r"\bFCFA\b").unwrap(), "GBP"),
        (Regex::new(r"\$").unwrap(), "USD"),
        (Regex::new("€").unwrap(), "EUR"),
        (Regex::new("¥").unwrap(), "JPY"),
        (Regex::new("₹").unwrap(), "INR"),
    ]
});

static CURRENCY_TOKENS: Lazy<Regex> = Lazy::new(|| Regex::new("[£$€¥₹]|FCFA").unwrap());

/// An amount with optional thousands grouping, decimals and a magnitude
/// suffix: "40000", "40,000", "37.5", "40K", "1.2M".
static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:,\d{3})*(?:\.\d+)?)\s*([KMkmBb]?)").unwrap());

/// The unit a salary figure is denominated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Hourly,
    Daily,
    Monthly,
    Annual,
}

impl PayPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPeriod::Hourly => "hourly",
            PayPeriod::Daily => "daily",
            PayPeriod::Monthly => "monthly",
            PayPeriod::Annual => "annual",
        }
    }

    /// Factor converting one figure in this period to an annual equivalent.
    /// Hourly assumes a 40-hour week over 52 weeks, daily a 5-day week.
    pub fn annual_multiplier(&self) -> f64 {
        match self {
            PayPeriod::Hourly => 2080.0,
            PayPeriod::Daily => 260.0,
            PayPeriod::Monthly => 12.0,
            PayPeriod::Annual => 1.0,
        }
    }
}

/// Structured form of one raw salary string.
///
/// Every field degrades to empty/absent on unparseable input; parsing never
/// fails outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSalary {
    /// ISO currency code, or empty when no symbol was recognized.
    pub currency: String,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    /// Absent only when the input itself was absent or empty.
    pub pay_period: Option<PayPeriod>,
    /// Estimate annotation such as "Glassdoor Est.", or empty.
    pub source: String,
    /// The unparsed input, kept verbatim.
    pub original: String,
}

impl ParsedSalary {
    /// Human-readable form: `"GBP 40,000 - 50,000 (annual)"`, or
    /// `"GBP 40,000 (annual)"` for a single figure. Empty when nothing was
    /// parsed.
    pub fn standardized(&self) -> String {
        let (min, max) = match (self.min_salary, self.max_salary) {
            (Some(min), Some(max)) => (min, max),
            _ => return String::new(),
        };
        let period = self.pay_period.map(|p| p.as_str()).unwrap_or("");
        if min == max {
            format!("{} {} ({})", self.currency, format_thousands(min), period)
        } else {
            format!(
                "{} {} - {} ({})",
                self.currency,
                format_thousands(min),
                format_thousands(max),
                period
            )
        }
    }

    /// Median of the parsed range converted to an annual GBP figure.
    /// Absent unless both bounds are present and the currency is GBP.
    pub fn median_annual_gbp(&self) -> Option<f64> {
        let min = self.min_salary?;
        let max = self.max_salary?;
        if self.currency != "GBP" {
            return None;
        }
        let multiplier = self
            .pay_period
            .map(|p| p.annual_multiplier())
            .unwrap_or(1.0);
        Some((min + max) / 2.0 * multiplier)
    }
}

/// Parses one raw salary string into its structured form.
///
/// The steps are ordered: each one narrows the working text for the next.
/// Period detection has to happen before period words are stripped, and
/// currency symbols have to go before numbers are extracted.
pub fn parse_salary(raw: &str) -> ParsedSalary {
    let original = raw.to_string();
    if raw.trim().is_empty() {
        return ParsedSalary {
            original,
            ..ParsedSalary::default()
        };
    }

    let mut result = ParsedSalary {
        pay_period: Some(PayPeriod::Annual),
        original,
        ..ParsedSalary::default()
    };

    // Scraped pages often arrive double-encoded; undo the common artifacts
    let mut cleaned = raw.replace("Â£", "£").replace("Â ", " ").trim().to_string();

    let source = ESTIMATE_SOURCE
        .captures(&cleaned)
        .map(|caps| caps[1].to_string());
    if let Some(source) = source {
        result.source = source;
        let without_source = ESTIMATE_SOURCE.replace_all(&cleaned, "").trim().to_string();
        cleaned = without_source;
    }

    if HOURLY.is_match(&cleaned) {
        result.pay_period = Some(PayPeriod::Hourly);
    } else if DAILY.is_match(&cleaned) {
        result.pay_period = Some(PayPeriod::Daily);
    } else if MONTHLY.is_match(&cleaned) {
        result.pay_period = Some(PayPeriod::Monthly);
    }

    let cleaned = PERIOD_WORDS.replace_all(&cleaned, "");

    for (pattern, code) in CURRENCIES.iter() {
        if pattern.is_match(&cleaned) {
            result.currency = (*code).to_string();
            break;
        }
    }

    let cleaned = CURRENCY_TOKENS.replace_all(&cleaned, "");

    let mut amounts = Vec::new();
    for caps in AMOUNT.captures_iter(&cleaned) {
        if let Some(value) = scale_amount(&caps[1], &caps[2]) {
            amounts.push(value);
        }
    }

    // Two or more figures are a range regardless of their order in the text
    if amounts.len() >= 2 {
        result.min_salary = Some(amounts.iter().copied().fold(f64::INFINITY, f64::min));
        result.max_salary = Some(amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    } else if amounts.len() == 1 {
        result.min_salary = Some(amounts[0]);
        result.max_salary = Some(amounts[0]);
    }

    result
}

/// Converts a matched amount and its magnitude suffix into a plain number.
/// Fragments that fail to parse are dropped by the caller.
fn scale_amount(number: &str, suffix: &str) -> Option<f64> {
    let value: f64 = number.replace(',', "").parse().ok()?;
    let scaled = match suffix.to_ascii_uppercase().as_str() {
        "K" => value * 1_000.0,
        "M" => value * 1_000_000.0,
        "B" => value * 1_000_000_000.0,
        _ => value,
    };
    Some(scaled)
}

/// Formats the integer part of a number with comma thousands separators.
fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
