/// Splits a raw "City, Region, Country" string into (city, country).
///
/// The city is the first comma-separated segment, verbatim. The country is
/// the first segment, scanning from the end, that exactly matches a known
/// country name; when none matches and the string has more than one segment,
/// the last segment is used as-is.
pub fn split_location(raw: &str, countries: &[String]) -> (String, String) {
    if raw.trim().is_empty() {
        return (String::new(), String::new());
    }

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let city = parts.first().copied().unwrap_or("").to_string();

    let mut country = String::new();
    for part in parts.iter().rev() {
        if countries.iter().any(|c| c.as_str() == *part) {
            country = part.to_string();
            break;
        }
    }

    // Fallback heuristic: an unlisted country still sits in the last segment
    if country.is_empty() && parts.len() > 1 {
        country = parts.last().copied().unwrap_or("").to_string();
    }

    (city, country)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> Vec<String> {
        [
            "England",
            "Scotland",
            "United Kingdom",
            "UK",
            "France",
            "Germany",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect()
    }

    #[test]
    fn test_known_country_matched_from_the_end() {
        let (city, country) = split_location("London, England, United Kingdom", &countries());
        assert_eq!(city, "London");
        assert_eq!(country, "United Kingdom");
    }

    #[test]
    fn test_two_segment_location() {
        let (city, country) = split_location("Paris, France", &countries());
        assert_eq!(city, "Paris");
        assert_eq!(country, "France");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_location("", &countries()), (String::new(), String::new()));
        assert_eq!(split_location("   ", &countries()), (String::new(), String::new()));
    }

    #[test]
    fn test_single_segment_has_no_country() {
        let (city, country) = split_location("Bristol", &countries());
        assert_eq!(city, "Bristol");
        assert_eq!(country, "");
    }

    #[test]
    fn test_unlisted_country_falls_back_to_last_segment() {
        let (city, country) = split_location("Tokyo, Kanto, Japan", &countries());
        assert_eq!(city, "Tokyo");
        assert_eq!(country, "Japan");
    }

    #[test]
    fn test_segments_are_trimmed() {
        let (city, country) = split_location("  Lyon ,  France ", &countries());
        assert_eq!(city, "Lyon");
        assert_eq!(country, "France");
    }
}
