//! Keyword relevance check for energy news.

use crate::news::Article;

/// Energy-domain terms matched as plain substrings. Deliberately loose:
/// "gasoline" matches "gas", and that is fine for a reading list.
pub const ENERGY_KEYWORDS: &[&str] = &[
    "energy",
    "oil",
    "gas",
    "electricity",
    "renewable",
    "power",
    "natural gas",
    "fossil",
    "solar",
    "wind",
    "grid",
];

/// True if any keyword appears in the lower-cased `title + " " + description`.
pub fn is_relevant(article: &Article) -> bool {
    let text = format!(
        "{} {}",
        article.title,
        article.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    ENERGY_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            description: description.map(str::to_string),
            url: "https://example.com/a".to_string(),
            source_name: "Example".to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        assert!(is_relevant(&article("OPEC Cuts OIL Output", None)));
    }

    #[test]
    fn test_description_match() {
        assert!(is_relevant(&article(
            "Markets wrap",
            Some("Solar installations hit a record")
        )));
    }

    #[test]
    fn test_no_keyword_is_irrelevant() {
        assert!(!is_relevant(&article(
            "Central bank holds rates",
            Some("Inflation cools slightly")
        )));
    }

    #[test]
    fn test_missing_description_treated_as_empty() {
        assert!(!is_relevant(&article("Tech earnings beat", None)));
    }

    #[test]
    fn test_substring_false_positive_tolerated() {
        // "gasoline" and "powerful" both carry a keyword
        assert!(is_relevant(&article("Gasoline prices", None)));
        assert!(is_relevant(&article("A powerful rally", None)));
    }

    #[test]
    fn test_title_and_description_are_space_joined() {
        assert!(is_relevant(&article("Natural", Some("gas storage"))));
        assert!(!is_relevant(&article("sol", Some("ar"))));
    }
}
