//! Placeholder exercise images

use reqwest::Url;

const IMAGE_BASE: &str = "https://source.unsplash.com/200x200/";
const GYM_KEYWORDS: &str = "gym,fitness,workout";

/// Image URL for an exercise: the lowercased name words joined by commas and
/// encoded as one query component, followed by generic gym keywords
pub async fn resolve_media_url(exercise_name: &str) -> String {
    let keywords = exercise_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(",");

    let Ok(mut url) = Url::parse(IMAGE_BASE) else {
        return format!("{IMAGE_BASE}?{GYM_KEYWORDS}");
    };
    if !keywords.is_empty() {
        url.query_pairs_mut().append_key_only(&keywords);
    }
    let query = match url.query() {
        Some(name) => format!("{name},{GYM_KEYWORDS}"),
        None => GYM_KEYWORDS.to_string(),
    };
    url.set_query(Some(&query));
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_name_words_become_keywords() {
        assert_eq!(
            resolve_media_url("Bench  Press").await,
            "https://source.unsplash.com/200x200/?bench%2Cpress,gym,fitness,workout"
        );
    }

    #[tokio::test]
    async fn test_unsafe_characters_are_escaped() {
        let url = resolve_media_url("Curl #2").await;
        assert!(url.starts_with("https://source.unsplash.com/200x200/?curl%2C%232,gym"));
        assert!(!url.contains('#'));
        assert!(!url.contains(' '));
    }

    #[tokio::test]
    async fn test_blank_name_keeps_gym_keywords() {
        assert_eq!(
            resolve_media_url("   ").await,
            "https://source.unsplash.com/200x200/?gym,fitness,workout"
        );
    }
}
