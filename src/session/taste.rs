// src/session/taste.rs
// Theme token extraction for taste profiles

/// Words that never count as a theme
const STOPWORDS: &[&str] = &[
    "about", "after", "also", "an", "and", "are", "best", "but", "can", "could", "create",
    "does", "draw", "from", "generate", "give", "have", "image", "images", "into", "just",
    "like", "make", "more", "much", "over", "paint", "picture", "please", "show", "some",
    "that", "the", "their", "them", "then", "there", "these", "this", "those", "very",
    "want", "what", "when", "where", "which", "while", "will", "with", "would", "your",
];

/// Minimum length of a theme token
const MIN_THEME_LEN: usize = 4;

/// Extract candidate theme tokens from a prompt, lowercased and in order of appearance
pub fn extract_themes(prompt: &str) -> Vec<String> {
    let mut themes: Vec<String> = Vec::new();
    for word in prompt
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
    {
        if word.chars().count() < MIN_THEME_LEN
            || word.chars().all(|c| c.is_ascii_digit())
            || STOPWORDS.contains(&word.as_str())
        {
            continue;
        }
        if !themes.contains(&word) {
            themes.push(word);
        }
    }
    themes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_content_words() {
        assert_eq!(
            extract_themes("Create a dramatic storm cloud"),
            vec!["dramatic", "storm", "cloud"]
        );
    }

    #[test]
    fn test_strips_punctuation_and_case() {
        assert_eq!(
            extract_themes("Sunsets, SUNSETS and golden-hour light!"),
            vec!["sunsets", "golden", "hour", "light"]
        );
    }

    #[test]
    fn test_skips_numbers_and_short_words() {
        assert!(extract_themes("What is 2 + 2? 1234").is_empty());
    }

    #[test]
    fn test_empty_prompt() {
        assert!(extract_themes("").is_empty());
    }
}
