use regex::Regex;
use anyhow::{Result, anyhow};
use std::fmt;

/// How a search term is matched against file content
#[derive(Debug, Clone)]
pub enum SearchPattern {
    /// Plain substring, matched byte for byte
    Literal(String),

    /// Regular expression; the replacement may reference capture groups
    Regex(Regex),
}

impl SearchPattern {
    /// Build a literal pattern
    ///
    /// # Arguments
    /// * `term` - The search term, must not be empty
    ///
    /// # Returns
    /// * `Result<SearchPattern>` - The pattern, or an error for an empty term
    pub fn literal(term: &str) -> Result<Self> {
        if term.is_empty() {
            return Err(anyhow!("Empty search string is not allowed"));
        }
        Ok(SearchPattern::Literal(term.to_string()))
    }

    /// Compile a regular expression pattern
    ///
    /// # Arguments
    /// * `expr` - The expression, must not be empty
    ///
    /// # Returns
    /// * `Result<SearchPattern>` - The pattern, or an error if it fails to compile
    pub fn regex(expr: &str) -> Result<Self> {
        if expr.is_empty() {
            return Err(anyhow!("Empty search string is not allowed"));
        }
        let re = Regex::new(expr).map_err(|e| anyhow!("Invalid regular expression {:?}: {}", expr, e))?;
        Ok(SearchPattern::Regex(re))
    }

    /// Check whether the content holds at least one match
    pub fn is_match(&self, content: &str) -> bool {
        match self {
            SearchPattern::Literal(term) => content.contains(term.as_str()),
            SearchPattern::Regex(re) => re.is_match(content),
        }
    }

    /// Count non-overlapping matches in the content
    pub fn count(&self, content: &str) -> usize {
        match self {
            SearchPattern::Literal(term) => content.matches(term.as_str()).count(),
            SearchPattern::Regex(re) => re.find_iter(content).count(),
        }
    }

    /// Replace every match in the content
    ///
    /// Literal patterns insert the replacement verbatim. Regex patterns
    /// expand `$1` / `${name}` references in the replacement.
    ///
    /// # Arguments
    /// * `content` - The content to replace in
    /// * `replacement` - The replacement string
    ///
    /// # Returns
    /// * `(String, usize)` - The new content and the number of substitutions
    pub fn replace_all(&self, content: &str, replacement: &str) -> (String, usize) {
        let count = self.count(content);
        if count == 0 {
            return (content.to_string(), 0);
        }

        let replaced = match self {
            SearchPattern::Literal(term) => {
                // Regex::replace_all would treat '$' specially, so stay on str
                content.replace(term.as_str(), replacement)
            },
            SearchPattern::Regex(re) => re.replace_all(content, replacement).into_owned(),
        };

        (replaced, count)
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPattern::Literal(term) => f.write_str(term),
            SearchPattern::Regex(re) => f.write_str(re.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_is_rejected() {
        assert!(SearchPattern::literal("").is_err());
        assert!(SearchPattern::regex("").is_err());
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = SearchPattern::regex("foo(").unwrap_err();
        assert!(err.to_string().contains("Invalid regular expression"));
    }

    #[test]
    fn test_literal_replaces_every_occurrence() {
        let pattern = SearchPattern::literal("foo").unwrap();
        let (result, count) = pattern.replace_all("foo foo foo", "bar");
        assert_eq!(result, "bar bar bar");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_literal_treats_metacharacters_as_text() {
        let pattern = SearchPattern::literal("a.c").unwrap();
        assert!(!pattern.is_match("abc"));
        assert!(pattern.is_match("a.c"));

        // '$' in the replacement is inserted as-is
        let (result, _) = pattern.replace_all("x a.c y", "$1");
        assert_eq!(result, "x $1 y");
    }

    #[test]
    fn test_regex_expands_captures() {
        let pattern = SearchPattern::regex(r"(\w+)@example").unwrap();
        let (result, count) = pattern.replace_all("alice@example bob@example", "${1}@test");
        assert_eq!(result, "alice@test bob@test");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_no_match_leaves_content_untouched() {
        let pattern = SearchPattern::literal("xyz").unwrap();
        let (result, count) = pattern.replace_all("hello world", "abc");
        assert_eq!(result, "hello world");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_count_is_non_overlapping() {
        let pattern = SearchPattern::literal("aa").unwrap();
        assert_eq!(pattern.count("aaaa"), 2);
        assert_eq!(pattern.count("aaa"), 1);
    }

    #[test]
    fn test_display_shows_source_term() {
        assert_eq!(SearchPattern::literal("hello").unwrap().to_string(), "hello");
        assert_eq!(SearchPattern::regex(r"h\w+").unwrap().to_string(), r"h\w+");
    }
}
