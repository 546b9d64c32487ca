//! Per-language rule tables
//!
//! A [`RuleTable`] holds everything the lexer and classifier need to know about
//! one language: reserved words, contextual keywords, operator spellings (longest
//! first), punctuation and numeric-literal options. A [`RuleSet`] owns one table
//! per [`Language`] and is built once, then shared read-only.

pub mod keywords;
pub mod language;
pub mod operators;

pub use keywords::KeywordKind;
pub use language::{Language, UnknownLanguage};

use keywords::{KeywordList, COMMON_KEYWORDS, CPP_CONTEXTUAL_KEYWORDS, CPP_KEYWORDS, C_KEYWORDS};
use operators::{CPP_EXTRA_OPERATORS, C_OPERATORS, PUNCTUATION};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct RuleTable {
    language: Language,
    keywords: HashMap<&'static str, KeywordKind>,
    contextual_keywords: HashSet<&'static str>,
    /// Sorted by descending length so the first match is the longest
    operators: Vec<&'static str>,
    punctuation: HashSet<char>,
    digit_separators: bool,
}

impl RuleTable {
    pub fn new(language: Language) -> Self {
        match language {
            Language::C => Self::build(language, &[COMMON_KEYWORDS, C_KEYWORDS], &[], &[], false),
            Language::Cpp => Self::build(
                language,
                &[COMMON_KEYWORDS, CPP_KEYWORDS],
                CPP_CONTEXTUAL_KEYWORDS,
                CPP_EXTRA_OPERATORS,
                true,
            ),
        }
    }

    fn build(
        language: Language,
        keyword_lists: &[KeywordList],
        contextual: &[&'static str],
        extra_operators: &[&'static str],
        digit_separators: bool,
    ) -> Self {
        let keywords = keyword_lists
            .iter()
            .flat_map(|list| list.iter().copied())
            .collect();

        let mut operators: Vec<&'static str> = C_OPERATORS
            .iter()
            .chain(extra_operators.iter())
            .copied()
            .collect();
        // Stable sort keeps declaration order among equal lengths
        operators.sort_by(|a, b| b.len().cmp(&a.len()));
        operators.dedup();

        Self {
            language,
            keywords,
            contextual_keywords: contextual.iter().copied().collect(),
            operators,
            punctuation: PUNCTUATION.iter().copied().collect(),
            digit_separators,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Exact, case-sensitive keyword lookup
    pub fn keyword_kind(&self, text: &str) -> Option<KeywordKind> {
        self.keywords.get(text).copied()
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.keywords.contains_key(text)
    }

    pub fn is_contextual_keyword(&self, text: &str) -> bool {
        self.contextual_keywords.contains(text)
    }

    /// Longest operator that `rest` starts with
    pub fn match_operator(&self, rest: &str) -> Option<&'static str> {
        self.operators.iter().copied().find(|op| rest.starts_with(op))
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.operators.contains(&text)
    }

    pub fn is_punctuation(&self, text: &str) -> bool {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => self.punctuation.contains(&ch),
            _ => false,
        }
    }

    pub fn is_punctuation_char(&self, ch: char) -> bool {
        self.punctuation.contains(&ch)
    }

    /// Whether `'` may separate digits in numeric literals
    pub fn allows_digit_separators(&self) -> bool {
        self.digit_separators
    }

    /// Allows raw string literals (`R"(...)"`)
    pub fn allows_raw_strings(&self) -> bool {
        self.language == Language::Cpp
    }

    pub fn operators(&self) -> &[&'static str] {
        &self.operators
    }
}

/// Immutable set of rule tables, one per language
#[derive(Debug, Clone)]
pub struct RuleSet {
    c: RuleTable,
    cpp: RuleTable,
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            c: RuleTable::new(Language::C),
            cpp: RuleTable::new(Language::Cpp),
        }
    }

    pub fn table(&self, language: Language) -> &RuleTable {
        match language {
            Language::C => &self.c,
            Language::Cpp => &self.cpp,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_per_language() {
        let rules = RuleSet::new();
        let c = rules.table(Language::C);
        let cpp = rules.table(Language::Cpp);

        assert_eq!(c.keyword_kind("int"), Some(KeywordKind::Type));
        assert_eq!(cpp.keyword_kind("int"), Some(KeywordKind::Type));
        assert_eq!(c.keyword_kind("class"), None);
        assert_eq!(cpp.keyword_kind("class"), Some(KeywordKind::Declaration));
        assert_eq!(c.keyword_kind("_Bool"), Some(KeywordKind::Type));
        assert_eq!(cpp.keyword_kind("_Bool"), None);
        assert_eq!(c.keyword_kind("auto"), Some(KeywordKind::Storage));
        assert_eq!(cpp.keyword_kind("auto"), Some(KeywordKind::Type));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let table = RuleTable::new(Language::C);
        assert!(table.is_keyword("return"));
        assert!(!table.is_keyword("Return"));
        assert!(!table.is_keyword("INT"));
    }

    #[test]
    fn test_contextual_keywords() {
        let rules = RuleSet::default();
        assert!(rules.table(Language::Cpp).is_contextual_keyword("override"));
        assert!(!rules.table(Language::Cpp).is_keyword("override"));
        assert!(!rules.table(Language::C).is_contextual_keyword("override"));
    }

    #[test]
    fn test_operators_sorted_longest_first() {
        let table = RuleTable::new(Language::Cpp);
        let lengths: Vec<usize> = table.operators().iter().map(|op| op.len()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_longest_match() {
        let cpp = RuleTable::new(Language::Cpp);
        let c = RuleTable::new(Language::C);

        assert_eq!(cpp.match_operator("<=>b"), Some("<=>"));
        assert_eq!(c.match_operator("<=>b"), Some("<="));
        assert_eq!(c.match_operator("<<=1"), Some("<<="));
        assert_eq!(c.match_operator("<b"), Some("<"));
        assert_eq!(cpp.match_operator("::x"), Some("::"));
        assert_eq!(c.match_operator("::x"), Some(":"));
        assert_eq!(c.match_operator("...)"), Some("..."));
        assert_eq!(c.match_operator("@"), None);
        assert_eq!(c.match_operator("("), None);
    }

    #[test]
    fn test_punctuation() {
        let table = RuleTable::new(Language::C);
        for p in ["(", ")", "[", "]", "{", "}", ";", ","] {
            assert!(table.is_punctuation(p), "{p}");
        }
        assert!(!table.is_punctuation("+"));
        assert!(!table.is_punctuation("()"));
        assert!(table.is_operator("->"));
        assert!(!table.is_operator("->*"));
    }

    #[test]
    fn test_language_options() {
        let rules = RuleSet::new();
        assert!(!rules.table(Language::C).allows_digit_separators());
        assert!(rules.table(Language::Cpp).allows_digit_separators());
        assert!(!rules.table(Language::C).allows_raw_strings());
        assert!(rules.table(Language::Cpp).allows_raw_strings());
        assert_eq!(rules.table(Language::Cpp).language(), Language::Cpp);
    }

    #[test]
    fn test_rule_set_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleSet>();
    }
}
