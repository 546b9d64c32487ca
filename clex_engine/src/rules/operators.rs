//! Operator and punctuation spellings

pub(crate) const C_OPERATORS: &[&str] = &[
    "<<=", ">>=", "...", //
    "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "##", //
    "+", "-", "*", "/", "%", "&", "|", "^", "~", "!", "=", "<", ">", "?", ":", ".", "#",
];

pub(crate) const CPP_EXTRA_OPERATORS: &[&str] = &["<=>", "->*", "::", ".*"];

pub(crate) const PUNCTUATION: &[char] = &['(', ')', '[', ']', '{', '}', ';', ','];
