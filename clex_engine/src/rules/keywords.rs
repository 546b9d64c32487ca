//! Keyword categories and per-language keyword lists

use serde::{Deserialize, Serialize};

/// Coarse role of a reserved word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordKind {
    /// Built-in type names (`int`, `char`, `wchar_t`)
    Type,
    /// Control flow (`if`, `return`, `co_await`)
    Control,
    /// Storage class (`static`, `extern`, `typedef`)
    Storage,
    /// Qualifiers and specifiers (`const`, `inline`, `virtual`)
    Modifier,
    /// Declaration introducers (`struct`, `class`, `namespace`)
    Declaration,
    /// Literal constants (`true`, `nullptr`, `this`)
    Constant,
    /// Word-form operators (`sizeof`, `new`, `and`)
    OperatorWord,
}

impl KeywordKind {
    pub fn scope_name(&self) -> &'static str {
        match self {
            KeywordKind::Type => "type.builtin",
            KeywordKind::Control => "keyword.control",
            KeywordKind::Storage => "keyword.storage",
            KeywordKind::Modifier => "keyword.modifier",
            KeywordKind::Declaration => "keyword.declaration",
            KeywordKind::Constant => "constant.builtin",
            KeywordKind::OperatorWord => "keyword.operator",
        }
    }
}

pub(crate) type KeywordList = &'static [(&'static str, KeywordKind)];

use KeywordKind::*;

/// Shared by C and C++
pub(crate) const COMMON_KEYWORDS: KeywordList = &[
    ("void", Type),
    ("char", Type),
    ("short", Type),
    ("int", Type),
    ("long", Type),
    ("float", Type),
    ("double", Type),
    ("signed", Type),
    ("unsigned", Type),
    ("bool", Type),
    ("if", Control),
    ("else", Control),
    ("switch", Control),
    ("case", Control),
    ("default", Control),
    ("for", Control),
    ("while", Control),
    ("do", Control),
    ("break", Control),
    ("continue", Control),
    ("goto", Control),
    ("return", Control),
    ("register", Storage),
    ("static", Storage),
    ("extern", Storage),
    ("typedef", Storage),
    ("thread_local", Storage),
    ("const", Modifier),
    ("volatile", Modifier),
    ("inline", Modifier),
    ("alignas", Modifier),
    ("struct", Declaration),
    ("union", Declaration),
    ("enum", Declaration),
    ("static_assert", Declaration),
    ("true", Constant),
    ("false", Constant),
    ("sizeof", OperatorWord),
    ("alignof", OperatorWord),
];

pub(crate) const C_KEYWORDS: KeywordList = &[
    ("_Bool", Type),
    ("_Complex", Type),
    ("_Imaginary", Type),
    ("auto", Storage),
    ("_Thread_local", Storage),
    ("restrict", Modifier),
    ("_Noreturn", Modifier),
    ("_Atomic", Modifier),
    ("_Alignas", Modifier),
    ("_Static_assert", Declaration),
    ("_Alignof", OperatorWord),
    ("_Generic", OperatorWord),
    ("typeof", OperatorWord),
];

pub(crate) const CPP_KEYWORDS: KeywordList = &[
    ("auto", Type),
    ("wchar_t", Type),
    ("char8_t", Type),
    ("char16_t", Type),
    ("char32_t", Type),
    ("try", Control),
    ("catch", Control),
    ("throw", Control),
    ("co_await", Control),
    ("co_yield", Control),
    ("co_return", Control),
    ("mutable", Storage),
    ("virtual", Modifier),
    ("explicit", Modifier),
    ("constexpr", Modifier),
    ("consteval", Modifier),
    ("constinit", Modifier),
    ("noexcept", Modifier),
    ("friend", Modifier),
    ("class", Declaration),
    ("namespace", Declaration),
    ("template", Declaration),
    ("typename", Declaration),
    ("using", Declaration),
    ("concept", Declaration),
    ("requires", Declaration),
    ("public", Declaration),
    ("private", Declaration),
    ("protected", Declaration),
    ("operator", Declaration),
    ("export", Declaration),
    ("nullptr", Constant),
    ("this", Constant),
    ("new", OperatorWord),
    ("delete", OperatorWord),
    ("typeid", OperatorWord),
    ("decltype", OperatorWord),
    ("static_cast", OperatorWord),
    ("dynamic_cast", OperatorWord),
    ("const_cast", OperatorWord),
    ("reinterpret_cast", OperatorWord),
    ("and", OperatorWord),
    ("and_eq", OperatorWord),
    ("or", OperatorWord),
    ("or_eq", OperatorWord),
    ("not", OperatorWord),
    ("not_eq", OperatorWord),
    ("xor", OperatorWord),
    ("xor_eq", OperatorWord),
    ("bitand", OperatorWord),
    ("bitor", OperatorWord),
    ("compl", OperatorWord),
];

/// Identifiers with special meaning only in certain positions
pub(crate) const CPP_CONTEXTUAL_KEYWORDS: &[&str] = &["override", "final", "import", "module"];
