//! Theme scope names and their numeric ids

/// Base scopes a theme styles. A `HighlightId` is an index into this list.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "comment",
    "constant.builtin",
    "error",
    "keyword",
    "keyword.operator",
    "number",
    "operator",
    "preprocessor",
    "punctuation",
    "string",
    "type.builtin",
    "variable",
];

pub type HighlightId = u16;

/// Id for a dotted scope, trying `a.b.c`, then `a.b`, then `a`
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return HighlightId::try_from(pos).ok();
        }
        let (parent, _) = current.rsplit_once('.')?;
        current = parent;
    }
}

pub fn highlight_name(id: HighlightId) -> Option<&'static str> {
    HIGHLIGHT_NAMES.get(usize::from(id)).copied()
}
