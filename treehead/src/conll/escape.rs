use std::borrow::Cow;

/// Brackets and their Penn Treebank escapes.
static BRACKET_ESCAPES: [(char, &str); 6] = [
    ('(', "-LRB-"),
    (')', "-RRB-"),
    ('[', "-LSB-"),
    (']', "-RSB-"),
    ('{', "-LCB-"),
    ('}', "-RCB-"),
];

fn bracket_escape(ch: char) -> Option<&'static str> {
    BRACKET_ESCAPES
        .iter()
        .find(|&&(bracket, _)| bracket == ch)
        .map(|&(_, escape)| escape)
}

/// Replace brackets by their Penn Treebank escapes.
///
/// For example, `(` becomes `-LRB-` and `}` becomes `-RCB-`.
pub fn escape_brackets(s: &str) -> Cow<str> {
    if !s.chars().any(|ch| bracket_escape(ch).is_some()) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match bracket_escape(ch) {
            Some(escape) => escaped.push_str(escape),
            None => escaped.push(ch),
        }
    }

    Cow::Owned(escaped)
}
