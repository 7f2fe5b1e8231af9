// ---------------------------------------------------------------------------
// Author name normalisation
// ---------------------------------------------------------------------------

/// Delimiters between names in an author line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    /// `;` only.
    Semicolon,
    /// `;` and `,` (tabular sources).
    SemicolonOrComma,
}

impl Delimiters {
    fn matches(self, c: char) -> bool {
        match self {
            Delimiters::Semicolon => c == ';',
            Delimiters::SemicolonOrComma => c == ';' || c == ',',
        }
    }
}

/// Split an author line into author keys.
///
/// Each token is cut at its first `(` (affiliation markers and the like) and
/// trimmed; tokens that end up empty are dropped. Case and Unicode form are
/// left untouched.
pub fn normalize(raw: &str, delimiters: Delimiters) -> Vec<String> {
    raw.split(|c: char| delimiters.matches(c))
        .map(strip_annotation)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_annotation(token: &str) -> &str {
    let head = match token.find('(') {
        Some(pos) => &token[..pos],
        None => token,
    };
    head.trim()
}
