//! Restricted-string character sets.

/// True when every character belongs to the PrintableString set.
pub fn is_printable(value: &str) -> bool {
    value.chars().all(|c| {
        matches!(c,
            'a'..='z' | 'A'..='Z' | '0'..='9' | ' ' |
            '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' |
            ':' | '=' | '?'
        )
    })
}

/// True when every character is 7-bit ASCII (the IA5 repertoire).
pub fn is_ia5(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii())
}
