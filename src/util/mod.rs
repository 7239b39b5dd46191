pub mod stack;

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase()
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Characters that may start a verb besides letters.
#[inline]
pub fn is_verb_symbol(c: char) -> bool {
    matches!(c, '<' | '>' | '.' | '*' | '/' | '+' | '!' | '-' | '_' | '?' | '$' | '%' | '&' | '=')
}

#[inline]
pub fn is_verb_start(c: char) -> bool {
    is_verb_symbol(c) || is_alphabetic(c)
}

#[inline]
pub fn is_verb_part(c: char) -> bool {
    is_verb_start(c) || is_numeric(c)
}

/// Quotes a string the way it is written in source: `"` and `\` get a leading backslash.
pub fn quote_str(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');

    for c in s.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }

        quoted.push(c);
    }

    quoted.push('"');
    quoted
}

/// Strips the surrounding quotes of a string literal.
///
/// Only `\"` is an escape here: a backslash is dropped when the character after it is a `"`,
/// which includes the closing quote. Every other backslash is kept as written.
pub fn unquote_str(literal: &str) -> String {
    let chars: Vec<char> = literal.chars().collect();

    if chars.len() < 2 {
        return String::new();
    }

    let mut unquoted = String::with_capacity(literal.len());

    for i in 1..chars.len() - 1 {
        let c = chars[i];

        if !(c == '\\' && chars[i + 1] == '"') {
            unquoted.push(c);
        }
    }

    unquoted
}
