pub mod url_validator;

/// Alphabet for generated short codes: `[A-Za-z0-9]`
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random code of `length` characters
///
/// Every character is drawn independently and uniformly from
/// [`CODE_ALPHABET`]. Uniqueness is not guaranteed; callers check against
/// the record store before admitting a code.
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Whether `code` is a non-empty run of ASCII letters and digits
pub fn is_alphanumeric_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Elide `text` to at most `max_chars` characters followed by `...`
pub fn truncate_url(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
