//! String sanitization for message bodies and output file names

/// Zero-width and other invisible code points stripped from message text
const INVISIBLE_CHARS: [char; 10] = [
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{FEFF}', // zero width no-break space (BOM)
    '\u{2060}', // word joiner
    '\u{2061}', // function application
    '\u{2062}', // invisible times
    '\u{2063}', // invisible separator
    '\u{2064}', // invisible plus
    '\u{180E}', // mongolian vowel separator
];

/// Characters that are invalid in file names on at least one major platform
const RESERVED_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

fn is_invisible(ch: char) -> bool {
    INVISIBLE_CHARS.contains(&ch)
}

/// Removes invisible Unicode characters from text
///
/// Emoji, Cyrillic and every other visible code point are kept in their original order.
///
/// # Examples
///
/// ```
/// use tg2md::utils::sanitize_text;
///
/// assert_eq!(sanitize_text("Hel\u{200B}lo 👋"), "Hello 👋");
/// ```
pub fn sanitize_text(text: &str) -> String {
    text.chars().filter(|&ch| !is_invisible(ch)).collect()
}

/// Converts a chat name into a file-system safe name
///
/// Spaces and reserved characters become underscores, runs of underscores collapse to one,
/// and leading/trailing underscores are trimmed.
///
/// # Examples
///
/// ```
/// use tg2md::utils::sanitize_name;
///
/// assert_eq!(sanitize_name("Чат: проекты / 2024"), "Чат_проекты_2024");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());

    for ch in name.chars() {
        let ch = if ch == ' ' || RESERVED_NAME_CHARS.contains(&ch) { '_' } else { ch };
        if ch == '_' && result.ends_with('_') {
            continue;
        }
        result.push(ch);
    }

    result.trim_matches('_').to_string()
}

/// Returns true if text holds nothing but whitespace and invisible characters
pub fn is_only_whitespace(text: &str) -> bool {
    text.chars().all(|ch| ch.is_whitespace() || is_invisible(ch))
}
