pub mod sanitize;
pub mod terminal;

pub use sanitize::{is_only_whitespace, sanitize_name, sanitize_text};
pub use terminal::strip_ansi_codes;
