//! Terminal-safe text handling and URL checks.
//!
//! ```
//! use marquee::util::{clean_text, truncate_to_width, validate_url_for_open};
//!
//! assert_eq!(clean_text("Line one\n\x1b[31mline two\x1b[0m"), "Line one line two");
//! assert_eq!(truncate_to_width("The Shawshank Redemption", 12), "The Shaws...");
//! assert!(validate_url_for_open("https://image.tmdb.org/t/p/original/a.jpg").is_ok());
//! ```

mod text;
mod url_validator;

pub use text::{clean_text, display_width, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Longest search query accepted from the input bar.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
