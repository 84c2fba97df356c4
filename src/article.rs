//! Article data structure representing the extraction output.
//!
//! This module defines the [`Article`] struct, which carries the cleaned
//! content and the metadata collected for a successfully processed page.
//!
//! ## Example
//!
//! ```rust,no_run
//! use readably::Readability;
//!
//! let html = r#"<html><body><article><h1>My Article</h1><p>Content...</p></article></body></html>"#;
//! let readability = Readability::new(html, Some("https://example.com"), None).unwrap();
//!
//! if let Some(article) = readability.parse() {
//!     println!("Title: {:?}", article.title);
//!     println!("Length: {} characters", article.length);
//!
//!     if let Some(content) = article.content {
//!         println!("HTML: {}", content);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// The extracted article: cleaned content plus structured metadata.
///
/// All string fields are optional because not every page carries every piece
/// of metadata. The `length` field is always present and is the character
/// count of the extracted text.
///
/// The struct derives `Serialize`/`Deserialize`, so persisting an article as
/// JSON is a one-liner:
///
/// ```rust,no_run
/// use readably::Readability;
/// # let html = "<html></html>";
/// # let readability = Readability::new(html, None, None).unwrap();
///
/// if let Some(article) = readability.parse() {
///     let json = serde_json::to_string_pretty(&article).unwrap();
///     println!("{}", json);
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Article {
    /// The article title, from JSON-LD or meta tags, falling back to the
    /// document `<title>` (with the site-name suffix stripped) and finally
    /// to a lone `<h1>`.
    pub title: Option<String>,

    /// Cleaned HTML of the article content: chrome removed, URLs made
    /// absolute, classes scrubbed.
    pub content: Option<String>,

    /// Plain text of the content with all markup removed.
    pub text_content: Option<String>,

    /// Character count of `text_content`.
    pub length: usize,

    /// Article description from metadata, else the first substantial
    /// paragraph of the extracted content.
    pub excerpt: Option<String>,

    /// Author name(s), comma-separated when several are credited.
    pub byline: Option<String>,

    /// Text direction from the root element: "ltr", "rtl" or "auto".
    pub dir: Option<String>,

    /// Name of the site or publication (`og:site_name` or JSON-LD publisher).
    pub site_name: Option<String>,

    /// Content language code from the root element or `Content-Language`.
    pub lang: Option<String>,

    /// Publication timestamp, typically ISO 8601, as found in metadata.
    pub published_time: Option<String>,
}

impl Article {
    pub fn new() -> Self {
        Self::default()
    }
}
