//! # readably
//!
//! Reader-mode article extraction for Rust: pull the main readable content
//! and its metadata out of noisy HTML.
//!
//! ## Overview
//!
//! Given an arbitrary web page, readably identifies the subtree holding the
//! article a human reader cares about and discards navigation, sidebars,
//! advertising, comments and other chrome. Alongside the cleaned content it
//! extracts metadata: title, author (byline), excerpt, site name, publication
//! time, language and text direction.
//!
//! ## Key Features
//!
//! - **Content extraction**: a multi-pass scoring algorithm over the parsed
//!   document picks, promotes and prunes the best candidate subtree
//! - **Metadata extraction**: meta tags and JSON-LD structured data
//! - **Adaptive retries**: heuristics are relaxed step by step for pages
//!   that resist the strict pass
//! - **Pre-flight check**: [`is_probably_readerable`] answers cheaply
//!   whether a full parse is worth it
//! - **Configurable**: thresholds, preserved classes, video allow-list,
//!   custom serializer
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use readably::{Readability, ReadabilityOptions};
//!
//! let html = r#"<html><body><article><h1>Title</h1><p>Content...</p></article></body></html>"#;
//! let url = "https://example.com/article";
//!
//! let readability = Readability::new(html, Some(url), None).unwrap();
//!
//! if let Some(article) = readability.parse() {
//!     println!("Title: {:?}", article.title);
//!     println!("Content: {:?}", article.content);
//!     println!("Author: {:?}", article.byline);
//! }
//! ```
//!
//! ## Custom Options
//!
//! ```rust,no_run
//! use readably::{Readability, ReadabilityOptions};
//!
//! let html = "<html>...</html>";
//!
//! let options = ReadabilityOptions::builder()
//!     .char_threshold(300)
//!     .nb_top_candidates(10)
//!     .keep_classes(true)
//!     .build();
//!
//! let readability = Readability::new(html, None, Some(options)).unwrap();
//! let article = readability.parse();
//! ```
//!
//! ## Pre-flight Check
//!
//! ```rust,no_run
//! use readably::is_probably_readerable;
//!
//! let html = "<html>...</html>";
//!
//! if is_probably_readerable(html, None) {
//!     // Proceed with full parsing
//! } else {
//!     // Skip parsing or use an alternative strategy
//! }
//! ```
//!
//! ## Algorithm
//!
//! Extraction runs in phases. The working tree is first prepared: scripts and
//! styles are stripped, `<noscript>` image fallbacks unwrapped, `<br>` runs
//! folded into paragraphs and data tables marked. Scorable blocks then earn
//! points for text length and punctuation, propagating their score to nearby
//! ancestors with depth decay. The best-scored candidate is selected, possibly
//! promoted to a parent that holds more of the story, and merged with sibling
//! blocks that resemble it. The assembled article is cleaned of forms, embeds,
//! share widgets and link farms, and finally post-processed: URLs absolutized,
//! classes scrubbed and redundant wrappers collapsed. Attempts that yield too
//! little text are retried with the heuristics progressively relaxed.
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use readably::{Readability, ReadabilityError};
//!
//! let html = "<html>...</html>";
//! let url = "not a valid url";
//!
//! match Readability::new(html, Some(url), None) {
//!     Ok(readability) => {
//!         if let Some(article) = readability.parse() {
//!             println!("Success!");
//!         }
//!     }
//!     Err(ReadabilityError::InvalidUrl(url)) => {
//!         eprintln!("Invalid URL: {}", url);
//!     }
//!     Err(e) => {
//!         eprintln!("Error: {}", e);
//!     }
//! }
//! ```

mod article;
mod cleaner;
mod constants;
mod content_extractor;
mod dom_utils;
mod error;
mod metadata;
mod options;
mod post_processor;
mod readability;
mod readerable;
mod scoring;
mod utils;

// Public exports
pub use article::Article;
pub use error::{ReadabilityError, Result};
pub use options::{ReadabilityOptions, ReadabilityOptionsBuilder};
pub use readability::Readability;
pub use readerable::{is_probably_readerable, ReaderableOptions};
