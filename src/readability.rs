//! Main Readability struct and parse implementation.
//!
//! This module contains the primary [`Readability`] struct which orchestrates
//! the entire article extraction pipeline.
//!
//! ## Example
//!
//! ```rust,no_run
//! use readably::Readability;
//!
//! let html = std::fs::read_to_string("article.html").unwrap();
//! let url = "https://example.com/article";
//!
//! let readability = Readability::new(&html, Some(url), None)?;
//!
//! if let Some(article) = readability.parse() {
//!     println!("Title: {:?}", article.title);
//!     println!("Author: {:?}", article.byline);
//!     println!("Content length: {} chars", article.length);
//!
//!     if let Some(content) = article.content {
//!         std::fs::write("output.html", content)?;
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    article::Article,
    content_extractor, dom_utils,
    error::{ReadabilityError, Result},
    metadata::{self, Metadata},
    options::ReadabilityOptions,
    post_processor, utils,
};
use kuchikikiki::NodeRef;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ANY_ELEMENT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("*").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Maximum characters an auto-generated excerpt keeps.
const EXCERPT_MAX_CHARS: usize = 300;

/// The main extraction entry point.
///
/// Construct with [`Readability::new()`], then call
/// [`parse()`](Readability::parse) to run the pipeline. The result is an
/// [`Article`] with the cleaned content and its metadata, or `None` when no
/// attempt produced enough readable text.
///
/// ## Example
///
/// ```rust
/// use readably::Readability;
///
/// let html = r#"
///     <html>
///     <head><title>Article Title</title></head>
///     <body>
///         <article>
///             <h1>Article Title</h1>
///             <p>First paragraph of content, which continues for a while so the
///             scorer has something to hold on to when it weighs this block.</p>
///             <p>Second paragraph of content with yet more readable text in it,
///             comfortably pushing this past the attempt threshold. The block now
///             reads like a real story rather than boilerplate chrome.</p>
///         </article>
///     </body>
///     </html>
/// "#;
///
/// let readability = Readability::new(html, None, None)?;
/// match readability.parse() {
///     Some(article) => println!("Extracted {} characters", article.length),
///     None => println!("Could not extract article content"),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Readability {
    /// The parsed document, used for metadata extraction
    document: Html,

    /// Original HTML, re-parsed into a fresh working tree per grab attempt
    html: String,

    /// Base URL for resolving relative links
    base_url: Option<String>,

    /// Configuration options
    options: ReadabilityOptions,
}

impl Readability {
    /// Create a new Readability instance
    ///
    /// # Arguments
    /// * `html` - The HTML content to parse
    /// * `url` - Optional base URL for resolving relative links
    /// * `options` - Optional configuration options
    pub fn new(html: &str, url: Option<&str>, options: Option<ReadabilityOptions>) -> Result<Self> {
        let document = Html::parse_document(html);

        let base_url = url
            .map(|u| {
                if utils::is_url(u) {
                    Ok(u.to_string())
                } else {
                    Err(ReadabilityError::InvalidUrl(u.to_string()))
                }
            })
            .transpose()?;

        Ok(Self {
            document,
            html: html.to_string(),
            base_url,
            options: options.unwrap_or_default(),
        })
    }

    /// Run the pipeline and extract the article.
    ///
    /// Returns `None` when the document exceeds `max_elems_to_parse` or when
    /// no extraction attempt yields content.
    pub fn parse(self) -> Option<Article> {
        if self.options.max_elems_to_parse > 0 {
            let element_count = self.document.select(&ANY_ELEMENT_SELECTOR).count();
            if element_count > self.options.max_elems_to_parse {
                self.log(&format!(
                    "aborting: {} elements exceeds the configured limit",
                    element_count
                ));
                return None;
            }
        }

        let json_ld = if self.options.disable_json_ld {
            Metadata::default()
        } else {
            metadata::get_json_ld(&self.document)
        };
        let document_metadata = metadata::get_article_metadata(&self.document, json_ld);

        let extraction = content_extractor::extract(&self.html, &self.options)?;
        post_processor::post_process_content(
            &extraction.content,
            self.base_url.as_deref(),
            &self.options,
        );

        let content = match self.options.serializer {
            Some(serializer) => serializer(&extraction.content),
            None => dom_utils::serialize_children(&extraction.content),
        };
        let text_content = dom_utils::inner_text(&extraction.content, true);
        let length = text_content.chars().count();

        let title = document_metadata
            .title
            .clone()
            .or_else(|| self.single_h1_text());
        let byline = document_metadata.byline.clone().or(extraction.byline);
        let excerpt = document_metadata
            .excerpt
            .clone()
            .or_else(|| generate_excerpt(&extraction.content));

        Some(Article {
            title,
            content: Some(content),
            text_content: Some(text_content),
            length,
            excerpt,
            byline,
            dir: document_metadata.dir.clone(),
            site_name: document_metadata.site_name.clone(),
            lang: document_metadata.lang.clone(),
            published_time: document_metadata.published_time.clone(),
        })
    }

    /// A lone `<h1>` doubles as the headline when metadata has none.
    fn single_h1_text(&self) -> Option<String> {
        let mut headings = self.document.select(&H1_SELECTOR);
        let first = headings.next()?;
        if headings.next().is_some() {
            return None;
        }
        let text = utils::normalize_whitespace(&first.text().collect::<String>());
        (!text.is_empty()).then_some(text)
    }

    fn log(&self, message: &str) {
        if self.options.debug {
            eprintln!("Reader: (Readability) {}", message);
        }
    }
}

/// First substantial paragraph of the article, truncated at a word boundary.
fn generate_excerpt(content: &NodeRef) -> Option<String> {
    for paragraph in dom_utils::get_elements_by_tag_name(content, "p") {
        let text = dom_utils::inner_text(&paragraph, true);
        if text.chars().count() < 25 {
            continue;
        }
        if dom_utils::link_density(&paragraph) > 0.8 {
            continue;
        }
        return Some(utils::truncate_at_word_boundary(&text, EXCERPT_MAX_CHARS));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lorem(sentences: usize) -> String {
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
         tempor incididunt ut labore et dolore magna aliqua. "
            .repeat(sentences)
    }

    #[test]
    fn test_new_readability() {
        let html = r#"<html><body><p>Test</p></body></html>"#;
        assert!(Readability::new(html, None, None).is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let html = r#"<html><body><p>Test</p></body></html>"#;
        let result = Readability::new(html, Some("not a url"), None);
        assert!(matches!(result, Err(ReadabilityError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_simple_article() {
        let html = format!(
            r#"<html><head><title>Simple | Site</title></head>
               <body><article><h1>Simple</h1><p>{}</p></article></body></html>"#,
            lorem(6)
        );

        let readability = Readability::new(&html, None, None).unwrap();
        let article = readability.parse().unwrap();

        assert_eq!(article.title.as_deref(), Some("Simple | Site"));
        assert!(article.length > 500);
        assert_eq!(
            article.length,
            article.text_content.as_ref().unwrap().chars().count()
        );
        assert!(article.content.unwrap().contains("Lorem ipsum"));
    }

    #[test]
    fn test_title_falls_back_to_single_h1() {
        let html = format!(
            "<html><body><article><h1>Only Headline</h1><p>{}</p></article></body></html>",
            lorem(6)
        );
        let article = Readability::new(&html, None, None).unwrap().parse().unwrap();
        assert_eq!(article.title.as_deref(), Some("Only Headline"));
    }

    #[test]
    fn test_max_elems_to_parse() {
        let html = format!(
            "<html><body><article><p>{}</p></article></body></html>",
            lorem(6)
        );
        let options = ReadabilityOptions::builder().max_elems_to_parse(2).build();
        let article = Readability::new(&html, None, Some(options)).unwrap().parse();
        assert!(article.is_none());
    }

    #[test]
    fn test_excerpt_from_first_paragraph() {
        let html = format!(
            "<html><body><article><p>{}</p><p>{}</p></article></body></html>",
            lorem(3),
            lorem(3)
        );
        let article = Readability::new(&html, None, None).unwrap().parse().unwrap();
        let excerpt = article.excerpt.unwrap();
        assert!(excerpt.starts_with("Lorem ipsum"));
        assert!(excerpt.chars().count() <= 300);
    }

    #[test]
    fn test_custom_serializer() {
        fn text_only(node: &kuchikikiki::NodeRef) -> String {
            node.text_contents()
        }

        let html = format!(
            "<html><body><article><p>{}</p></article></body></html>",
            lorem(6)
        );
        let options = ReadabilityOptions::builder().serializer(text_only).build();
        let article = Readability::new(&html, None, Some(options)).unwrap().parse().unwrap();
        let content = article.content.unwrap();
        assert!(!content.contains('<'));
        assert!(content.contains("Lorem ipsum"));
    }
}
