//! Quick readability check without full parsing.
//!
//! This module provides the [`is_probably_readerable`] function, a fast
//! pre-flight predicate that estimates whether a document carries enough
//! paragraph content to be worth a full extraction.
//!
//! ## Use Case
//!
//! ```rust
//! use readably::{is_probably_readerable, Readability};
//!
//! let html = "<html>...</html>";
//!
//! if is_probably_readerable(html, None) {
//!     let readability = Readability::new(html, None, None).unwrap();
//!     if let Some(article) = readability.parse() {
//!         println!("Article extracted!");
//!     }
//! } else {
//!     println!("Not an article page, skipping parse");
//! }
//! ```

use crate::constants::{DIV_TO_P_ELEMS, REGEXPS};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p, pre").unwrap());
static DIV_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div").unwrap());
static BR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("br").unwrap());

/// Options for the readability pre-flight check.
///
/// ## Example
///
/// ```rust
/// use readably::{is_probably_readerable, ReaderableOptions};
///
/// let html = "<html>...</html>";
///
/// let options = ReaderableOptions {
///     min_content_length: 200,
///     min_score: 30.0,
///     ..ReaderableOptions::default()
/// };
///
/// let readerable = is_probably_readerable(html, Some(options));
/// ```
#[derive(Debug, Clone)]
pub struct ReaderableOptions {
    /// Minimum text length before a paragraph contributes to the score.
    ///
    /// Default: `140`
    pub min_content_length: usize,

    /// Score the accumulated paragraphs must exceed.
    ///
    /// Default: `20.0`
    pub min_score: f64,

    /// Override for the visibility probe. When unset, inline style,
    /// `hidden` and `aria-hidden` attributes are consulted.
    pub visibility_checker: Option<fn(&ElementRef) -> bool>,
}

impl Default for ReaderableOptions {
    fn default() -> Self {
        Self {
            min_content_length: 140,
            min_score: 20.0,
            visibility_checker: None,
        }
    }
}

/// Decide quickly whether a document likely contains an extractable article.
///
/// Considers every `<p>` and `<pre>`, plus `<div>`s that hold a `<br>` but no
/// block children (line-broken text posing as paragraphs). Nodes matching the
/// unlikely-candidate patterns, invisible nodes and list-item paragraphs are
/// skipped. Each surviving node with at least `min_content_length` characters
/// adds `sqrt(len - min_content_length)` to a running score; the function
/// returns `true` as soon as the score exceeds `min_score`.
///
/// ## Example
///
/// ```rust
/// use readably::is_probably_readerable;
///
/// let paragraph = "Sentence with a reasonable number of words in it. ".repeat(10);
/// let article_html = format!(
///     "<html><body><article><p>{p}</p><p>{p}</p></article></body></html>",
///     p = paragraph
/// );
/// assert!(is_probably_readerable(&article_html, None));
///
/// assert!(!is_probably_readerable("<html><body><p>Short</p></body></html>", None));
/// ```
pub fn is_probably_readerable(html: &str, options: Option<ReaderableOptions>) -> bool {
    let options = options.unwrap_or_default();
    let document = Html::parse_document(html);

    let mut nodes: Vec<ElementRef> = document.select(&PARAGRAPH_SELECTOR).collect();
    for div in document.select(&DIV_SELECTOR) {
        if div.select(&BR_SELECTOR).next().is_some() && !has_block_child(&div) {
            nodes.push(div);
        }
    }

    let mut score = 0.0;
    for node in nodes {
        let visible = match options.visibility_checker {
            Some(checker) => checker(&node),
            None => element_is_probably_visible(&node),
        };
        if !visible {
            continue;
        }

        let class = node.value().attr("class").unwrap_or("");
        let id = node.value().attr("id").unwrap_or("");
        let match_string = format!("{} {}", class, id);
        if REGEXPS.unlikely_candidates.is_match(&match_string)
            && !REGEXPS.ok_maybe_its_a_candidate.is_match(&match_string)
        {
            continue;
        }

        // Paragraphs inside list items are navigation more often than prose.
        if node.value().name() == "p" && has_li_ancestor(&node) {
            continue;
        }

        let text = node.text().collect::<String>();
        let text_length = text.trim().chars().count();
        if text_length < options.min_content_length {
            continue;
        }

        score += ((text_length - options.min_content_length) as f64).sqrt();
        if score > options.min_score {
            return true;
        }
    }

    false
}

fn has_block_child(div: &ElementRef) -> bool {
    div.children().any(|child| {
        ElementRef::wrap(child)
            .map_or(false, |e| DIV_TO_P_ELEMS.contains(&e.value().name()))
    })
}

fn has_li_ancestor(node: &ElementRef) -> bool {
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "li")
}

fn element_is_probably_visible(node: &ElementRef) -> bool {
    if let Some(style) = node.value().attr("style") {
        if REGEXPS.display_none.is_match(style) || REGEXPS.visibility_hidden.is_match(style) {
            return false;
        }
    }

    if node.value().attr("hidden").is_some() {
        return false;
    }

    if node.value().attr("aria-hidden") == Some("true") {
        let class = node.value().attr("class").unwrap_or("");
        if !class.split_whitespace().any(|c| c == "fallback-image") {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeated(text: &str, times: usize) -> String {
        text.repeat(times)
    }

    #[test]
    fn test_readerable_article() {
        let paragraph = repeated("Plenty of honest sentence content here. ", 8);
        let html = format!(
            "<html><body><article><p>{p}</p><p>{p}</p></article></body></html>",
            p = paragraph
        );
        assert!(is_probably_readerable(&html, None));
    }

    #[test]
    fn test_short_content_is_not_readerable() {
        let html = "<html><body><p>Short</p></body></html>";
        assert!(!is_probably_readerable(html, None));
    }

    #[test]
    fn test_unlikely_class_is_skipped() {
        let paragraph = repeated("Plenty of honest sentence content here. ", 8);
        let html = format!(
            r#"<html><body><p class="sidebar">{p}</p><p class="sidebar">{p}</p></body></html>"#,
            p = paragraph
        );
        assert!(!is_probably_readerable(&html, None));
    }

    #[test]
    fn test_hidden_content_is_skipped() {
        let paragraph = repeated("Plenty of honest sentence content here. ", 8);
        let html = format!(
            r#"<html><body><p style="display:none">{p}</p><p hidden>{p}</p></body></html>"#,
            p = paragraph
        );
        assert!(!is_probably_readerable(&html, None));
    }

    #[test]
    fn test_list_item_paragraphs_do_not_count() {
        let paragraph = repeated("Plenty of honest sentence content here. ", 8);
        let html = format!(
            "<html><body><ul><li><p>{p}</p></li><li><p>{p}</p></li></ul></body></html>",
            p = paragraph
        );
        assert!(!is_probably_readerable(&html, None));
    }

    #[test]
    fn test_div_with_br_counts_as_paragraph() {
        let line = repeated("Line-broken prose standing in for paragraphs. ", 8);
        let html = format!(
            "<html><body><div>{l}<br>{l}</div><div>{l}<br>{l}</div></body></html>",
            l = line
        );
        assert!(is_probably_readerable(&html, None));
    }

    #[test]
    fn test_custom_visibility_checker() {
        let paragraph = repeated("Plenty of honest sentence content here. ", 8);
        let html = format!("<html><body><p>{p}</p><p>{p}</p></body></html>", p = paragraph);

        fn nothing_visible(_: &ElementRef) -> bool {
            false
        }

        let options = ReaderableOptions {
            visibility_checker: Some(nothing_visible),
            ..ReaderableOptions::default()
        };
        assert!(!is_probably_readerable(&html, Some(options)));
    }

    #[test]
    fn test_threshold_overrides() {
        // 12 repetitions of "hello there " is 144 characters.
        let text = repeated("hello there ", 12);
        let html = format!("<html><body><p>{}</p></body></html>", text);

        assert!(!is_probably_readerable(&html, None));

        let options = ReaderableOptions {
            min_content_length: 0,
            min_score: 4.0,
            ..ReaderableOptions::default()
        };
        assert!(is_probably_readerable(&html, Some(options)));
    }
}
