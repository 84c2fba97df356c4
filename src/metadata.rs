//! Metadata extraction from HTML documents (JSON-LD, meta tags, etc.).

use crate::constants::REGEXPS;
use crate::utils;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::HashMap;

static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());
static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Metadata extracted from the document
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
    pub lang: Option<String>,
    pub dir: Option<String>,
}

/// Extract JSON-LD structured data from the document.
///
/// Looks for `<script type="application/ld+json">` blocks carrying a
/// schema.org Article (or subtype) and pulls out headline, author,
/// description, publisher and publication date. Blocks that fail to parse
/// or describe something other than an article are ignored.
pub fn get_json_ld(document: &Html) -> Metadata {
    let mut metadata = Metadata::default();

    for script in document.select(&JSON_LD_SELECTOR) {
        let content = script.text().collect::<String>();
        let content = content
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>")
            .trim();

        let Ok(mut parsed) = serde_json::from_str::<Value>(content) else {
            continue;
        };

        // A top-level array holds several entities; take the article.
        if let Some(items) = parsed.as_array() {
            match items.iter().find(|item| is_article_type(item)) {
                Some(article) => parsed = article.clone(),
                None => continue,
            }
        }

        if !has_schema_org_context(&parsed) {
            continue;
        }

        if parsed.get("@type").is_none() {
            if let Some(graph) = parsed.get("@graph").and_then(|g| g.as_array()) {
                if let Some(article) = graph.iter().find(|item| is_article_type(item)) {
                    parsed = article.clone();
                }
            }
        }

        if !is_article_type(&parsed) {
            continue;
        }

        if metadata.title.is_none() {
            metadata.title = json_ld_title(&parsed);
        }

        if metadata.byline.is_none() {
            metadata.byline = json_ld_author(&parsed);
        }

        if metadata.excerpt.is_none() {
            if let Some(description) = parsed.get("description").and_then(|v| v.as_str()) {
                metadata.excerpt = Some(description.trim().to_string());
            }
        }

        if metadata.site_name.is_none() {
            if let Some(name) = parsed
                .get("publisher")
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str())
            {
                metadata.site_name = Some(name.trim().to_string());
            }
        }

        if metadata.published_time.is_none() {
            if let Some(date) = parsed.get("datePublished").and_then(|v| v.as_str()) {
                metadata.published_time = Some(date.trim().to_string());
            }
        }
    }

    metadata
}

fn is_article_type(value: &Value) -> bool {
    value
        .get("@type")
        .and_then(|t| t.as_str())
        .map_or(false, |t| REGEXPS.json_ld_article_types.is_match(t))
}

fn has_schema_org_context(value: &Value) -> bool {
    match value.get("@context") {
        Some(Value::String(context)) => REGEXPS.schema_org_url.is_match(context),
        Some(Value::Object(context)) => context
            .get("@vocab")
            .and_then(|v| v.as_str())
            .map_or(false, |v| REGEXPS.schema_org_url.is_match(v)),
        _ => false,
    }
}

/// Schema.org is loose about `name` vs `headline`: `name` sometimes holds
/// the publisher rather than the article title.
fn json_ld_title(parsed: &Value) -> Option<String> {
    let name = parsed.get("name").and_then(|v| v.as_str());
    let headline = parsed.get("headline").and_then(|v| v.as_str());
    let publisher = parsed
        .get("publisher")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str());

    match (name, headline, publisher) {
        (Some(name), Some(headline), Some(publisher)) if name.trim() == publisher.trim() => {
            Some(headline.trim().to_string())
        }
        (Some(name), _, _) => Some(name.trim().to_string()),
        (None, Some(headline), _) => Some(headline.trim().to_string()),
        _ => None,
    }
}

fn json_ld_author(parsed: &Value) -> Option<String> {
    let author = parsed.get("author")?;

    if let Some(name) = author.as_str() {
        return Some(name.trim().to_string());
    }
    if let Some(name) = author.get("name").and_then(|v| v.as_str()) {
        return Some(name.trim().to_string());
    }
    if let Some(authors) = author.as_array() {
        let names: Vec<String> = authors
            .iter()
            .filter_map(|a| {
                a.as_str()
                    .or_else(|| a.get("name").and_then(|n| n.as_str()))
            })
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if !names.is_empty() {
            return Some(names.join(", "));
        }
    }
    None
}

/// Extract article metadata from meta tags, JSON-LD values winning where
/// present.
///
/// Supports OpenGraph, Twitter Cards, Dublin Core and plain meta names.
pub fn get_article_metadata(document: &Html, json_ld: Metadata) -> Metadata {
    let values = collect_meta_values(document);
    let get = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .filter_map(|key| values.get(*key))
            .find(|value| !value.is_empty())
            .cloned()
    };

    let mut metadata = Metadata::default();

    metadata.title = json_ld.title.or_else(|| {
        get(&[
            "dc:title",
            "dcterm:title",
            "og:title",
            "twitter:title",
            "title",
            "weibo:article:title",
            "weibo:webpage:title",
        ])
    });
    if metadata.title.as_deref().map_or(true, str::is_empty) {
        metadata.title = extract_title_from_document(document);
    }

    metadata.byline = json_ld
        .byline
        .or_else(|| get(&["dc:creator", "dcterm:creator", "author"]));

    metadata.excerpt = json_ld.excerpt.or_else(|| {
        get(&[
            "dc:description",
            "dcterm:description",
            "og:description",
            "twitter:description",
            "description",
        ])
    });

    metadata.site_name = json_ld.site_name.or_else(|| get(&["og:site_name"]));

    metadata.published_time = json_ld
        .published_time
        .or_else(|| get(&["article:published_time"]));

    metadata.lang = extract_language_from_document(document);
    metadata.dir = document
        .root_element()
        .value()
        .attr("dir")
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty());

    metadata.title = metadata
        .title
        .map(|t| utils::unescape_html_entities(&t))
        .filter(|t| !t.is_empty());
    metadata.byline = metadata
        .byline
        .map(|b| utils::unescape_html_entities(&b))
        .filter(|b| !b.trim().is_empty());
    metadata.excerpt = metadata
        .excerpt
        .map(|e| utils::unescape_html_entities(&e))
        .filter(|e| !e.trim().is_empty());
    metadata.site_name = metadata.site_name.map(|s| utils::unescape_html_entities(&s));
    metadata.published_time = metadata
        .published_time
        .map(|p| utils::unescape_html_entities(&p));

    metadata
}

/// Gather `<meta>` values into a key → content map. Keys are derived from
/// `property`, `name` or `itemprop`, lower-cased with whitespace removed and
/// `.` normalized to `:`.
fn collect_meta_values(document: &Html) -> HashMap<String, String> {
    static PROPERTY_PATTERN: Lazy<regex::Regex> = Lazy::new(|| {
        regex::Regex::new(
            r"(?i)\s*(article|dc|dcterm|og|twitter|weibo:article|weibo:webpage)\s*:\s*(author|creator|description|published_time|title|site_name)\s*",
        )
        .unwrap()
    });
    static NAME_PATTERN: Lazy<regex::Regex> = Lazy::new(|| {
        regex::Regex::new(
            r"(?i)^\s*(?:(?:dc|dcterm|og|twitter|article|weibo:(?:article|webpage))\s*[-\.:]\s*)?(author|creator|description|published_time|title|site_name)\s*$",
        )
        .unwrap()
    });

    let mut values = HashMap::new();

    for meta in document.select(&META_SELECTOR) {
        let content = match meta.value().attr("content") {
            Some(content) if !content.is_empty() => content,
            _ => continue,
        };

        let mut matched = false;
        if let Some(property) = meta.value().attr("property") {
            // Space-separated property lists are legal.
            for prop in property.split_whitespace() {
                if let Some(m) = PROPERTY_PATTERN.find(prop) {
                    let key = prop[m.start()..m.end()]
                        .to_lowercase()
                        .replace(char::is_whitespace, "");
                    values.insert(key, content.trim().to_string());
                    matched = true;
                }
            }
        }

        if !matched {
            let name_like = meta.value().attr("name").or_else(|| meta.value().attr("itemprop"));
            if let Some(name) = name_like {
                if NAME_PATTERN.is_match(name) {
                    let key = name
                        .to_lowercase()
                        .replace(char::is_whitespace, "")
                        .replace('.', ":");
                    values.insert(key, content.trim().to_string());
                }
            }
        }
    }

    values
}

/// Extract language from the root element or `Content-Language` meta tags.
fn extract_language_from_document(document: &Html) -> Option<String> {
    if let Some(lang) = document.root_element().value().attr("lang") {
        let lang = lang.trim();
        if !lang.is_empty() {
            return Some(lang.to_string());
        }
    }

    static CONTENT_LANGUAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
        Selector::parse(
            "meta[http-equiv='Content-Language'], meta[http-equiv='content-language']",
        )
        .unwrap()
    });
    for meta in document.select(&CONTENT_LANGUAGE_SELECTOR) {
        if let Some(content) = meta.value().attr("content") {
            let lang = content.trim();
            if !lang.is_empty() {
                return Some(lang.to_string());
            }
        }
    }

    None
}

/// The document `<title>`, with the trailing site name stripped when the
/// remaining head still reads like a headline.
fn extract_title_from_document(document: &Html) -> Option<String> {
    let title_element = document.select(&TITLE_SELECTOR).next()?;
    let orig_title = utils::normalize_whitespace(&title_element.text().collect::<String>());
    if orig_title.is_empty() {
        return None;
    }

    let mut cur_title = orig_title.clone();

    if let Some(last_separator) = REGEXPS
        .title_separators
        .find_iter(&orig_title)
        .last()
    {
        // Assume the part after the final separator is the site name.
        cur_title = orig_title[..last_separator.start()].to_string();
        if utils::word_count(&cur_title) < 3 {
            // Too short: the site name probably leads instead.
            if let Some(first_separator) = REGEXPS.title_separators.find(&orig_title) {
                cur_title = orig_title[first_separator.end()..].to_string();
            }
        }
    } else if cur_title.contains(": ") {
        let matches_heading = document
            .select(&HEADING_SELECTOR)
            .any(|h| utils::normalize_whitespace(&h.text().collect::<String>()) == cur_title);

        if !matches_heading {
            if let Some(last_colon) = orig_title.rfind(':') {
                let after = orig_title[last_colon + 1..].trim();
                if utils::word_count(after) >= 3 {
                    cur_title = after.to_string();
                } else if let Some(first_colon) = orig_title.find(':') {
                    let before = &orig_title[..first_colon];
                    if utils::word_count(before) > 5 {
                        cur_title = orig_title.clone();
                    } else {
                        cur_title = orig_title[first_colon + 1..].trim().to_string();
                    }
                }
            }
        }
    } else if cur_title.chars().count() > 150 || cur_title.chars().count() < 15 {
        let h1s: Vec<ElementRef> = document.select(&H1_SELECTOR).collect();
        if h1s.len() == 1 {
            cur_title = utils::normalize_whitespace(&h1s[0].text().collect::<String>());
        }
    }

    cur_title = utils::normalize_whitespace(&cur_title);

    // A headline shorter than three words is more likely the site name than
    // the article title; fall back to the full text.
    if utils::word_count(&cur_title) < 3 {
        cur_title = orig_title;
    }

    Some(cur_title)
}
