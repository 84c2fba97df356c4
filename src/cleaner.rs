//! Document preparation ahead of scoring.
//!
//! Runs once per grab attempt on a freshly parsed tree: unwraps the
//! `<noscript>` image pattern, strips scripts and styles, folds `<br>` runs
//! into paragraphs, normalizes `<font>` and lazy images, and marks data
//! tables so the conditional cleaner can spare them later.

use crate::constants::REGEXPS;
use crate::dom_utils as dom;
use crate::scoring::Scratch;
use kuchikikiki::traits::TendrilSink;
use kuchikikiki::NodeRef;

/// The full preparation pass.
pub fn prep_document(doc: &NodeRef, scratch: &mut Scratch) {
    unwrap_noscript_images(doc);
    remove_nodes_by_tag(doc, "script");
    remove_nodes_by_tag(doc, "noscript");
    remove_nodes_by_tag(doc, "style");

    if let Ok(body) = doc.select_first("body") {
        replace_brs(body.as_node());
    }

    for font in dom::get_elements_by_tag_name(doc, "font") {
        dom::set_node_tag(&font, "span");
    }

    fix_lazy_images(doc);
    mark_data_tables(doc, scratch);
}

fn remove_nodes_by_tag(doc: &NodeRef, tag: &str) {
    for node in dom::get_elements_by_tag_name(doc, tag) {
        node.detach();
    }
}

/// Find the `<noscript>` fallback for a lazily loaded image and promote it
/// over the placeholder that precedes it. The parser treats `<noscript>`
/// content as raw text, so the fallback markup is re-parsed on its own.
fn unwrap_noscript_images(doc: &NodeRef) {
    // Images with no source at all are parser artifacts.
    for img in dom::get_elements_by_tag_name(doc, "img") {
        let has_source = img.as_element().map_or(false, |element| {
            element.attributes.borrow().map.iter().any(|(name, attr)| {
                matches!(
                    name.local.as_ref(),
                    "src" | "srcset" | "data-src" | "data-srcset"
                ) || REGEXPS.img_extensions.is_match(&attr.value)
            })
        });
        if !has_source {
            img.detach();
        }
    }

    for noscript in dom::get_elements_by_tag_name(doc, "noscript") {
        let inner = noscript.text_contents();
        let fragment = kuchikikiki::parse_html().one(inner.as_str());
        let fragment_body = match fragment.select_first("body") {
            Ok(body) => body.as_node().clone(),
            Err(()) => continue,
        };
        if !dom::is_single_image(&fragment_body) {
            continue;
        }
        let new_img = match dom::get_elements_by_tag_name(&fragment_body, "img").into_iter().next()
        {
            Some(img) => img,
            None => continue,
        };

        let prev = match noscript
            .preceding_siblings()
            .find(|sibling| sibling.as_element().is_some())
        {
            Some(prev) => prev,
            None => continue,
        };
        if !dom::is_single_image(&prev) {
            continue;
        }

        let prev_img = if dom::is_tag(&prev, "img") {
            prev.clone()
        } else {
            match dom::get_elements_by_tag_name(&prev, "img").into_iter().next() {
                Some(img) => img,
                None => continue,
            }
        };

        // Carry the placeholder's loading attributes over when the fallback
        // image does not set them itself.
        if let Some(prev_element) = prev_img.as_element() {
            let attributes: Vec<(String, String)> = prev_element
                .attributes
                .borrow()
                .map
                .iter()
                .map(|(name, attr)| (name.local.as_ref().to_string(), attr.value.clone()))
                .collect();
            for (name, value) in attributes {
                if value.is_empty() {
                    continue;
                }
                let carries = matches!(
                    name.as_str(),
                    "src" | "srcset" | "data-src" | "data-srcset"
                );
                if carries && dom::get_attr(&new_img, &name).is_none() {
                    dom::set_attr(&new_img, &name, &value);
                }
            }
        }

        prev.insert_before(new_img);
        prev.detach();
    }
}

/// Collapse runs of two or more `<br>`s into paragraph breaks, pulling the
/// phrasing content that follows each run into a new `<p>`.
fn replace_brs(root: &NodeRef) {
    for br in dom::get_elements_by_tag_name(root, "br") {
        if br.parent().is_none() {
            continue;
        }

        let mut next = br.next_sibling();
        let mut replaced = false;
        while let Some(sibling) = dom::next_significant_node(next) {
            if !dom::is_tag(&sibling, "br") {
                break;
            }
            replaced = true;
            next = sibling.next_sibling();
            sibling.detach();
        }
        if !replaced {
            continue;
        }

        let p = dom::create_element("p");
        br.insert_before(p.clone());
        br.detach();

        let mut sibling = p.next_sibling();
        while let Some(node) = sibling {
            // Stop at the next <br><br> run.
            if dom::is_tag(&node, "br") {
                if let Some(after) = dom::next_significant_node(node.next_sibling()) {
                    if dom::is_tag(&after, "br") {
                        break;
                    }
                }
            }
            if !dom::is_phrasing_content(&node) {
                break;
            }
            let next_sibling = node.next_sibling();
            p.append(node);
            sibling = next_sibling;
        }

        while let Some(last) = p.last_child() {
            if dom::is_whitespace_text(&last) {
                last.detach();
            } else {
                break;
            }
        }

        if let Some(parent) = p.parent() {
            if dom::is_tag(&parent, "p") {
                dom::set_node_tag(&parent, "div");
            }
        }
    }
}

/// Recover real image sources from lazy-loading attributes and drop tiny
/// base64 placeholders.
fn fix_lazy_images(root: &NodeRef) {
    let mut nodes = Vec::new();
    for tag in ["img", "picture", "figure"] {
        nodes.extend(dom::get_elements_by_tag_name(root, tag));
    }

    for node in nodes {
        let src = dom::get_attr(&node, "src").unwrap_or_default();
        let srcset = dom::get_attr(&node, "srcset").unwrap_or_default();
        let class = dom::get_attr(&node, "class").unwrap_or_default();

        if let Some(caps) = REGEXPS.b64_data_url.captures(&src) {
            // An SVG data URI can encode a meaningful image in very few
            // bytes, so only raster placeholders are considered junk.
            if !caps[1].eq_ignore_ascii_case("image/svg+xml") {
                let has_other_source = node.as_element().map_or(false, |element| {
                    element.attributes.borrow().map.iter().any(|(name, attr)| {
                        name.local.as_ref() != "src"
                            && REGEXPS.img_extensions.is_match(&attr.value)
                    })
                });
                let payload_len = src.len() - caps.get(0).map_or(0, |m| m.end());
                if has_other_source && payload_len < 133 {
                    dom::remove_attr(&node, "src");
                }
            }
        }

        let src = dom::get_attr(&node, "src").unwrap_or_default();
        if (!src.is_empty() || !srcset.is_empty()) && !class.to_lowercase().contains("lazy") {
            continue;
        }

        // The common lazy-loading attributes first, then anything that
        // looks like an image URL.
        if let Some(data_src) = dom::get_attr(&node, "data-src") {
            if !data_src.is_empty() {
                copy_image_source(&node, "src", &data_src);
            }
        }
        if let Some(data_srcset) = dom::get_attr(&node, "data-srcset") {
            if !data_srcset.is_empty() {
                copy_image_source(&node, "srcset", &data_srcset);
            }
        }

        let attributes: Vec<(String, String)> = match node.as_element() {
            Some(element) => element
                .attributes
                .borrow()
                .map
                .iter()
                .map(|(name, attr)| (name.local.as_ref().to_string(), attr.value.clone()))
                .collect(),
            None => continue,
        };
        for (name, value) in attributes {
            if matches!(name.as_str(), "src" | "srcset" | "alt") {
                continue;
            }
            if REGEXPS.img_url_with_descriptor.is_match(&value) {
                copy_image_source(&node, "srcset", &value);
            } else if REGEXPS.img_url.is_match(&value) {
                copy_image_source(&node, "src", &value);
            }
        }
    }
}

fn copy_image_source(node: &NodeRef, target: &str, value: &str) {
    if dom::is_tag(node, "img") || dom::is_tag(node, "picture") {
        if dom::get_attr(node, target).map_or(true, |v| v.is_empty()) {
            dom::set_attr(node, target, value);
        }
    } else if dom::is_tag(node, "figure")
        && dom::get_elements_by_tag_name(node, "img").is_empty()
        && dom::get_elements_by_tag_name(node, "picture").is_empty()
    {
        let img = dom::create_element("img");
        dom::set_attr(&img, target, value);
        node.append(img);
    }
}

/// Classify every `<table>` as data or layout. Data tables are never removed
/// by the conditional cleaner.
pub fn mark_data_tables(root: &NodeRef, scratch: &mut Scratch) {
    for table in dom::get_elements_by_tag_name(root, "table") {
        let role = dom::get_attr(&table, "role").unwrap_or_default();
        if role.eq_ignore_ascii_case("presentation") {
            continue;
        }
        if dom::get_attr(&table, "datatable").as_deref() == Some("0") {
            continue;
        }

        if matches!(
            role.to_lowercase().as_str(),
            "grid" | "list" | "treegrid"
        ) {
            scratch.mark_data_table(&table);
            continue;
        }
        if dom::get_attr(&table, "summary").is_some() {
            scratch.mark_data_table(&table);
            continue;
        }

        let caption_has_text = dom::get_elements_by_tag_name(&table, "caption")
            .iter()
            .any(|caption| !caption.text_contents().trim().is_empty());
        if caption_has_text {
            scratch.mark_data_table(&table);
            continue;
        }

        let data_descendants = ["col", "colgroup", "tfoot", "thead", "th"];
        if data_descendants
            .iter()
            .any(|tag| !dom::get_elements_by_tag_name(&table, tag).is_empty())
        {
            scratch.mark_data_table(&table);
            continue;
        }

        let has_spanning_cell = ["td", "th"].iter().any(|tag| {
            dom::get_elements_by_tag_name(&table, tag).iter().any(|cell| {
                dom::get_attr(cell, "colspan").is_some() || dom::get_attr(cell, "rowspan").is_some()
            })
        });
        if has_spanning_cell {
            scratch.mark_data_table(&table);
            continue;
        }

        // Nested tables mean layout.
        if !dom::get_elements_by_tag_name(&table, "table").is_empty() {
            continue;
        }

        let (rows, columns) = dom::get_row_and_column_count(&table);
        if rows >= 10 || columns >= 4 || rows * columns > 10 {
            scratch.mark_data_table(&table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_utils::get_elements_by_tag_name;

    fn prepped(html: &str) -> (NodeRef, Scratch) {
        let doc = kuchikikiki::parse_html().one(html);
        let mut scratch = Scratch::default();
        prep_document(&doc, &mut scratch);
        (doc, scratch)
    }

    #[test]
    fn test_removes_scripts_and_styles() {
        let (doc, _) = prepped(
            "<body><script>var x;</script><style>p{}</style><p>kept</p></body>",
        );
        assert!(get_elements_by_tag_name(&doc, "script").is_empty());
        assert!(get_elements_by_tag_name(&doc, "style").is_empty());
        assert_eq!(get_elements_by_tag_name(&doc, "p").len(), 1);
    }

    #[test]
    fn test_replace_br_runs_with_paragraphs() {
        let (doc, _) = prepped("<body><div>first line<br><br>second line</div></body>");
        let paragraphs = get_elements_by_tag_name(&doc, "p");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text_contents(), "second line");
        assert!(get_elements_by_tag_name(&doc, "br").is_empty());
    }

    #[test]
    fn test_single_br_is_kept() {
        let (doc, _) = prepped("<body><div>one<br>two</div></body>");
        assert_eq!(get_elements_by_tag_name(&doc, "br").len(), 1);
        assert!(get_elements_by_tag_name(&doc, "p").is_empty());
    }

    #[test]
    fn test_font_becomes_span() {
        let (doc, _) = prepped(r#"<body><font color="red">text</font></body>"#);
        assert!(get_elements_by_tag_name(&doc, "font").is_empty());
        let span = get_elements_by_tag_name(&doc, "span").remove(0);
        assert_eq!(dom::get_attr(&span, "color").as_deref(), Some("red"));
    }

    #[test]
    fn test_noscript_image_unwrap() {
        let (doc, _) = prepped(
            r#"<body>
                 <img src="data:image/gif;base64,AAAA" data-src="">
                 <noscript><img src="https://example.com/real.jpg"></noscript>
               </body>"#,
        );
        let images = get_elements_by_tag_name(&doc, "img");
        assert_eq!(images.len(), 1);
        assert_eq!(
            dom::get_attr(&images[0], "src").as_deref(),
            Some("https://example.com/real.jpg")
        );
    }

    #[test]
    fn test_lazy_image_promotes_data_src() {
        let (doc, _) = prepped(
            r#"<body><img class="lazy" data-src="https://example.com/img.jpg"></body>"#,
        );
        let img = get_elements_by_tag_name(&doc, "img").remove(0);
        assert_eq!(
            dom::get_attr(&img, "src").as_deref(),
            Some("https://example.com/img.jpg")
        );
    }

    #[test]
    fn test_mark_data_tables() {
        let html = r#"<body>
            <table id="layout"><tr><td>a</td></tr></table>
            <table id="headed"><thead><tr><th>h</th></tr></thead></table>
            <table id="summarized" summary="stats"><tr><td>x</td></tr></table>
        </body>"#;
        let doc = kuchikikiki::parse_html().one(html);
        let mut scratch = Scratch::default();
        mark_data_tables(&doc, &mut scratch);

        let tables = get_elements_by_tag_name(&doc, "table");
        assert!(!scratch.is_data_table(&tables[0]));
        assert!(scratch.is_data_table(&tables[1]));
        assert!(scratch.is_data_table(&tables[2]));
    }
}
