//! Final fixes on the extracted article: absolute URLs, wrapper collapsing
//! and class scrubbing.

use crate::constants::REGEXPS;
use crate::dom_utils as dom;
use crate::options::ReadabilityOptions;
use kuchikikiki::NodeRef;
use url::Url;

/// Run the full post-processing pass over the article container.
pub(crate) fn post_process_content(
    article: &NodeRef,
    base_url: Option<&str>,
    options: &ReadabilityOptions,
) {
    fix_relative_uris(article, base_url);
    simplify_nested_elements(article);
    if !options.keep_classes {
        clean_classes(article, &options.classes_to_preserve);
    }
}

/// Rewrite `href`/`src`/`poster`/`srcset` against the base URL. In-document
/// anchors and `data:` URIs are left alone, as is any attribute whose value
/// fails to resolve.
fn fix_relative_uris(article: &NodeRef, base_url: Option<&str>) {
    let base = base_url.and_then(|b| Url::parse(b).ok());

    for link in dom::get_elements_by_tag_name(article, "a") {
        let Some(href) = dom::get_attr(&link, "href") else {
            continue;
        };

        // A javascript: destination is dead weight in cleaned output.
        if href.trim().to_lowercase().starts_with("javascript:") {
            let only_text_children = link.children().all(|child| child.as_text().is_some());
            if only_text_children {
                let text = NodeRef::new_text(link.text_contents());
                link.insert_before(text);
            } else {
                let container = dom::create_element("span");
                let children: Vec<NodeRef> = link.children().collect();
                for child in children {
                    container.append(child);
                }
                link.insert_before(container);
            }
            link.detach();
            continue;
        }

        if let Some(ref base) = base {
            if let Some(absolute) = to_absolute_uri(&href, base) {
                dom::set_attr(&link, "href", &absolute);
            }
        }
    }

    let Some(base) = base else {
        return;
    };

    let mut media = Vec::new();
    for tag in ["img", "picture", "figure", "video", "audio", "source"] {
        media.extend(dom::get_elements_by_tag_name(article, tag));
    }
    for node in media {
        for attribute in ["src", "poster"] {
            if let Some(value) = dom::get_attr(&node, attribute) {
                if let Some(absolute) = to_absolute_uri(&value, &base) {
                    dom::set_attr(&node, attribute, &absolute);
                }
            }
        }
        if let Some(srcset) = dom::get_attr(&node, "srcset") {
            let rewritten = REGEXPS
                .srcset_url
                .replace_all(&srcset, |caps: &regex::Captures| {
                    let url = to_absolute_uri(&caps[1], &base)
                        .unwrap_or_else(|| caps[1].to_string());
                    format!(
                        "{}{}{}",
                        url,
                        caps.get(2).map_or("", |m| m.as_str()),
                        caps.get(3).map_or("", |m| m.as_str())
                    )
                })
                .to_string();
            dom::set_attr(&node, "srcset", &rewritten);
        }
    }
}

fn to_absolute_uri(uri: &str, base: &Url) -> Option<String> {
    if uri.starts_with('#') || uri.starts_with("data:") {
        return None;
    }
    base.join(uri).ok().map(|resolved| resolved.to_string())
}

/// Collapse `<div>`/`<section>` shells whose only child is another block of
/// the same kind; attributes already on the inner element win.
fn simplify_nested_elements(article: &NodeRef) {
    let mut node_opt = Some(article.clone());
    while let Some(node) = node_opt {
        let simplifiable = node.parent().is_some()
            && (dom::is_tag(&node, "div") || dom::is_tag(&node, "section"))
            && !dom::get_attr(&node, "id")
                .map_or(false, |id| id.starts_with("readability"));

        if simplifiable {
            if dom::is_element_without_content(&node) {
                node_opt = dom::remove_and_get_next(node);
                continue;
            }

            if dom::has_single_tag_inside(&node, "div")
                || dom::has_single_tag_inside(&node, "section")
            {
                if let Some(child) = node.children().find(|c| c.as_element().is_some()) {
                    if let (Some(outer), Some(inner)) = (node.as_element(), child.as_element()) {
                        let outer_attributes = outer.attributes.borrow();
                        let mut inner_attributes = inner.attributes.borrow_mut();
                        for (name, attribute) in outer_attributes.map.iter() {
                            if inner_attributes.get(name.local.clone()).is_none() {
                                inner_attributes
                                    .insert(name.local.clone(), attribute.value.clone());
                            }
                        }
                    }
                    node.insert_before(child.clone());
                    node.detach();
                    node_opt = Some(child);
                    continue;
                }
            }
        }

        node_opt = dom::get_next_node(&node, false);
    }
}

/// Drop class attributes, keeping only the caller's allow-list.
fn clean_classes(article: &NodeRef, preserve: &[String]) {
    let mut nodes = vec![article.clone()];
    nodes.extend(dom::get_elements_by_tag_name(article, "*"));

    for node in nodes {
        let Some(class) = dom::get_attr(&node, "class") else {
            continue;
        };
        let kept: Vec<&str> = class
            .split_whitespace()
            .filter(|token| preserve.iter().any(|p| p == token))
            .collect();
        if kept.is_empty() {
            dom::remove_attr(&node, "class");
        } else {
            dom::set_attr(&node, "class", &kept.join(" "));
        }
    }
}
