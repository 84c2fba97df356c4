//! Traversal and text utilities over the mutable working tree.
//!
//! Everything here operates on [`kuchikikiki::NodeRef`], the reference-counted
//! node handle with weak parent links that the extraction pipeline mutates in
//! place. Helpers that walk while mutating always snapshot first.

use crate::constants::{DIV_TO_P_ELEMS, PHRASING_ELEMS, REGEXPS};
use crate::utils;
use html5ever::{ns, LocalName, QualName};
use kuchikikiki::iter::NodeIterator;
use kuchikikiki::{NodeData, NodeRef};

/// Lower-cased tag name of an element node.
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element()
        .map(|e| e.name.local.as_ref().to_ascii_lowercase())
}

/// Case-insensitive tag check.
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element()
        .map_or(false, |e| e.name.local.as_ref().eq_ignore_ascii_case(tag))
}

fn tag_in(node: &NodeRef, set: &[&str]) -> bool {
    node.as_element().map_or(false, |e| {
        let name = e.name.local.as_ref();
        set.iter().any(|tag| name.eq_ignore_ascii_case(tag))
    })
}

pub fn get_attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(|value| value.to_string())
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().remove(name);
    }
}

/// `class + " " + id`, the string the heuristic regexes run against.
pub fn class_and_id(node: &NodeRef) -> String {
    let class = get_attr(node, "class").unwrap_or_default();
    let id = get_attr(node, "id").unwrap_or_default();
    format!("{} {}", class, id)
}

/// Concatenated descendant text. With `normalize`, whitespace runs collapse
/// to a single space; the ends are trimmed either way.
pub fn inner_text(node: &NodeRef, normalize: bool) -> String {
    let text = node.text_contents();
    if normalize {
        utils::normalize_whitespace(&text)
    } else {
        text.trim().to_string()
    }
}

/// Character count of the normalized inner text.
pub fn text_length(node: &NodeRef) -> usize {
    inner_text(node, true).chars().count()
}

/// Share of the text that sits inside links, in `[0, 1]`. In-page hash
/// anchors are weighted down so a table of contents does not sink its
/// container.
pub fn link_density(node: &NodeRef) -> f64 {
    let total = text_length(node) as f64;
    if total == 0.0 {
        return 0.0;
    }

    let mut link_length = 0.0;
    for link in get_elements_by_tag_name(node, "a") {
        let coefficient = match get_attr(&link, "href") {
            Some(href) if REGEXPS.hash_url.is_match(&href) => 0.3,
            _ => 1.0,
        };
        link_length += text_length(&link) as f64 * coefficient;
    }

    link_length / total
}

/// True iff any descendant is a block-level element.
pub fn has_child_block_element(node: &NodeRef) -> bool {
    node.descendants()
        .elements()
        .any(|e| tag_in(e.as_node(), &DIV_TO_P_ELEMS))
}

/// Phrasing content per the WHATWG category: text nodes, a fixed element
/// set, and `a`/`del`/`ins` when all of their children are phrasing.
pub fn is_phrasing_content(node: &NodeRef) -> bool {
    match node.data() {
        NodeData::Text(_) => true,
        NodeData::Element(element) => {
            let name = element.name.local.as_ref();
            if PHRASING_ELEMS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
                return true;
            }
            (name.eq_ignore_ascii_case("a")
                || name.eq_ignore_ascii_case("del")
                || name.eq_ignore_ascii_case("ins"))
                && node.children().all(|child| is_phrasing_content(&child))
        }
        _ => false,
    }
}

/// Whether a text node holds only whitespace.
pub fn is_whitespace_text(node: &NodeRef) -> bool {
    match node.as_text() {
        Some(text) => text.borrow().trim().is_empty(),
        None => false,
    }
}

/// Cheap visibility probe over inline style and ARIA attributes.
pub fn is_probably_visible(node: &NodeRef) -> bool {
    if let Some(style) = get_attr(node, "style") {
        if REGEXPS.display_none.is_match(&style) || REGEXPS.visibility_hidden.is_match(&style) {
            return false;
        }
    }

    if get_attr(node, "hidden").is_some() {
        return false;
    }

    if let Some(aria_hidden) = get_attr(node, "aria-hidden") {
        if aria_hidden == "true" {
            let class = get_attr(node, "class").unwrap_or_default();
            let is_fallback_image = class.split_whitespace().any(|c| c == "fallback-image");
            if !is_fallback_image {
                return false;
            }
        }
    }

    true
}

/// Depth-first snapshot of descendant elements by tag; `"*"` matches all.
pub fn get_elements_by_tag_name(root: &NodeRef, tag: &str) -> Vec<NodeRef> {
    root.descendants()
        .elements()
        .filter(|e| tag == "*" || e.name.local.as_ref().eq_ignore_ascii_case(tag))
        .map(|e| e.as_node().clone())
        .collect()
}

fn first_element_child(node: &NodeRef) -> Option<NodeRef> {
    node.children()
        .elements()
        .next()
        .map(|e| e.as_node().clone())
}

fn next_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    node.following_siblings()
        .elements()
        .next()
        .map(|e| e.as_node().clone())
}

/// Count of element children.
pub fn element_child_count(node: &NodeRef) -> usize {
    node.children().elements().count()
}

/// Depth-first successor over element nodes, optionally skipping the
/// current subtree.
pub fn get_next_node(node: &NodeRef, ignore_self_and_kids: bool) -> Option<NodeRef> {
    if !ignore_self_and_kids {
        if let Some(child) = first_element_child(node) {
            return Some(child);
        }
    }

    if let Some(sibling) = next_element_sibling(node) {
        return Some(sibling);
    }

    let mut parent = node.parent();
    while let Some(ancestor) = parent {
        if let Some(sibling) = next_element_sibling(&ancestor) {
            return Some(sibling);
        }
        parent = ancestor.parent();
    }

    None
}

/// Detach a node and return its depth-first successor outside the removed
/// subtree.
pub fn remove_and_get_next(node: NodeRef) -> Option<NodeRef> {
    let next = get_next_node(&node, true);
    node.detach();
    next
}

/// Element ancestors, nearest first. `max_depth` of 0 means unlimited.
pub fn get_ancestors(node: &NodeRef, max_depth: usize) -> Vec<NodeRef> {
    let mut ancestors = Vec::new();
    for ancestor in node.ancestors() {
        if ancestor.as_element().is_none() {
            break;
        }
        ancestors.push(ancestor);
        if max_depth > 0 && ancestors.len() == max_depth {
            break;
        }
    }
    ancestors
}

/// Whether an ancestor within `max_depth` levels (negative for unlimited)
/// has the tag and passes the filter.
pub fn has_ancestor_tag<F>(node: &NodeRef, tag: &str, max_depth: i32, filter: F) -> bool
where
    F: Fn(&NodeRef) -> bool,
{
    let mut depth = 0;
    for ancestor in node.ancestors() {
        if max_depth > 0 && depth > max_depth {
            return false;
        }
        if is_tag(&ancestor, tag) && filter(&ancestor) {
            return true;
        }
        depth += 1;
    }
    false
}

/// Whether `node` sits inside (or is) `root`.
pub fn is_inside(node: &NodeRef, root: &NodeRef) -> bool {
    *node == *root || node.ancestors().any(|a| a == *root)
}

/// Create a detached element with the given tag.
pub fn create_element(tag: &str) -> NodeRef {
    NodeRef::new_element(
        QualName::new(None, ns!(html), LocalName::from(tag)),
        std::iter::empty(),
    )
}

/// Replace an element with one of a different tag, keeping attributes and
/// children in place. Returns the replacement.
pub fn set_node_tag(node: &NodeRef, tag: &str) -> NodeRef {
    let replacement = match node.as_element() {
        Some(element) => {
            let name = QualName::new(None, ns!(html), LocalName::from(tag));
            let attributes = element.attributes.borrow();
            NodeRef::new_element(name, attributes.map.clone())
        }
        None => return node.clone(),
    };

    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        replacement.append(child);
    }

    node.insert_before(replacement.clone());
    node.detach();
    replacement
}

/// An element that is an `<img>`, or wraps exactly one through a chain of
/// single-element children with no interleaved text.
pub fn is_single_image(node: &NodeRef) -> bool {
    let mut current = node.clone();
    loop {
        if is_tag(&current, "img") {
            return true;
        }
        if current
            .children()
            .text_nodes()
            .any(|t| !t.borrow().trim().is_empty())
        {
            return false;
        }
        let mut element_children = current.children().elements();
        let only = match (element_children.next(), element_children.next()) {
            (Some(child), None) => child.as_node().clone(),
            _ => return false,
        };
        current = only;
    }
}

/// Starting from `node`, skip forward past whitespace-only text nodes.
pub fn next_significant_node(node: Option<NodeRef>) -> Option<NodeRef> {
    let mut current = node;
    while let Some(candidate) = current {
        if candidate.as_element().is_some() || !is_whitespace_text(&candidate) {
            return Some(candidate);
        }
        current = candidate.next_sibling();
    }
    None
}

/// No text and no element children besides `<br>`/`<hr>`.
pub fn is_element_without_content(node: &NodeRef) -> bool {
    if node.as_element().is_none() {
        return false;
    }
    if !node.text_contents().trim().is_empty() {
        return false;
    }

    let element_count = element_child_count(node);
    let br_hr_count = node
        .children()
        .filter(|c| is_tag(c, "br") || is_tag(c, "hr"))
        .count();
    element_count == br_hr_count
}

/// Exactly one element child with the given tag, and no stray text.
pub fn has_single_tag_inside(node: &NodeRef, tag: &str) -> bool {
    let mut element_children = node.children().elements();
    let only = match (element_children.next(), element_children.next()) {
        (Some(child), None) => child,
        _ => return false,
    };
    if !is_tag(only.as_node(), tag) {
        return false;
    }

    !node
        .children()
        .text_nodes()
        .any(|t| !t.borrow().trim().is_empty())
}

/// Row and column counts of a table, honoring `rowspan`/`colspan`.
pub fn get_row_and_column_count(table: &NodeRef) -> (usize, usize) {
    let mut rows = 0;
    let mut columns = 0;

    for tr in get_elements_by_tag_name(table, "tr") {
        let rowspan = get_attr(&tr, "rowspan")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1);
        rows += rowspan;

        let mut columns_in_row = 0;
        for cell in tr.children().elements() {
            let cell_node = cell.as_node();
            if !is_tag(cell_node, "td") && !is_tag(cell_node, "th") {
                continue;
            }
            let colspan = get_attr(cell_node, "colspan")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1);
            columns_in_row += colspan;
        }
        columns = columns.max(columns_in_row);
    }

    (rows, columns)
}

/// Share of the text held by descendants with the given tags.
pub fn text_density(node: &NodeRef, tags: &[&str]) -> f64 {
    let total = text_length(node) as f64;
    if total == 0.0 {
        return 0.0;
    }

    let mut tagged = 0.0;
    for tag in tags {
        for descendant in get_elements_by_tag_name(node, tag) {
            tagged += text_length(&descendant) as f64;
        }
    }
    tagged / total
}

/// Serialize a node (outer HTML).
pub fn serialize_node(node: &NodeRef) -> String {
    let mut buffer = Vec::new();
    if node.serialize(&mut buffer).is_err() {
        return node.text_contents();
    }
    String::from_utf8(buffer).unwrap_or_else(|_| node.text_contents())
}

/// Serialize a node's children (inner HTML).
pub fn serialize_children(node: &NodeRef) -> String {
    let mut buffer = Vec::new();
    for child in node.children() {
        if child.serialize(&mut buffer).is_err() {
            return node.text_contents();
        }
    }
    String::from_utf8(buffer).unwrap_or_else(|_| node.text_contents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchikikiki::traits::TendrilSink;

    fn parse(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }

    fn first(doc: &NodeRef, tag: &str) -> NodeRef {
        get_elements_by_tag_name(doc, tag)
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_inner_text_normalizes() {
        let doc = parse("<p>  hello \n\t world  </p>");
        let p = first(&doc, "p");
        assert_eq!(inner_text(&p, true), "hello world");
        assert_eq!(text_length(&p), 11);
    }

    #[test]
    fn test_link_density() {
        let doc = parse(r#"<div><a href="/x">aaaaa</a>bbbbb</div>"#);
        let div = first(&doc, "div");
        assert!((link_density(&div) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_discounts_hash_anchors() {
        let doc = parse(r##"<div><a href="#top">aaaaa</a>bbbbb</div>"##);
        let div = first(&doc, "div");
        assert!((link_density(&div) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_has_child_block_element() {
        let doc = parse("<div><span><p>deep</p></span></div>");
        let div = first(&doc, "div");
        assert!(has_child_block_element(&div));

        let doc = parse("<div><span>inline only</span></div>");
        let div = first(&doc, "div");
        assert!(!has_child_block_element(&div));
    }

    #[test]
    fn test_is_phrasing_content() {
        let doc = parse("<div><a><b>bold</b></a><del><em>edit</em></del><del><p>block</p></del></div>");
        let link = first(&doc, "a");
        assert!(is_phrasing_content(&link));
        let dels = get_elements_by_tag_name(&doc, "del");
        assert!(is_phrasing_content(&dels[0]));
        assert!(!is_phrasing_content(&dels[1]));
    }

    #[test]
    fn test_is_probably_visible() {
        let doc = parse(
            r#"<div id="a" style="display:none"></div>
               <div id="b" hidden></div>
               <div id="c" aria-hidden="true"></div>
               <div id="d" aria-hidden="true" class="icon fallback-image"></div>
               <div id="e"></div>"#,
        );
        let divs = get_elements_by_tag_name(&doc, "div");
        let visible: Vec<bool> = divs.iter().map(is_probably_visible).collect();
        assert_eq!(visible, vec![false, false, false, true, true]);
    }

    #[test]
    fn test_set_node_tag_keeps_attributes_and_children() {
        let doc = parse(r#"<font color="red"><b>text</b></font>"#);
        let font = first(&doc, "font");
        let span = set_node_tag(&font, "span");
        assert!(is_tag(&span, "span"));
        assert_eq!(get_attr(&span, "color").as_deref(), Some("red"));
        assert_eq!(get_elements_by_tag_name(&span, "b").len(), 1);
        assert!(font.parent().is_none());
    }

    #[test]
    fn test_get_next_node_walks_depth_first() {
        let doc = parse("<div id=a><p id=b></p></div><div id=c></div>");
        let a = first(&doc, "div");
        let b = get_next_node(&a, false).unwrap();
        assert_eq!(get_attr(&b, "id").as_deref(), Some("b"));
        let c = get_next_node(&b, false).unwrap();
        assert_eq!(get_attr(&c, "id").as_deref(), Some("c"));
        let skipped = get_next_node(&a, true).unwrap();
        assert_eq!(get_attr(&skipped, "id").as_deref(), Some("c"));
    }

    #[test]
    fn test_is_single_image() {
        let doc = parse(r#"<div><a><img src="x.png"></a></div>"#);
        let div = first(&doc, "div");
        assert!(is_single_image(&div));

        let doc = parse(r#"<div><img src="x.png"> caption</div>"#);
        let div = first(&doc, "div");
        assert!(!is_single_image(&div));
    }

    #[test]
    fn test_is_element_without_content() {
        let doc = parse("<div><br><hr></div><div>text</div>");
        let divs = get_elements_by_tag_name(&doc, "div");
        assert!(is_element_without_content(&divs[0]));
        assert!(!is_element_without_content(&divs[1]));
    }

    #[test]
    fn test_has_single_tag_inside() {
        let doc = parse("<div><p>only</p></div>");
        let div = first(&doc, "div");
        assert!(has_single_tag_inside(&div, "p"));

        let doc = parse("<div>stray<p>child</p></div>");
        let div = first(&doc, "div");
        assert!(!has_single_tag_inside(&div, "p"));
    }

    #[test]
    fn test_get_row_and_column_count() {
        let doc = parse(
            "<table><tr><td colspan=2></td><td></td></tr><tr><td></td></tr></table>",
        );
        let table = first(&doc, "table");
        assert_eq!(get_row_and_column_count(&table), (2, 3));
    }
}
