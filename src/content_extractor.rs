//! The grab pass: score candidate blocks, pick and promote a top candidate,
//! aggregate its siblings into the article container, and clean the result.
//!
//! An extraction runs as a sequence of attempts. Each attempt parses a fresh
//! tree, prepares it, and grabs an article with the current heuristic flags.
//! When an attempt yields less text than the configured threshold, one flag
//! is dropped and the grab is redone; the longest attempt wins if none reach
//! the threshold.

use crate::cleaner;
use crate::constants::{
    ALTER_TO_DIV_EXCEPTIONS, DEFAULT_TAGS_TO_SCORE, DEPRECATED_SIZE_ATTRIBUTE_ELEMS,
    PRESENTATIONAL_ATTRIBUTES, REGEXPS, UNLIKELY_ROLES,
};
use crate::dom_utils as dom;
use crate::options::ReadabilityOptions;
use crate::scoring::{self, Scratch};
use bitflags::bitflags;
use kuchikikiki::traits::TendrilSink;
use kuchikikiki::NodeRef;

/// Text below this length never scores on its own.
const MIN_PARAGRAPH_LENGTH: usize = 25;

/// Score propagates this many ancestor levels up from a scored element.
const SCORE_ANCESTOR_DEPTH: usize = 5;

/// Alternates need this many shared-ancestry votes to move the top candidate.
const MINIMUM_TOP_CANDIDATES: usize = 3;

/// Share widgets below this text length are removed from the article.
const SHARE_ELEMENT_THRESHOLD: usize = 500;

bitflags! {
    /// Heuristics relaxed one at a time when an attempt comes up short.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct GrabFlags: u32 {
        const STRIP_UNLIKELYS = 1;
        const WEIGHT_CLASSES = 1 << 1;
        const CLEAN_CONDITIONALLY = 1 << 2;
    }
}

/// A successful grab: the article container, any byline found along the way,
/// and the text length that attempt produced.
pub(crate) struct Extraction {
    pub content: NodeRef,
    pub byline: Option<String>,
    pub text_length: usize,
}

/// Run grab attempts against `html` until one satisfies the character
/// threshold, relaxing flags between attempts.
pub(crate) fn extract(html: &str, options: &ReadabilityOptions) -> Option<Extraction> {
    let mut flags = GrabFlags::all();
    let mut best: Option<Extraction> = None;

    loop {
        let doc = kuchikikiki::parse_html().one(html);
        let mut scratch = Scratch::default();
        cleaner::prep_document(&doc, &mut scratch);

        if let Some(extraction) = grab_article(&doc, &mut scratch, options, flags) {
            if options.debug {
                eprintln!(
                    "Reader: (Readability) attempt with {:?} yielded {} chars",
                    flags, extraction.text_length
                );
            }
            if extraction.text_length >= options.char_threshold {
                return Some(extraction);
            }
            if best
                .as_ref()
                .map_or(true, |b| extraction.text_length > b.text_length)
            {
                best = Some(extraction);
            }
        }

        if flags.contains(GrabFlags::STRIP_UNLIKELYS) {
            flags.remove(GrabFlags::STRIP_UNLIKELYS);
        } else if flags.contains(GrabFlags::WEIGHT_CLASSES) {
            flags.remove(GrabFlags::WEIGHT_CLASSES);
        } else if flags.contains(GrabFlags::CLEAN_CONDITIONALLY) {
            flags.remove(GrabFlags::CLEAN_CONDITIONALLY);
        } else {
            return best.filter(|b| b.text_length > 0);
        }
    }
}

/// One grab attempt over a prepared tree.
fn grab_article(
    doc: &NodeRef,
    scratch: &mut Scratch,
    options: &ReadabilityOptions,
    flags: GrabFlags,
) -> Option<Extraction> {
    let body = doc.select_first("body").ok()?.as_node().clone();
    let root = doc
        .select_first("html")
        .map(|html| html.as_node().clone())
        .unwrap_or_else(|()| body.clone());

    let mut byline: Option<String> = None;
    let mut elements_to_score: Vec<NodeRef> = Vec::new();

    // First walk: strip what can't be content, normalize divs, and collect
    // the elements worth scoring.
    let mut node_opt = Some(root);
    while let Some(node) = node_opt {
        let mut current = node;
        let match_string = dom::class_and_id(&current);

        if !dom::is_tag(&current, "body") && !dom::is_probably_visible(&current) {
            node_opt = dom::remove_and_get_next(current);
            continue;
        }

        if byline.is_none() && scoring::is_valid_byline(&current, &match_string) {
            let text = dom::inner_text(&current, true);
            if !text.is_empty() {
                byline = Some(text);
                node_opt = dom::remove_and_get_next(current);
                continue;
            }
        }

        if flags.contains(GrabFlags::STRIP_UNLIKELYS) {
            if REGEXPS.unlikely_candidates.is_match(&match_string)
                && !REGEXPS.ok_maybe_its_a_candidate.is_match(&match_string)
                && !dom::has_ancestor_tag(&current, "table", -1, |_| true)
                && !dom::has_ancestor_tag(&current, "code", -1, |_| true)
                && !dom::is_tag(&current, "body")
                && !dom::is_tag(&current, "a")
            {
                node_opt = dom::remove_and_get_next(current);
                continue;
            }

            if let Some(role) = dom::get_attr(&current, "role") {
                if UNLIKELY_ROLES.iter().any(|r| role.eq_ignore_ascii_case(r)) {
                    node_opt = dom::remove_and_get_next(current);
                    continue;
                }
            }
        }

        let tag = dom::tag_name(&current).unwrap_or_default();

        // Headerless sections and empty structural elements carry nothing.
        if matches!(
            tag.as_str(),
            "div" | "section" | "header" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        ) && dom::is_element_without_content(&current)
        {
            node_opt = dom::remove_and_get_next(current);
            continue;
        }

        if DEFAULT_TAGS_TO_SCORE.contains(&tag.as_str()) {
            elements_to_score.push(current.clone());
        }

        if tag == "div" {
            // Wrap runs of loose phrasing content into paragraphs.
            let mut paragraph: Option<NodeRef> = None;
            let children: Vec<NodeRef> = current.children().collect();
            for child in children {
                if dom::is_phrasing_content(&child) {
                    if let Some(ref p) = paragraph {
                        p.append(child);
                    } else if !dom::is_whitespace_text(&child) {
                        let p = dom::create_element("p");
                        child.insert_before(p.clone());
                        p.append(child);
                        paragraph = Some(p);
                    }
                } else if let Some(p) = paragraph.take() {
                    while let Some(last) = p.last_child() {
                        if dom::is_whitespace_text(&last) {
                            last.detach();
                        } else {
                            break;
                        }
                    }
                }
            }

            // A div wrapping a single paragraph is just indirection; a div
            // with no block children is itself a paragraph.
            if dom::has_single_tag_inside(&current, "p") && dom::link_density(&current) < 0.25 {
                if let Some(child) = current.children().find(|c| c.as_element().is_some()) {
                    current.insert_before(child.clone());
                    current.detach();
                    elements_to_score.push(child.clone());
                    current = child;
                }
            } else if !dom::has_child_block_element(&current) {
                let replacement = dom::set_node_tag(&current, "p");
                scratch.transfer(&current, &replacement);
                elements_to_score.push(replacement.clone());
                current = replacement;
            }
        }

        node_opt = dom::get_next_node(&current, false);
    }

    // Second phase: score the collected elements and propagate into their
    // ancestors with depth decay.
    let mut candidates: Vec<NodeRef> = Vec::new();
    for element in &elements_to_score {
        let Some(parent) = element.parent() else {
            continue;
        };
        if parent.as_element().is_none() {
            continue;
        }

        let inner_text = dom::inner_text(element, true);
        if inner_text.chars().count() < MIN_PARAGRAPH_LENGTH {
            continue;
        }

        let ancestors = dom::get_ancestors(element, SCORE_ANCESTOR_DEPTH);
        if ancestors.is_empty() {
            continue;
        }

        let mut content_score = 1.0;
        content_score += inner_text.matches(',').count() as f64;
        content_score += (inner_text.chars().count() as f64 / 100.0).floor().min(3.0);

        for (level, ancestor) in ancestors.iter().enumerate() {
            if ancestor.parent().is_none() {
                continue;
            }
            // Everything funnels into <body> eventually; scoring it would
            // only hide the real container.
            if dom::is_tag(ancestor, "body") || dom::is_tag(ancestor, "html") {
                break;
            }
            if scratch.score(ancestor).is_none() {
                scoring::initialize_node(
                    ancestor,
                    scratch,
                    flags.contains(GrabFlags::WEIGHT_CLASSES),
                );
                candidates.push(ancestor.clone());
            }
            let divider = match level {
                0 => 1.0,
                1 => 2.0,
                _ => (level * 3) as f64,
            };
            scratch.add_score(ancestor, content_score / divider);
        }
    }

    // Content is penalized for being mostly links, then ranked.
    let mut top_candidates: Vec<NodeRef> = Vec::new();
    for candidate in &candidates {
        let adjusted =
            scratch.score(candidate).unwrap_or(0.0) * (1.0 - dom::link_density(candidate));
        scratch.set_score(candidate, adjusted);

        let position = top_candidates
            .iter()
            .position(|top| adjusted > scratch.score(top).unwrap_or(0.0));
        match position {
            Some(index) => top_candidates.insert(index, candidate.clone()),
            None => top_candidates.push(candidate.clone()),
        }
        top_candidates.truncate(options.nb_top_candidates);
    }

    let mut top_candidate = match top_candidates.first() {
        Some(top) if !dom::is_tag(top, "body") && !dom::is_tag(top, "html") => top.clone(),
        _ => {
            // Nothing scored: treat the whole body as the article.
            let container = dom::create_element("div");
            let children: Vec<NodeRef> = body.children().collect();
            for child in children {
                container.append(child);
            }
            body.append(container.clone());
            scoring::initialize_node(
                &container,
                scratch,
                flags.contains(GrabFlags::WEIGHT_CLASSES),
            );
            container
        }
    };

    promote_top_candidate(&mut top_candidate, &top_candidates, scratch, flags);

    // Assemble the article from the top candidate and any siblings that look
    // like they belong to the same story.
    let article_content = dom::create_element("div");
    let top_score = scratch.score(&top_candidate).unwrap_or(0.0);
    let sibling_score_threshold = (top_score * 0.2).max(10.0);
    let top_class = dom::get_attr(&top_candidate, "class").unwrap_or_default();

    let parent_of_top = match top_candidate.parent() {
        Some(parent) => parent,
        None => body.clone(),
    };
    let siblings: Vec<NodeRef> = parent_of_top.children().collect();
    for sibling in siblings {
        if sibling.as_element().is_none() {
            continue;
        }

        let mut append = sibling == top_candidate;

        if !append {
            let mut bonus = 0.0;
            let sibling_class = dom::get_attr(&sibling, "class").unwrap_or_default();
            if !top_class.is_empty() && sibling_class == top_class {
                bonus = top_score * 0.2;
            }
            if let Some(score) = scratch.score(&sibling) {
                if score + bonus >= sibling_score_threshold {
                    append = true;
                }
            }
        }

        if !append && dom::is_tag(&sibling, "p") {
            let link_density = dom::link_density(&sibling);
            let node_content = dom::inner_text(&sibling, true);
            let node_length = node_content.chars().count();

            if node_length > 80 && link_density < 0.25 {
                append = true;
            } else if node_length < 80
                && node_length > 0
                && link_density == 0.0
                && REGEXPS.sentence_end.is_match(&node_content)
            {
                append = true;
            }
        }

        if append {
            let tag = dom::tag_name(&sibling).unwrap_or_default();
            let node_to_append = if ALTER_TO_DIV_EXCEPTIONS.contains(&tag.as_str()) {
                sibling
            } else {
                // Siblings kept for their content shouldn't drag layout
                // semantics along.
                let replacement = dom::set_node_tag(&sibling, "div");
                scratch.transfer(&sibling, &replacement);
                replacement
            };
            article_content.append(node_to_append);
        }
    }

    prep_article(&article_content, scratch, options, flags, &top_candidates);

    // Readable output keeps the upstream page wrapper.
    let page = dom::create_element("div");
    dom::set_attr(&page, "id", "readability-page-1");
    dom::set_attr(&page, "class", "page");
    let children: Vec<NodeRef> = article_content.children().collect();
    for child in children {
        page.append(child);
    }
    article_content.append(page);

    let text_length = dom::text_length(&article_content);
    Some(Extraction {
        content: article_content,
        byline,
        text_length,
    })
}

/// Walk the top candidate up the tree when its ancestry looks richer than
/// the candidate itself.
fn promote_top_candidate(
    top_candidate: &mut NodeRef,
    top_candidates: &[NodeRef],
    scratch: &mut Scratch,
    flags: GrabFlags,
) {
    let top_score = scratch.score(top_candidate).unwrap_or(0.0);

    // Alternates scoring at least a third of the top may share a common
    // container that is the real article body.
    let alternate_ancestor_lists: Vec<Vec<NodeRef>> = top_candidates
        .iter()
        .skip(1)
        .filter(|candidate| scratch.score(candidate).unwrap_or(0.0) * 3.0 >= top_score)
        .map(|candidate| dom::get_ancestors(candidate, 0))
        .collect();

    if alternate_ancestor_lists.len() >= MINIMUM_TOP_CANDIDATES {
        let mut parent = top_candidate.parent();
        while let Some(ancestor) = parent {
            if dom::is_tag(&ancestor, "body") || ancestor.as_element().is_none() {
                break;
            }
            let containing = alternate_ancestor_lists
                .iter()
                .filter(|ancestors| ancestors.iter().any(|a| *a == ancestor))
                .count();
            if containing >= MINIMUM_TOP_CANDIDATES {
                *top_candidate = ancestor;
                break;
            }
            parent = ancestor.parent();
        }
    }

    if scratch.score(top_candidate).is_none() {
        scoring::initialize_node(
            top_candidate,
            scratch,
            flags.contains(GrabFlags::WEIGHT_CLASSES),
        );
    }

    // Scores rising towards an ancestor mean more of the story lives there.
    let mut last_score = scratch.score(top_candidate).unwrap_or(0.0);
    let score_threshold = last_score / 3.0;
    let mut parent = top_candidate.parent();
    while let Some(ancestor) = parent {
        if dom::is_tag(&ancestor, "body") || ancestor.as_element().is_none() {
            break;
        }
        let Some(parent_score) = scratch.score(&ancestor) else {
            parent = ancestor.parent();
            continue;
        };
        if parent_score < score_threshold {
            break;
        }
        if parent_score > last_score {
            *top_candidate = ancestor;
            break;
        }
        last_score = parent_score;
        parent = ancestor.parent();
    }

    // An only child's wrapper is the same content with better siblings.
    let mut parent = top_candidate.parent();
    while let Some(ancestor) = parent {
        if dom::is_tag(&ancestor, "body")
            || ancestor.as_element().is_none()
            || dom::element_child_count(&ancestor) != 1
        {
            break;
        }
        *top_candidate = ancestor;
        parent = top_candidate.parent();
    }

    if scratch.score(top_candidate).is_none() {
        scoring::initialize_node(
            top_candidate,
            scratch,
            flags.contains(GrabFlags::WEIGHT_CLASSES),
        );
    }
}

/// Clean the assembled article in place.
fn prep_article(
    article: &NodeRef,
    scratch: &mut Scratch,
    options: &ReadabilityOptions,
    flags: GrabFlags,
    top_candidates: &[NodeRef],
) {
    clean_styles(article);

    clean_conditionally(article, "form", scratch, options, flags, top_candidates);
    clean_conditionally(article, "fieldset", scratch, options, flags, top_candidates);
    clean(article, "object", options);
    clean(article, "embed", options);
    clean(article, "footer", options);
    clean(article, "link", options);
    clean(article, "aside", options);

    remove_share_elements(article);

    clean(article, "iframe", options);
    clean(article, "input", options);
    clean(article, "textarea", options);
    clean(article, "select", options);
    clean(article, "button", options);
    clean_headers(article, flags);

    clean_conditionally(article, "table", scratch, options, flags, top_candidates);
    clean_conditionally(article, "ul", scratch, options, flags, top_candidates);
    clean_conditionally(article, "div", scratch, options, flags, top_candidates);

    // Body copy keeps h2 and below; a surviving h1 is the title restated.
    for h1 in dom::get_elements_by_tag_name(article, "h1") {
        let replacement = dom::set_node_tag(&h1, "h2");
        scratch.transfer(&h1, &replacement);
    }

    remove_empty_paragraphs(article);

    for br in dom::get_elements_by_tag_name(article, "br") {
        if let Some(next) = dom::next_significant_node(br.next_sibling()) {
            if dom::is_tag(&next, "p") {
                br.detach();
            }
        }
    }

    unwrap_single_cell_tables(article);
}

/// Remove every descendant with the tag. Embeds hosting allowed video are
/// spared.
fn clean(article: &NodeRef, tag: &str, options: &ReadabilityOptions) {
    let is_embed = matches!(tag, "object" | "embed" | "iframe");

    for node in dom::get_elements_by_tag_name(article, tag) {
        if is_embed {
            let attrs_match_video = node.as_element().map_or(false, |element| {
                element
                    .attributes
                    .borrow()
                    .map
                    .values()
                    .any(|attr| options.video_regex().is_match(&attr.value))
            });
            if attrs_match_video {
                continue;
            }
            // <object> embeds sometimes carry the URL in nested params.
            if dom::is_tag(&node, "object")
                && options.video_regex().is_match(&dom::serialize_node(&node))
            {
                continue;
            }
        }
        node.detach();
    }
}

fn clean_styles(article: &NodeRef) {
    let mut nodes = vec![article.clone()];
    nodes.extend(dom::get_elements_by_tag_name(article, "*"));

    for node in nodes {
        if dom::is_tag(&node, "svg") {
            continue;
        }
        for attribute in PRESENTATIONAL_ATTRIBUTES {
            dom::remove_attr(&node, attribute);
        }
        if dom::tag_name(&node)
            .map_or(false, |tag| DEPRECATED_SIZE_ATTRIBUTE_ELEMS.contains(&tag.as_str()))
        {
            dom::remove_attr(&node, "width");
            dom::remove_attr(&node, "height");
        }
    }
}

fn clean_headers(article: &NodeRef, flags: GrabFlags) {
    if !flags.contains(GrabFlags::WEIGHT_CLASSES) {
        return;
    }
    for tag in ["h1", "h2"] {
        for header in dom::get_elements_by_tag_name(article, tag) {
            if scoring::class_weight(&header) < 0 {
                header.detach();
            }
        }
    }
}

fn remove_share_elements(article: &NodeRef) {
    let children: Vec<NodeRef> = article.children().collect();
    for top in children {
        for node in dom::get_elements_by_tag_name(&top, "*") {
            if node.parent().is_none() {
                continue;
            }
            let match_string = dom::class_and_id(&node);
            if REGEXPS.share_elements.is_match(&match_string)
                && node.text_contents().chars().count() < SHARE_ELEMENT_THRESHOLD
            {
                node.detach();
            }
        }
    }
}

fn remove_empty_paragraphs(article: &NodeRef) {
    for paragraph in dom::get_elements_by_tag_name(article, "p") {
        let media_count = ["img", "embed", "object", "iframe"]
            .iter()
            .map(|tag| dom::get_elements_by_tag_name(&paragraph, tag).len())
            .sum::<usize>();
        if media_count == 0 && dom::inner_text(&paragraph, false).is_empty() {
            paragraph.detach();
        }
    }
}

fn unwrap_single_cell_tables(article: &NodeRef) {
    for table in dom::get_elements_by_tag_name(article, "table") {
        if table.parent().is_none() {
            continue;
        }
        let tbody = if dom::has_single_tag_inside(&table, "tbody") {
            match table.children().find(|c| c.as_element().is_some()) {
                Some(tbody) => tbody,
                None => continue,
            }
        } else {
            table.clone()
        };
        if !dom::has_single_tag_inside(&tbody, "tr") {
            continue;
        }
        let Some(row) = tbody.children().find(|c| c.as_element().is_some()) else {
            continue;
        };
        if !dom::has_single_tag_inside(&row, "td") {
            continue;
        }
        let Some(cell) = row.children().find(|c| c.as_element().is_some()) else {
            continue;
        };

        let all_phrasing = cell.children().all(|child| dom::is_phrasing_content(&child));
        let cell = dom::set_node_tag(&cell, if all_phrasing { "p" } else { "div" });
        table.insert_before(cell);
        table.detach();
    }
}

/// Remove a block when its shape says chrome rather than content: link
/// farms, input clusters, image grids without prose, bare lists of links.
fn clean_conditionally(
    article: &NodeRef,
    tag: &str,
    scratch: &mut Scratch,
    options: &ReadabilityOptions,
    flags: GrabFlags,
    top_candidates: &[NodeRef],
) {
    if !flags.contains(GrabFlags::CLEAN_CONDITIONALLY) {
        return;
    }

    for node in dom::get_elements_by_tag_name(article, tag) {
        if node.parent().is_none() {
            continue;
        }

        // Data tables, and anything living inside one, are content.
        if scratch.is_data_table(&node) {
            continue;
        }
        if dom::has_ancestor_tag(&node, "table", -1, |t| scratch.is_data_table(t)) {
            continue;
        }
        if dom::has_ancestor_tag(&node, "code", -1, |_| true) {
            continue;
        }

        // Removing a block that still holds a positively scored top
        // candidate would gut the article.
        let protects_candidate = top_candidates.iter().any(|candidate| {
            scratch.score(candidate).unwrap_or(0.0) > 0.0 && dom::is_inside(candidate, &node)
        });
        if protects_candidate {
            continue;
        }

        if should_remove_conditionally(&node, tag, scratch, options, flags) {
            node.detach();
        }
    }
}

fn should_remove_conditionally(
    node: &NodeRef,
    tag: &str,
    scratch: &Scratch,
    options: &ReadabilityOptions,
    flags: GrabFlags,
) -> bool {
    let is_list = tag == "ul" || tag == "ol" || {
        let list_text = dom::text_density(node, &["ul", "ol"]);
        list_text > 0.9
    };

    let weight = if flags.contains(GrabFlags::WEIGHT_CLASSES) {
        scoring::class_weight(node) as f64
    } else {
        0.0
    };
    let score = scratch.score(node).unwrap_or(0.0);
    if weight + score < 0.0 {
        return true;
    }

    let text = dom::inner_text(node, true);
    if text.matches(',').count() >= 10 {
        return false;
    }

    let p_count = dom::get_elements_by_tag_name(node, "p").len();
    let img_count = dom::get_elements_by_tag_name(node, "img").len();
    let li_count = dom::get_elements_by_tag_name(node, "li").len();
    let input_count = dom::get_elements_by_tag_name(node, "input").len();
    let heading_density =
        dom::text_density(node, &["h1", "h2", "h3", "h4", "h5", "h6"]);

    let mut embed_count = 0;
    for embed_tag in ["object", "embed", "iframe"] {
        for embed in dom::get_elements_by_tag_name(node, embed_tag) {
            let hosts_video = embed.as_element().map_or(false, |element| {
                element
                    .attributes
                    .borrow()
                    .map
                    .values()
                    .any(|attr| options.video_regex().is_match(&attr.value))
            });
            if hosts_video {
                return false;
            }
            embed_count += 1;
        }
    }

    let inside_figure = dom::has_ancestor_tag(node, "figure", 3, |_| true);
    let link_density = dom::link_density(node);
    let content_length = text.chars().count();
    let modifier = options.link_density_modifier;

    // An explicit pixel width in ad-unit territory on a thin block.
    let ad_shaped_width = dom::get_attr(node, "width")
        .and_then(|w| w.parse::<u32>().ok())
        .map_or(false, |w| w > 0 && w <= 250);

    let mut have_to_remove = (img_count > 1
        && (p_count as f64) / (img_count as f64) < 0.4
        && !inside_figure)
        || (!is_list && li_count > p_count)
        || (input_count as f64 > (p_count as f64 / 3.0).floor())
        || (!is_list
            && heading_density < 0.9
            && content_length < 25
            && (img_count == 0 || img_count > 2)
            && !inside_figure)
        || (!is_list && weight < 25.0 && link_density > 0.25 + modifier)
        || (weight >= 25.0 && link_density > 0.5 + modifier)
        || (embed_count == 1 && content_length < 75)
        || embed_count > 1
        || (ad_shaped_width && content_length < 75 && !is_list);

    // Lists where every item wraps a single image are usually galleries.
    if is_list && have_to_remove {
        let simple_items = node.children().all(|child| {
            child.as_element().is_none() || dom::element_child_count(&child) <= 1
        });
        if simple_items && li_count > 0 && img_count == li_count {
            have_to_remove = false;
        }
    }

    have_to_remove
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_default(html: &str) -> Option<Extraction> {
        extract(html, &ReadabilityOptions::default())
    }

    fn lorem(sentences: usize) -> String {
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
         tempor incididunt ut labore et dolore magna aliqua. "
            .repeat(sentences)
    }

    #[test]
    fn test_extracts_simple_article() {
        let html = format!(
            "<html><body><article><h1>Title</h1><p>{}</p></article></body></html>",
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert!(extraction.text_length > 400);
        let text = extraction.content.text_contents();
        assert!(text.contains("Lorem ipsum"));
    }

    #[test]
    fn test_sidebar_is_excluded() {
        let html = format!(
            r#"<html><body><main>
                <article><p>{}</p><p>{}</p></article>
                <aside class="sidebar"><p>advertisement links here</p></aside>
            </main></body></html>"#,
            lorem(5),
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        let text = extraction.content.text_contents();
        assert!(text.contains("Lorem ipsum"));
        assert!(!text.contains("advertisement links"));
    }

    #[test]
    fn test_retry_relaxes_flags_for_unlikely_content() {
        // All the content sits in a "comment" classed container, which the
        // first attempt strips; a retry without STRIP_UNLIKELYS recovers it.
        let html = format!(
            r#"<html><body><div class="comment"><p>{}</p><p>{}</p></div></body></html>"#,
            lorem(5),
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert!(extraction.content.text_contents().contains("Lorem ipsum"));
    }

    #[test]
    fn test_no_content_returns_none() {
        assert!(extract_default("<html><body></body></html>").is_none());
    }

    #[test]
    fn test_byline_is_captured_and_removed() {
        let html = format!(
            r#"<html><body><article>
                <p class="byline">By Jane Doe</p>
                <p>{}</p><p>{}</p>
            </article></body></html>"#,
            lorem(5),
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert_eq!(extraction.byline.as_deref(), Some("By Jane Doe"));
        assert!(!extraction.content.text_contents().contains("Jane Doe"));
    }

    #[test]
    fn test_h1_demoted_to_h2() {
        let html = format!(
            "<html><body><article><h1>Headline</h1><p>{}</p></article></body></html>",
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert!(dom::get_elements_by_tag_name(&extraction.content, "h1").is_empty());
        assert_eq!(
            dom::get_elements_by_tag_name(&extraction.content, "h2").len(),
            1
        );
    }

    #[test]
    fn test_page_wrapper_present() {
        let html = format!(
            "<html><body><article><p>{}</p></article></body></html>",
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        let serialized = dom::serialize_children(&extraction.content);
        assert!(serialized.contains(r#"id="readability-page-1""#));
        assert!(serialized.contains(r#"class="page""#));
    }

    #[test]
    fn test_link_farm_div_is_cleaned() {
        let links: String = (0..20)
            .map(|i| format!(r#"<a href="/{i}">related link number {i}</a> "#))
            .collect();
        let html = format!(
            r#"<html><body><article>
                <p>{}</p><p>{}</p>
                <div>{links}</div>
            </article></body></html>"#,
            lorem(5),
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert!(!extraction.content.text_contents().contains("related link"));
    }

    #[test]
    fn test_allowed_video_iframe_survives() {
        let html = format!(
            r#"<html><body><article>
                <p>{}</p><p>{}</p>
                <iframe src="https://www.youtube.com/embed/abc123"></iframe>
            </article></body></html>"#,
            lorem(5),
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert_eq!(
            dom::get_elements_by_tag_name(&extraction.content, "iframe").len(),
            1
        );
    }

    #[test]
    fn test_non_video_iframe_removed() {
        let html = format!(
            r#"<html><body><article>
                <p>{}</p><p>{}</p>
                <iframe src="https://ads.example.com/unit"></iframe>
            </article></body></html>"#,
            lorem(5),
            lorem(5)
        );
        let extraction = extract_default(&html).unwrap();
        assert!(dom::get_elements_by_tag_name(&extraction.content, "iframe").is_empty());
    }
}
