//! Candidate scoring: attempt-local scratch state, score initialization and
//! class weighting.

use crate::constants::REGEXPS;
use crate::dom_utils;
use kuchikikiki::NodeRef;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Scratch state for one grab attempt, keyed by node identity.
///
/// A present score means the node has been initialized as a candidate;
/// absence is meaningful. Dropping the table at the end of the attempt
/// clears every score and flag, so nothing leaks between runs.
#[derive(Default)]
pub struct Scratch {
    scores: HashMap<usize, f64>,
    data_tables: HashSet<usize>,
}

fn node_key(node: &NodeRef) -> usize {
    Rc::as_ptr(&node.0) as usize
}

impl Scratch {
    pub fn score(&self, node: &NodeRef) -> Option<f64> {
        self.scores.get(&node_key(node)).copied()
    }

    pub fn set_score(&mut self, node: &NodeRef, value: f64) {
        self.scores.insert(node_key(node), value);
    }

    pub fn add_score(&mut self, node: &NodeRef, delta: f64) {
        *self.scores.entry(node_key(node)).or_insert(0.0) += delta;
    }

    pub fn mark_data_table(&mut self, node: &NodeRef) {
        self.data_tables.insert(node_key(node));
    }

    pub fn is_data_table(&self, node: &NodeRef) -> bool {
        self.data_tables.contains(&node_key(node))
    }

    /// Carry scratch state across a `set_node_tag` replacement.
    pub fn transfer(&mut self, old: &NodeRef, new: &NodeRef) {
        if let Some(score) = self.scores.remove(&node_key(old)) {
            self.scores.insert(node_key(new), score);
        }
        if self.data_tables.remove(&node_key(old)) {
            self.data_tables.insert(node_key(new));
        }
    }
}

/// Seed an element's content score from its tag, plus the class weight when
/// class weighing is enabled.
pub fn initialize_node(node: &NodeRef, scratch: &mut Scratch, weight_classes: bool) {
    let tag = dom_utils::tag_name(node).unwrap_or_default();
    let mut score = match tag.as_str() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };

    if weight_classes {
        score += class_weight(node) as f64;
    }

    scratch.set_score(node, score);
}

/// ±25 for positive/negative names on each of `class` and `id`.
pub fn class_weight(node: &NodeRef) -> i32 {
    let mut weight = 0;

    if let Some(class) = dom_utils::get_attr(node, "class") {
        if !class.is_empty() {
            if REGEXPS.negative.is_match(&class) {
                weight -= 25;
            }
            if REGEXPS.positive.is_match(&class) {
                weight += 25;
            }
        }
    }

    if let Some(id) = dom_utils::get_attr(node, "id") {
        if !id.is_empty() {
            if REGEXPS.negative.is_match(&id) {
                weight -= 25;
            }
            if REGEXPS.positive.is_match(&id) {
                weight += 25;
            }
        }
    }

    weight
}

/// A plausible byline container: an author rel/itemprop or a byline-ish
/// class name, with a short non-empty text.
pub fn is_valid_byline(node: &NodeRef, match_string: &str) -> bool {
    let rel = dom_utils::get_attr(node, "rel").unwrap_or_default();
    let itemprop = dom_utils::get_attr(node, "itemprop").unwrap_or_default();

    let marked = rel
        .split_whitespace()
        .any(|r| r.eq_ignore_ascii_case("author"))
        || itemprop.to_lowercase().contains("author")
        || REGEXPS.byline.is_match(match_string);
    if !marked {
        return false;
    }

    let text = dom_utils::inner_text(node, true);
    !text.is_empty() && text.chars().count() < 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_utils::get_elements_by_tag_name;
    use kuchikikiki::traits::TendrilSink;

    fn parse(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }

    #[test]
    fn test_scratch_presence_is_meaningful() {
        let doc = parse("<div></div>");
        let div = get_elements_by_tag_name(&doc, "div").remove(0);
        let mut scratch = Scratch::default();
        assert!(scratch.score(&div).is_none());
        scratch.add_score(&div, 2.5);
        assert_eq!(scratch.score(&div), Some(2.5));
    }

    #[test]
    fn test_scratch_transfer() {
        let doc = parse("<font>x</font>");
        let font = get_elements_by_tag_name(&doc, "font").remove(0);
        let mut scratch = Scratch::default();
        scratch.set_score(&font, 7.0);
        scratch.mark_data_table(&font);

        let span = dom_utils::set_node_tag(&font, "span");
        scratch.transfer(&font, &span);
        assert_eq!(scratch.score(&span), Some(7.0));
        assert!(scratch.is_data_table(&span));
        assert!(scratch.score(&font).is_none());
    }

    #[test]
    fn test_initialize_node_tag_scores() {
        let doc = parse("<div></div><blockquote></blockquote><ul></ul><h2></h2>");
        let mut scratch = Scratch::default();
        let expectations = [("div", 5.0), ("blockquote", 3.0), ("ul", -3.0), ("h2", -5.0)];
        for (tag, expected) in expectations {
            let node = get_elements_by_tag_name(&doc, tag).remove(0);
            initialize_node(&node, &mut scratch, true);
            assert_eq!(scratch.score(&node), Some(expected), "tag {}", tag);
        }
    }

    #[test]
    fn test_class_weight() {
        let doc = parse(
            r#"<div id="a" class="article-body"></div>
               <div id="b" class="sidebar"></div>
               <div id="footer" class="post"></div>"#,
        );
        let divs = get_elements_by_tag_name(&doc, "div");
        assert_eq!(class_weight(&divs[0]), 25);
        assert_eq!(class_weight(&divs[1]), -25);
        assert_eq!(class_weight(&divs[2]), 0);
    }

    #[test]
    fn test_is_valid_byline() {
        let doc = parse(
            r#"<a rel="author" href="/jane">Jane Doe</a>
               <p class="byline">By John</p>
               <p class="byline"></p>"#,
        );
        let link = get_elements_by_tag_name(&doc, "a").remove(0);
        assert!(is_valid_byline(&link, ""));

        let paragraphs = get_elements_by_tag_name(&doc, "p");
        assert!(is_valid_byline(&paragraphs[0], "byline "));
        assert!(!is_valid_byline(&paragraphs[1], "byline "));
    }
}
