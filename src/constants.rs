//! Heuristic regexes and tag sets used across the extraction pipeline.
//!
//! The regexes are part of the algorithm's contract and are compiled once
//! per process.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum text length an attempt must produce before retry flags are relaxed.
pub const DEFAULT_CHAR_THRESHOLD: usize = 500;

/// Number of top-scored candidates retained for promotion logic.
pub const DEFAULT_N_TOP_CANDIDATES: usize = 5;

/// Elements considered directly scorable.
pub const DEFAULT_TAGS_TO_SCORE: [&str; 12] = [
    "section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre", "div", "article", "main",
];

/// Block-level elements whose presence keeps a `<div>` from becoming a `<p>`.
pub const DIV_TO_P_ELEMS: [&str; 9] = [
    "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul",
];

/// Tags left alone when aggregated siblings are normalized to `<div>`.
pub const ALTER_TO_DIV_EXCEPTIONS: [&str; 6] = ["div", "article", "section", "p", "ol", "ul"];

/// Phrasing-content elements per the WHATWG category. `a`, `del` and `ins`
/// are phrasing only when all of their children are.
pub const PHRASING_ELEMS: [&str; 39] = [
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data", "datalist", "dfn", "em",
    "embed", "i", "img", "input", "kbd", "label", "mark", "math", "meter", "noscript", "object",
    "output", "progress", "q", "ruby", "samp", "script", "select", "small", "span", "strong",
    "sub", "sup", "textarea", "time", "var", "wbr",
];

/// ARIA roles that mark an element as page chrome.
pub const UNLIKELY_ROLES: [&str; 7] = [
    "menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog",
];

/// Attributes that only carry presentation and are stripped from the article.
pub const PRESENTATIONAL_ATTRIBUTES: [&str; 12] = [
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "hspace",
    "rules", "style", "valign", "vspace",
];

/// Elements whose `width`/`height` attributes are deprecated markup.
pub const DEPRECATED_SIZE_ATTRIBUTE_ELEMS: [&str; 5] = ["table", "th", "td", "hr", "pre"];

/// The shared regex table.
pub struct Regexps {
    pub unlikely_candidates: Regex,
    pub ok_maybe_its_a_candidate: Regex,
    pub positive: Regex,
    pub negative: Regex,
    pub byline: Regex,
    pub videos: Regex,
    pub share_elements: Regex,
    pub hash_url: Regex,
    pub b64_data_url: Regex,
    pub json_ld_article_types: Regex,
    pub schema_org_url: Regex,
    pub sentence_end: Regex,
    pub srcset_url: Regex,
    pub img_extensions: Regex,
    pub img_url: Regex,
    pub img_url_with_descriptor: Regex,
    pub display_none: Regex,
    pub visibility_hidden: Regex,
    pub title_separators: Regex,
}

pub static REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    unlikely_candidates: Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .unwrap(),
    ok_maybe_its_a_candidate: Regex::new(r"(?i)and|article|body|column|content|main|shadow")
        .unwrap(),
    positive: Regex::new(
        r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story",
    )
    .unwrap(),
    negative: Regex::new(
        r"(?i)-ad-|hidden|^hid$|\shid$|\shid\s|^hid\s|banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget",
    )
    .unwrap(),
    byline: Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").unwrap(),
    videos: Regex::new(
        r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload)\.org|player\.twitch\.tv)",
    )
    .unwrap(),
    share_elements: Regex::new(r"(?i)(\b|_)(share|sharedaddy)(\b|_)").unwrap(),
    hash_url: Regex::new(r"^#.+").unwrap(),
    b64_data_url: Regex::new(r"(?i)^data:\s*([^\s;,]+)\s*;\s*base64\s*,").unwrap(),
    json_ld_article_types: Regex::new(
        r"^Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference$",
    )
    .unwrap(),
    schema_org_url: Regex::new(r"^https?://schema\.org/?$").unwrap(),
    sentence_end: Regex::new(r"\.( |$)").unwrap(),
    srcset_url: Regex::new(r"(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))").unwrap(),
    img_extensions: Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").unwrap(),
    img_url: Regex::new(r"(?i)^\s*\S+\.(jpg|jpeg|png|webp)\S*\s*$").unwrap(),
    img_url_with_descriptor: Regex::new(r"(?i)\.(jpg|jpeg|png|webp)\s+\d").unwrap(),
    display_none: Regex::new(r"(?i)display\s*:\s*none").unwrap(),
    visibility_hidden: Regex::new(r"(?i)visibility\s*:\s*hidden").unwrap(),
    title_separators: Regex::new(r" (\||\-|–|—|\\|/|>|») ").unwrap(),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlikely_candidates() {
        assert!(REGEXPS.unlikely_candidates.is_match("sidebar-left"));
        assert!(REGEXPS.unlikely_candidates.is_match("social-share"));
        assert!(!REGEXPS.unlikely_candidates.is_match("article-body"));
    }

    #[test]
    fn test_ok_maybe_overrides_unlikely() {
        let s = "sidebar main-content";
        assert!(REGEXPS.unlikely_candidates.is_match(s));
        assert!(REGEXPS.ok_maybe_its_a_candidate.is_match(s));
    }

    #[test]
    fn test_class_weight_regexes() {
        assert!(REGEXPS.positive.is_match("post-body"));
        assert!(REGEXPS.negative.is_match("footer-nav"));
        assert!(REGEXPS.negative.is_match("promo hid "));
    }

    #[test]
    fn test_video_hosts() {
        assert!(REGEXPS.videos.is_match("https://www.youtube.com/embed/xyz"));
        assert!(REGEXPS.videos.is_match("//player.vimeo.com/video/1"));
        assert!(!REGEXPS.videos.is_match("https://ads.example.com/frame"));
    }

    #[test]
    fn test_json_ld_article_types() {
        assert!(REGEXPS.json_ld_article_types.is_match("NewsArticle"));
        assert!(REGEXPS.json_ld_article_types.is_match("BlogPosting"));
        assert!(!REGEXPS.json_ld_article_types.is_match("WebSite"));
    }

    #[test]
    fn test_b64_data_url() {
        let placeholder = "data:image/gif;base64,R0lGODlhAQABAAD/ACwAAAAAAQABAAACADs=";
        let caps = REGEXPS.b64_data_url.captures(placeholder).unwrap();
        assert_eq!(&caps[1], "image/gif");
    }
}
