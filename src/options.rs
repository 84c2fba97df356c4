//! Configuration options for article extraction.
//!
//! [`ReadabilityOptions`] carries every knob the pipeline consults;
//! [`ReadabilityOptionsBuilder`] layers overrides on top of the defaults.
//!
//! ## Example
//!
//! ```rust
//! use readably::{Readability, ReadabilityOptions};
//!
//! let html = "<html><body><article><p>Content...</p></article></body></html>";
//!
//! // Defaults
//! let readability = Readability::new(html, None, None).unwrap();
//!
//! // Overrides via the builder
//! let options = ReadabilityOptions::builder()
//!     .char_threshold(300)
//!     .nb_top_candidates(10)
//!     .keep_classes(true)
//!     .build();
//!
//! let readability = Readability::new(html, None, Some(options)).unwrap();
//! ```

use crate::constants::{DEFAULT_CHAR_THRESHOLD, DEFAULT_N_TOP_CANDIDATES, REGEXPS};
use kuchikikiki::NodeRef;
use regex::Regex;

/// Configuration for the extraction pipeline: scoring thresholds, element
/// limits, cleanup behavior and metadata extraction.
#[derive(Debug, Clone)]
pub struct ReadabilityOptions {
    /// Diagnostic logging to stderr. Default: `false`.
    pub debug: bool,

    /// Hard ceiling on the document's element count; documents over the
    /// limit are rejected up front (`parse()` returns `None`). 0 disables
    /// the check. Default: `0`.
    pub max_elems_to_parse: usize,

    /// How many of the highest-scored candidates the promotion logic keeps
    /// around. Default: `5`.
    pub nb_top_candidates: usize,

    /// Minimum text length an extraction attempt must yield before the
    /// retry flags start being relaxed. Default: `500`.
    pub char_threshold: usize,

    /// Class tokens that survive class scrubbing. Default: `["page"]`.
    pub classes_to_preserve: Vec<String>,

    /// Skip class scrubbing entirely. Default: `false`.
    pub keep_classes: bool,

    /// Skip JSON-LD metadata extraction. Default: `false`.
    pub disable_json_ld: bool,

    /// Embeds whose attributes match this regex survive cleanup. `None`
    /// falls back to the built-in video-host list.
    pub allowed_video_regex: Option<Regex>,

    /// Additive bias on the conditional cleaner's link-density limits;
    /// positive values tolerate more links. Default: `0.0`.
    pub link_density_modifier: f64,

    /// Custom content serializer, handed the article container. `None`
    /// uses the built-in HTML serializer.
    pub serializer: Option<fn(&NodeRef) -> String>,
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self {
            debug: false,
            max_elems_to_parse: 0,
            nb_top_candidates: DEFAULT_N_TOP_CANDIDATES,
            char_threshold: DEFAULT_CHAR_THRESHOLD,
            classes_to_preserve: vec!["page".to_string()],
            keep_classes: false,
            disable_json_ld: false,
            allowed_video_regex: None,
            link_density_modifier: 0.0,
            serializer: None,
        }
    }
}

impl ReadabilityOptions {
    /// Start from the defaults and override selectively.
    pub fn builder() -> ReadabilityOptionsBuilder {
        ReadabilityOptionsBuilder::default()
    }

    /// The regex deciding which embeds survive cleanup.
    pub(crate) fn video_regex(&self) -> &Regex {
        self.allowed_video_regex.as_ref().unwrap_or(&REGEXPS.videos)
    }
}

/// Builder for [`ReadabilityOptions`].
///
/// Starts from [`ReadabilityOptions::default()`] and edits it in place, so
/// anything not set keeps its default.
///
/// ```rust
/// use readably::ReadabilityOptions;
///
/// let options = ReadabilityOptions::builder()
///     .char_threshold(300)
///     .debug(true)
///     .build();
/// assert_eq!(options.nb_top_candidates, 5);
/// ```
#[derive(Default)]
pub struct ReadabilityOptionsBuilder {
    options: ReadabilityOptions,
}

impl ReadabilityOptionsBuilder {
    /// Enable or disable debug logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    /// Set the element-count ceiling
    pub fn max_elems_to_parse(mut self, max: usize) -> Self {
        self.options.max_elems_to_parse = max;
        self
    }

    /// Set the number of top candidates to consider
    pub fn nb_top_candidates(mut self, nb: usize) -> Self {
        self.options.nb_top_candidates = nb;
        self
    }

    /// Set the character threshold
    pub fn char_threshold(mut self, threshold: usize) -> Self {
        self.options.char_threshold = threshold;
        self
    }

    /// Set the class tokens to preserve
    pub fn classes_to_preserve(mut self, classes: Vec<String>) -> Self {
        self.options.classes_to_preserve = classes;
        self
    }

    /// Keep all class attributes
    pub fn keep_classes(mut self, keep: bool) -> Self {
        self.options.keep_classes = keep;
        self
    }

    /// Disable JSON-LD extraction
    pub fn disable_json_ld(mut self, disable: bool) -> Self {
        self.options.disable_json_ld = disable;
        self
    }

    /// Set the allowed-video regex
    pub fn allowed_video_regex(mut self, regex: Regex) -> Self {
        self.options.allowed_video_regex = Some(regex);
        self
    }

    /// Set the link-density modifier
    pub fn link_density_modifier(mut self, modifier: f64) -> Self {
        self.options.link_density_modifier = modifier;
        self
    }

    /// Set a custom content serializer
    pub fn serializer(mut self, serializer: fn(&NodeRef) -> String) -> Self {
        self.options.serializer = Some(serializer);
        self
    }

    /// Finish, yielding the configured options
    pub fn build(self) -> ReadabilityOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReadabilityOptions::default();
        assert_eq!(options.nb_top_candidates, 5);
        assert_eq!(options.char_threshold, 500);
        assert_eq!(options.classes_to_preserve, vec!["page".to_string()]);
        assert!(!options.keep_classes);
    }

    #[test]
    fn test_builder_overrides() {
        let options = ReadabilityOptions::builder()
            .char_threshold(300)
            .nb_top_candidates(10)
            .keep_classes(true)
            .build();
        assert_eq!(options.char_threshold, 300);
        assert_eq!(options.nb_top_candidates, 10);
        assert!(options.keep_classes);
        assert!(!options.debug);
    }

    #[test]
    fn test_builder_keeps_untouched_defaults() {
        let options = ReadabilityOptions::builder().debug(true).build();
        assert_eq!(options.char_threshold, 500);
        assert_eq!(options.classes_to_preserve, vec!["page".to_string()]);
        assert!(options.serializer.is_none());
    }

    #[test]
    fn test_video_regex_override() {
        let options = ReadabilityOptions::builder()
            .allowed_video_regex(Regex::new(r"(?i)myvideohost\.example").unwrap())
            .build();
        assert!(options.video_regex().is_match("https://myvideohost.example/embed/1"));
        assert!(!options.video_regex().is_match("https://www.youtube.com/embed/xyz"));
    }
}
