//! Caption cleaning.

use std::sync::LazyLock;

use regex::Regex;

use signify_types::captions::{CaptionInput, EnhancedCaption};

/// Seconds allotted to each caption when the input carries no timing.
pub const DEFAULT_CAPTION_SECS: f64 = 3.0;

static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.*?\]|\(.*?\)").unwrap_or_else(|e| panic!("invalid annotation regex: {e}"))
});

/// Remove bracketed sound annotations, collapse whitespace and capitalize
/// the first character.
pub fn clean_caption(text: &str) -> String {
    let stripped = ANNOTATION_RE.replace_all(text, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Clean a batch of captions. Missing timing defaults to consecutive
/// [`DEFAULT_CAPTION_SECS`] slots by position.
pub fn enhance(captions: &[CaptionInput]) -> Vec<EnhancedCaption> {
    captions
        .iter()
        .enumerate()
        .map(|(i, caption)| {
            let (start, end) = match caption {
                CaptionInput::Timed { start, end, .. } => (*start, *end),
                CaptionInput::Text(_) => (None, None),
            };
            let start = start.unwrap_or(i as f64 * DEFAULT_CAPTION_SECS);
            let end = end.unwrap_or(start + DEFAULT_CAPTION_SECS);
            EnhancedCaption {
                text: clean_caption(caption.text()),
                start,
                end,
                original: caption.text().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_annotations_and_collapses() {
        assert_eq!(clean_caption("  [Music]  hello   (laughs) world "), "Hello world");
        assert_eq!(clean_caption("[applause]"), "");
        assert_eq!(clean_caption("élan vital"), "Élan vital");
    }

    #[test]
    fn default_timing_is_positional() {
        let out = enhance(&[
            CaptionInput::Text("one".into()),
            CaptionInput::Timed {
                text: "two".into(),
                start: Some(10.0),
                end: None,
            },
            CaptionInput::Text("three".into()),
        ]);
        assert_eq!((out[0].start, out[0].end), (0.0, 3.0));
        assert_eq!((out[1].start, out[1].end), (10.0, 13.0));
        assert_eq!((out[2].start, out[2].end), (6.0, 9.0));
        assert_eq!(out[1].original, "two");
        assert_eq!(out[2].text, "Three");
    }
}
