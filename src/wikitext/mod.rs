//! A minimal Wikitext host pipeline.
//!
//! This does not parse Wikitext. It only does the first thing a real parser
//! does, which is to find extension tags, run them, and splice their output
//! back into the source text. Everything else passes through untouched.
//!
//! Like in MediaWiki:
//!
//! * Tag names are case-insensitive.
//! * A start tag without a matching end tag is not a tag, it is text.
//! * Tags inside HTML comments are not tags.
//! * Attribute names are lowercased and attribute values are entity-decoded.

use crate::renderer::{Attributes, Result, State, extension_tag_names, render_extension_tag};
use html_escape::decode_html_entities;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Builds a regular expression alternation matching any registered tag name.
fn tag_names_regex() -> String {
    extension_tag_names()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// Matches a comment, or the start of a registered extension tag.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(&format!(
        r"<!--.*?(?:-->|\z)|<({})(\s[^>]*?)?(/?)>",
        tag_names_regex()
    ))
    .case_insensitive(true)
    .dot_matches_new_line(true)
    .build()
    .unwrap()
});

/// Matches the end of a registered extension tag.
static END_TAG: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(&format!(r"</({})\s*>", tag_names_regex()))
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// Matches one attribute in a start tag.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s/>"'=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

/// Parses the attribute text of a start tag. When an attribute is repeated,
/// the last one wins.
pub fn parse_attributes(text: &str) -> Attributes {
    ATTRIBUTE
        .captures_iter(text)
        .map(|capture| {
            let name = capture[1].to_lowercase();
            let value = capture
                .get(2)
                .or_else(|| capture.get(3))
                .or_else(|| capture.get(4))
                .map_or("", |value| value.as_str());
            (name, decode_html_entities(value).trim().to_string())
        })
        .collect()
}

/// Renders all extension tags in `source`, returning the source text with
/// every tag replaced by its output.
pub fn render_document(state: &mut State<'_>, source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut flushed = 0;
    let mut pos = 0;

    while let Some(start) = START_TAG.captures_at(source, pos) {
        let start_range = start.get_match().range();
        pos = start_range.end;

        let Some(name) = start.get(1).map(|name| name.as_str()) else {
            // Comment
            continue;
        };

        let attributes = start.get(2).map_or("", |attrs| attrs.as_str());
        let self_closing = start.get(3).is_some_and(|slash| !slash.is_empty());

        let (body, end) = if self_closing {
            (None, start_range.end)
        } else {
            let rest = &source[start_range.end..];
            let Some(end_tag) = END_TAG
                .captures_iter(rest)
                .find(|end_tag| end_tag[1].eq_ignore_ascii_case(name))
            else {
                log::trace!("unbalanced <{name}> at {}", start_range.start);
                continue;
            };
            let end_range = end_tag.get_match().range();
            (
                Some(&rest[..end_range.start]),
                start_range.end + end_range.end,
            )
        };

        out += &source[flushed..start_range.start];
        let attributes = parse_attributes(attributes);
        if let Some(marker) = render_extension_tag(state, name, &attributes, body)? {
            out += marker.as_str();
        }
        flushed = end;
        pos = end;
    }

    out += &source[flushed..];
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::Messages, config::Config, renderer::Statics, repo::LocalRepo};

    fn statics() -> Statics {
        Statics::new(
            Config::default(),
            Messages::english(),
            LocalRepo::new("/images", ["Song.mp3"]),
        )
    }

    #[test]
    fn attributes() {
        let attrs = parse_attributes(r#" TYPE="lastfm" id='a &amp; b' width=100 hidden type = "x" "#);
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs["type"], "x");
        assert_eq!(attrs["id"], "a & b");
        assert_eq!(attrs["width"], "100");
        assert_eq!(attrs["hidden"], "");
        assert!(parse_attributes("").is_empty());
    }

    #[test]
    fn replaces_tags() {
        let statics = statics();
        let mut state = State::new(&statics);
        let out = render_document(
            &mut state,
            "Before <FlashMP3>Song.mp3</flashMP3> middle <flashmp3 type=\"lastfm\">Song.mp3</flashmp3> after",
        )
        .unwrap();

        let (before, rest) = out.split_once(r#"<div class="sm2-bar-ui">"#).unwrap();
        assert_eq!(before, "Before ");
        assert!(rest.ends_with("</div> middle  after"));
        assert!(rest.contains(r#"<li><a href="/images/Song.mp3">File:Song.mp3</a></li>"#));
        assert_eq!(state.globals.images().collect::<Vec<_>>(), ["Song.mp3"]);
    }

    #[test]
    fn leaves_other_text_alone() {
        let statics = statics();
        let mut state = State::new(&statics);
        for source in [
            "",
            "no tags here",
            "<flashmp3>Song.mp3",
            "<flashmp3x>Song.mp3</flashmp3x>",
            "<!-- <flashmp3>Song.mp3</flashmp3> -->",
            "<!-- unterminated <flashmp3>Song.mp3</flashmp3>",
        ] {
            assert_eq!(render_document(&mut state, source).unwrap(), source);
        }
        assert_eq!(state.globals.images().count(), 0);
    }

    #[test]
    fn self_closing_and_missing_files() {
        let statics = statics();
        let mut state = State::new(&statics);
        let out = render_document(
            &mut state,
            "a<flashmp3 />b<flashmp3>Missing.mp3</flashmp3>c<flashmp3></flashmp3>d",
        )
        .unwrap();
        assert_eq!(out, "abcd");
    }

    #[test]
    fn self_closing_then_balanced() {
        let statics = statics();
        let mut state = State::new(&statics);
        let out = render_document(&mut state, "<flashmp3/><flashmp3>Song.mp3</flashmp3>").unwrap();
        assert!(out.starts_with(r#"<div class="sm2-bar-ui">"#));
    }

    #[test]
    fn balanced_then_unbalanced() {
        let statics = statics();
        let mut state = State::new(&statics);
        let out = render_document(
            &mut state,
            "<flashmp3>Song.mp3</flashmp3> and <flashmp3>Song.mp3",
        )
        .unwrap();
        assert!(out.starts_with(r#"<div class="sm2-bar-ui">"#));
        assert!(out.ends_with("</div> and <flashmp3>Song.mp3"));
    }
}
