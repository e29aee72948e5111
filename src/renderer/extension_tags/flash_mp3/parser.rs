//! `<flashmp3>` body parsing.
//!
//! The body of the tag is the `flashvars`-style string from the old Flash
//! player:
//!
//! ```text
//! a.mp3,b.mp3|autostart=yes|loop=yes|bg=0xFFAA00
//! ```
//!
//! The first segment is always the file list. Whatever follows is a bag of
//! `key=value` options, most of which only ever meant something to the Flash
//! player and are ignored.

use regex::Regex;
use std::{collections::HashMap, fmt, sync::LazyLock};

/// The parsed body of a `<flashmp3>` tag.
#[derive(Debug, Eq, PartialEq)]
pub(super) struct Arguments<'a> {
    /// The raw file list segment.
    pub files_raw: &'a str,
    /// Non-blank file references, untrimmed, in source order.
    pub files: Vec<&'a str>,
    /// Well-formed options. When a key appears more than once, the last one
    /// wins.
    pub options: HashMap<&'a str, &'a str>,
}

/// Splits a tag body into its file list and options. Returns `None` if there
/// is nothing to play.
pub(super) fn parse(body: &str) -> Option<Arguments<'_>> {
    if body.is_empty() {
        return None;
    }

    let mut segments = body.split('|');
    let files_raw = segments.next()?;
    let files = files_raw
        .split(',')
        .filter(|file| !file.trim_ascii().is_empty())
        .collect::<Vec<_>>();

    if files.is_empty() {
        return None;
    }

    let options = segments
        .filter_map(|segment| {
            let mut parts = segment.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => Some((key, value)),
                _ => {
                    log::trace!("flashmp3: discarding malformed option '{segment}'");
                    None
                }
            }
        })
        .collect();

    Some(Arguments {
        files_raw,
        files,
        options,
    })
}

/// Player options understood by the bar UI.
#[derive(Debug, Default, Eq, PartialEq)]
pub(super) struct Options {
    /// Start playing as soon as the page loads.
    pub auto_play: bool,
    /// Repeat the playlist when it ends.
    pub repeat: bool,
    /// Background colour of the player.
    pub background: Option<Color>,
}

impl Options {
    /// Extracts the supported options from the raw option map.
    pub fn new(options: &HashMap<&str, &str>) -> Self {
        Self {
            auto_play: options.get("autostart") == Some(&"yes"),
            repeat: options.get("loop") == Some(&"yes"),
            background: options.get("bg").and_then(|value| Color::parse(value)),
        }
    }

    /// The CSS classes of the player root element.
    pub fn class(&self) -> String {
        let mut class = String::from("sm2-bar-ui");
        if self.auto_play {
            class += " auto-play";
        }
        if self.repeat {
            class += " repeat-playback";
        }
        class
    }
}

/// A validated CSS hex colour.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Color(String);

impl Color {
    /// Parses a Flash-style `0xRRGGBB` or `0xRGB` colour. Anything else is
    /// rejected.
    pub fn parse(value: &str) -> Option<Self> {
        static HEX: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^(?:[A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

        let value = value.to_lowercase();
        let hex = value.strip_prefix("0x")?;
        HEX.is_match(hex).then(|| Self(hex.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_and_options() {
        let args = parse("a.mp3, b.mp3,,|autostart=yes|loop=no|bg=0x000|loop=yes").unwrap();
        assert_eq!(args.files_raw, "a.mp3, b.mp3,,");
        assert_eq!(args.files, ["a.mp3", " b.mp3"]);
        assert_eq!(args.options.len(), 3);
        assert_eq!(args.options["loop"], "yes");

        let options = Options::new(&args.options);
        assert!(options.auto_play);
        assert!(options.repeat);
        assert_eq!(options.background.unwrap().to_string(), "#000");
    }

    #[test]
    fn malformed_options() {
        let args = parse("a.mp3|autostart|=|a=b=c||bg=|x=y").unwrap();
        assert_eq!(args.options.len(), 3);
        assert_eq!(args.options[""], "");
        assert_eq!(args.options["bg"], "");
        assert_eq!(args.options["x"], "y");
        assert!(!args.options.contains_key("autostart"));
        assert!(!args.options.contains_key("a"));
        assert_eq!(Options::new(&args.options), Options::default());
    }

    #[test]
    fn nothing_to_play() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("|autostart=yes"), None);
        assert_eq!(parse(", ,|loop=yes"), None);
        assert_eq!(parse("|"), None);
    }

    #[test]
    fn flags_are_exact() {
        for (key, value) in [("autostart", "Yes"), ("autostart", "true"), ("loop", "yes ")] {
            let options = Options::new(&HashMap::from([(key, value)]));
            assert_eq!(options.class(), "sm2-bar-ui", "{key}={value:?}");
        }
        let options = Options::new(&HashMap::from([("autostart", "yes"), ("loop", "yes")]));
        assert_eq!(options.class(), "sm2-bar-ui auto-play repeat-playback");
    }

    #[test]
    fn colors() {
        assert_eq!(Color::parse("0xFFAA00").unwrap().to_string(), "#ffaa00");
        assert_eq!(Color::parse("0XaBc").unwrap().to_string(), "#abc");
        for bad in ["0xGGG", "FFAA00", "#ffaa00", "0x", "0xFFAA0", "0xFFAA001", "0x12 ", ""] {
            assert_eq!(Color::parse(bad), None, "{bad:?}");
        }
    }
}
