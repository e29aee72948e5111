//! Code for handling extension tags.
//!
//! Extension tags are the only way for wiki authors to emit HTML that is not
//! on the Wikitext whitelist, such as the markup of an audio player. Because
//! of that, their output must never be sent back through a Wikitext parser:
//! every tag function writes finished HTML and reports an [`OutputMode`]
//! saying what it wrote.
//!
//! Tag names are registered in a static table. Names are case-insensitive,
//! like in MediaWiki.

use super::{Error, Result as RenderResult, State, StripMarker};
use crate::common::escape;
use std::collections::HashMap;

mod flash_mp3;

/// The result type for an extension tag function.
type Result<T = OutputMode, E = Error> = RenderResult<T, E>;

/// The attributes of an extension tag, by lowercase name.
pub type Attributes = HashMap<String, String>;

/// A helper struct for passing arguments required by all extension tags.
struct ExtensionTag<'call> {
    /// The attributes of the extension tag.
    attributes: &'call Attributes,
    /// The raw body text of the extension tag, if one existed in the source
    /// text.
    body: Option<&'call str>,
}

impl ExtensionTag<'_> {
    /// Returns the unevaluated body of the tag as a string.
    #[inline]
    pub fn body(&self) -> &str {
        self.body.unwrap_or("")
    }

    /// Returns the value of the attribute with the given name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// An extension tag function.
type ExtensionTagFn = fn(&mut String, &mut State<'_>, &ExtensionTag<'_>) -> Result;

/// All registered extension tags.
static EXTENSION_TAGS: phf::Map<&'static str, ExtensionTagFn> = phf::phf_map! {
    "flashmp3" => flash_mp3::flash_mp3,
};

/// The output mode of an extension tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OutputMode {
    /// The extension tag outputs nothing.
    Empty,
    /// The extension tag outputs an HTML fragment which must not be treated
    /// as Wikitext.
    Nowiki,
}

/// Returns true if `name` is a registered extension tag.
pub fn is_extension_tag(name: &str) -> bool {
    EXTENSION_TAGS.contains_key(name.to_ascii_lowercase().as_str())
}

/// Returns the names of all registered extension tags.
pub fn extension_tag_names() -> impl Iterator<Item = &'static str> {
    EXTENSION_TAGS.keys().copied()
}

/// Renders an extension tag.
///
/// Returns `None` when the tag renders nothing at all, which a host should
/// treat as an empty string.
pub fn render_extension_tag(
    state: &mut State<'_>,
    callee: &str,
    attributes: &Attributes,
    body: Option<&str>,
) -> RenderResult<Option<StripMarker>> {
    let callee = callee.to_ascii_lowercase();
    let mut out = String::new();

    let Some(extension_tag) = EXTENSION_TAGS.get(callee.as_str()) else {
        log::warn!("unknown extension tag <{callee}>");
        let body = escape(body.unwrap_or(""));
        return Ok(Some(StripMarker::Block(format!(
            "&lt;{callee}&gt;{body}&lt;/{callee}&gt;"
        ))));
    };

    let mode = extension_tag(&mut out, state, &ExtensionTag { attributes, body }).map_err(
        |err| Error::Node {
            tag: callee.clone(),
            err: Box::new(err),
        },
    )?;

    Ok(match mode {
        OutputMode::Empty => None,
        OutputMode::Nowiki => Some(StripMarker::NoWiki(out)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::Messages, config::Config, renderer::Statics, repo::LocalRepo};

    #[test]
    fn registry() {
        assert_eq!(extension_tag_names().collect::<Vec<_>>(), ["flashmp3"]);
        assert!(is_extension_tag("FlashMP3"));
        assert!(!is_extension_tag("flashmp4"));
    }

    #[test]
    fn unknown_tag() {
        let statics = Statics::new(Config::default(), Messages::english(), LocalRepo::default());
        let mut state = State::new(&statics);
        let out = render_extension_tag(&mut state, "nope", &Attributes::new(), Some("<b>"))
            .unwrap()
            .unwrap();
        assert_eq!(out, StripMarker::Block("&lt;nope&gt;&lt;b&gt;&lt;/nope&gt;".into()));
    }
}
