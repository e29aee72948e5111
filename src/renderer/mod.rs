//! Tag rendering types and functions.
//!
//! A host document is not re-parsed after an extension tag has rendered: the
//! output of a tag is an opaque blob of HTML that is substituted into the
//! final page as-is. Everything a tag wants to say about the *page*, rather
//! than about its own position in the page, goes into [`ParserOutput`]
//! instead. That covers dependency tracking (which files and external links a
//! page uses) as well as the scripts and styles the page must load.
//!
//! Tags are stateless between invocations. The only thing shared between two
//! tags on the same page is the [`ParserOutput`], which never feeds back into
//! rendering, so rendering the same tag twice always produces the same HTML.

use crate::{common::Localizer, config::Config, repo::FileRepo};
use core::fmt;

pub use extension_tags::{
    Attributes, extension_tag_names, is_extension_tag, render_extension_tag,
};
pub use globals::ParserOutput;

mod extension_tags;
mod globals;

/// A tag rendering error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write to a buffer failed.
    #[error("fmt error: {0}")]
    Fmt(#[from] fmt::Error),

    /// A backtraced tag error.
    #[error("{err}\n  at <{tag}>")]
    Node {
        /// The name of the tag.
        tag: String,
        /// The error.
        #[source]
        err: Box<Self>,
    },
}

/// The standard result type used by all fallible renderer functions.
pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// Collaborators which live for the whole lifetime of a renderer.
pub struct Statics {
    /// Player configuration.
    pub config: Config,
    /// Localised interface messages.
    pub messages: Box<dyn Localizer>,
    /// The uploaded file repository.
    pub repo: Box<dyn FileRepo>,
}

impl Statics {
    /// Creates a new set of renderer statics.
    pub fn new(
        config: Config,
        messages: impl Localizer + 'static,
        repo: impl FileRepo + 'static,
    ) -> Self {
        Self {
            config,
            messages: Box::new(messages),
            repo: Box::new(repo),
        }
    }
}

/// Renderer state for a single page.
pub struct State<'s> {
    /// Page data collected by tags.
    pub globals: ParserOutput,
    /// Renderer-wide collaborators.
    pub statics: &'s Statics,
}

impl<'s> State<'s> {
    /// Creates a new empty page state.
    pub fn new(statics: &'s Statics) -> Self {
        Self {
            globals: ParserOutput::default(),
            statics,
        }
    }
}

/// The rendered output of an extension tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StripMarker {
    /// Block content which is not a finished fragment.
    Block(String),
    /// A finished HTML fragment which must not be processed as Wikitext.
    NoWiki(String),
}

impl StripMarker {
    /// The HTML content of the marker.
    pub fn as_str(&self) -> &str {
        match self {
            StripMarker::Block(html) | StripMarker::NoWiki(html) => html,
        }
    }

    /// Returns the HTML content of the marker.
    pub fn into_string(self) -> String {
        match self {
            StripMarker::Block(html) | StripMarker::NoWiki(html) => html,
        }
    }
}
