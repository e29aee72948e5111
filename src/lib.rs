//! Renders the legacy `<flashmp3>` wiki extension tag as a SoundManager 2 bar
//! UI player.
//!
//! The usual entry point is [`wikitext::render_document`], which replaces
//! every registered extension tag in a document. Hosts with their own
//! Wikitext parser can call [`renderer::render_extension_tag`] directly for
//! each tag they find.

pub mod common;
pub mod config;
pub mod renderer;
pub mod repo;
pub mod title;
pub mod wikitext;
