//! `<flashmp3>` track resolution and player markup.

use super::parser::Options;
use crate::{
    common::{Localizer, escape},
    renderer::{Result, State},
    title::{Namespace, Title},
};
use core::fmt::Write as _;

/// A playable playlist entry.
#[derive(Debug, Eq, PartialEq)]
pub(super) struct Track {
    /// The URL of the audio file.
    pub address: String,
    /// The label shown in the playlist.
    pub title: String,
}

/// Returns true if the file reference is an absolute URL rather than the name
/// of an uploaded file. The reference is not trimmed first, so ` http://a`
/// names a (probably missing) file.
fn is_external(file: &str) -> bool {
    file.starts_with("http://") || file.starts_with("https://")
}

/// Resolves file references to playable tracks, recording page dependencies
/// along the way. References to missing or invalid files are skipped.
///
/// External URLs are labelled by their position in the *resulting* playlist,
/// so a skipped file does not leave a gap in the numbering.
pub(super) fn resolve_tracks(state: &mut State<'_>, files: &[&str]) -> Vec<Track> {
    let statics = state.statics;
    let label = statics.messages.plain("sm2shim-track");

    let mut tracks = Vec::with_capacity(files.len());
    for &file in files {
        let track = if is_external(file) {
            state.globals.add_external_link(file);
            Track {
                address: file.to_string(),
                title: format!("{label} {}", tracks.len() + 1),
            }
        } else {
            let Some(title) = Title::new_from_text(file, Namespace::file()) else {
                log::debug!("flashmp3: '{file}' is not a valid file name");
                continue;
            };

            let Some(found) = statics.repo.find_file(&title) else {
                log::debug!("flashmp3: no such file '{title}'");
                continue;
            };

            state.globals.add_image(&found.db_key());
            state.globals.add_link(found.title.full_text());
            Track {
                title: found.title.full_text().to_string(),
                address: found.url,
            }
        };

        tracks.push(track);
    }

    tracks
}

/// Writes one control bar button.
fn button(out: &mut String, extra_class: &str, action: &str, icon: &str, label: &str) -> Result {
    writeln!(
        out,
        r##"<div class="sm2-inline-element sm2-button-element{extra_class}"><div class="sm2-button-bd"><a href="#{action}" title="{label}" class="sm2-inline-button sm2-icon-{icon}">{label}</a></div></div>"##
    )?;
    Ok(())
}

/// Writes the bar UI player markup for a non-empty playlist.
pub(super) fn render(
    out: &mut String,
    messages: &dyn Localizer,
    options: &Options,
    tracks: &[Track],
) -> Result {
    let style = options
        .background
        .as_ref()
        .map(|color| format!(r#" style="background-color: {color}""#))
        .unwrap_or_default();

    writeln!(out, r#"<div class="{}">"#, options.class())?;

    writeln!(out, r#"<div class="bd sm2-main-controls"{style}>"#)?;
    writeln!(out, r#"<div class="sm2-inline-texture"></div>"#)?;
    button(out, "", "play", "play-pause", &messages.escaped("sm2shim-playpause"))?;
    writeln!(out, r#"<div class="sm2-inline-element sm2-inline-status">"#)?;
    writeln!(
        out,
        r#"<div class="sm2-playlist"><div class="sm2-playlist-target"><noscript><p>{}</p></noscript></div></div>"#,
        messages.escaped("sm2shim-jsrequired")
    )?;
    writeln!(out, r#"<div class="sm2-progress"><div class="sm2-row">"#)?;
    writeln!(out, r#"<div class="sm2-inline-time">0:00</div>"#)?;
    writeln!(
        out,
        r#"<div class="sm2-progress-bd"><div class="sm2-progress-track"><div class="sm2-progress-bar"></div><div class="sm2-progress-ball"><div class="icon-overlay"></div></div></div></div>"#
    )?;
    writeln!(out, r#"<div class="sm2-inline-duration">0:00</div>"#)?;
    writeln!(out, "</div></div>")?;
    writeln!(out, "</div>")?;
    button(out, "", "prev", "previous", &messages.escaped("sm2shim-previous"))?;
    button(out, "", "next", "next", &messages.escaped("sm2shim-next"))?;
    button(out, "", "repeat", "repeat", &messages.escaped("sm2shim-repeat"))?;
    button(out, " sm2-menu", "menu", "menu", &messages.escaped("sm2shim-menu"))?;
    writeln!(out, "</div>")?;

    writeln!(out, r#"<div class="bd sm2-playlist-drawer sm2-element"{style}>"#)?;
    writeln!(
        out,
        r#"<div class="sm2-inline-texture"><div class="sm2-box-shadow"></div></div>"#
    )?;
    writeln!(out, r#"<div class="sm2-playlist-wrapper">"#)?;
    writeln!(out, r#"<ul class="sm2-playlist-bd">"#)?;
    for track in tracks {
        writeln!(
            out,
            r#"<li><a href="{}">{}</a></li>"#,
            escape(&track.address),
            escape(&track.title)
        )?;
    }
    writeln!(out, "</ul>")?;
    writeln!(out, "</div>")?;
    writeln!(out, "</div>")?;

    write!(out, "</div>")?;
    Ok(())
}
