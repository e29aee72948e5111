//! The legacy `<flashmp3>` extension tag.
//!
//! The tag used to embed a Flash MP3 player. Flash is long gone, so the same
//! markup is now rendered as a SoundManager 2 “bar UI” player, which is
//! driven entirely by JavaScript and the CSS classes on its markup.
//!
//! ```text
//! <flashmp3>Song.mp3,https://example.com/b.mp3|autostart=yes|bg=0x336699</flashmp3>
//! ```
//!
//! Invalid input never produces an error. Bad options are dropped, missing
//! files are skipped, and if nothing is left to play, nothing is rendered.

use super::{ExtensionTag, OutputMode, Result, State};
use crate::config::MODULE_NAME;

mod parser;
mod renderer;

/// The `<flashmp3>` extension tag.
pub(super) fn flash_mp3(
    out: &mut String,
    state: &mut State<'_>,
    arguments: &ExtensionTag<'_>,
) -> Result {
    // Last.fm playlists were only ever supported by the Flash player.
    if arguments.get("type") == Some("lastfm") {
        return Ok(OutputMode::Empty);
    }

    let Some(args) = parser::parse(arguments.body()) else {
        return Ok(OutputMode::Empty);
    };

    let tracks = renderer::resolve_tracks(state, &args.files);
    if tracks.is_empty() {
        log::debug!("flashmp3: nothing playable in '{}'", args.files_raw);
        return Ok(OutputMode::Empty);
    }

    let options = parser::Options::new(&args.options);
    load_player(state);
    renderer::render(out, &*state.statics.messages, &options, &tracks)?;
    Ok(OutputMode::Nowiki)
}

/// Makes sure the page loads the player script and styles.
fn load_player(state: &mut State<'_>) {
    let config = &state.statics.config;
    if config.use_resource_manager {
        state.globals.add_modules(MODULE_NAME);
        state.globals.add_module_styles(MODULE_NAME);
    } else {
        state.globals.add_head_item(&config.cdn_head_item());
    }
}
