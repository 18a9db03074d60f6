#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic)]

pub mod assets;
pub mod layers;
pub mod preferences;
pub mod session;
pub mod stylus_events;
pub mod surface;
pub mod window;

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let preferences = preferences::Preferences::load();
    if let Err(e) = preferences.save() {
        log::warn!("Failed to save preferences:\n{e:?}");
    };

    let background = assets::load_background(&preferences.asset_path);
    let canvas = surface::Canvas::new(preferences.input_policy, preferences.tool);
    let session = session::Session::new(background, canvas);

    window::Shell::new(&preferences, session)?.run()
}
