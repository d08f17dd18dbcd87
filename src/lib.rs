mod player;
mod player_view;
mod settings;
mod state;
mod timer;

use thiserror::Error;

pub use player::Event;
pub use player::Player;
pub use player_view::PlayerView;
pub use settings::{uri_pipeline, Settings, DEFAULT_CAPS};
pub use state::{Change, Flags, PlaybackState};
pub use timer::DelayTimer;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Glib(#[from] glib::Error),
    #[error("{0}")]
    Bool(#[from] glib::BoolError),
    #[error("failed to cast gstreamer element")]
    Cast,
    #[error("no video sink has been set")]
    NoSink,
    #[error("pipeline has no unlinked video source pad")]
    UnlinkedPad,
    #[error("unlinked source pad has no parent element")]
    PadParent,
    #[error("invalid caps `{0}`")]
    Caps(String),
}
