pub mod init;
pub mod inspect;
pub mod replay;

pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use replay::{replay, ReplayArgs};

use anyhow::{Context, Result};
use std::path::Path;
use wireframe_editor::{EditSession, SessionConfig};

/// Open a session over the layout stored at `path`
pub(crate) fn open_layout(path: &Path, config: &SessionConfig) -> Result<EditSession> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read layout {}", path.display()))?;
    EditSession::open(&json, config.clone())
        .with_context(|| format!("Invalid layout {}", path.display()))
}
