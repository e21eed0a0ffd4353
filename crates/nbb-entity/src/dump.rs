//! One-way snapshot dumps.

use std::io::Write;
use std::path::{Path, PathBuf};

use nbb_types::AttributeMap;
use tracing::debug;

use crate::error::{EntityError, EntityResult};

/// Mode requested for new dump files before the process umask applies, the
/// same as `std::fs::write`.
#[cfg(unix)]
const SNAPSHOT_MODE: u32 = 0o666;

/// Render attributes as pretty JSON: keys ascending, two-space indent, no
/// trailing newline.
pub fn render_snapshot(attributes: &AttributeMap) -> EntityResult<String> {
    serde_json::to_string_pretty(attributes).map_err(|e| EntityError::Serialization(e.to_string()))
}

/// File name for an entity's dump. Path separators and control characters
/// in the display name become `_` so the file stays inside the target
/// directory.
pub fn snapshot_file_name(display_name: &str) -> String {
    let stem: String = display_name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => "_.json".to_string(),
        _ => format!("{stem}.json"),
    }
}

/// Write `attributes` to `<directory>/<display_name>.json`.
///
/// The document is written to a temporary file in `directory` and then
/// renamed over the target, so readers never observe a partial dump.
pub(crate) fn write_snapshot(
    directory: &Path,
    display_name: &str,
    attributes: &AttributeMap,
) -> EntityResult<PathBuf> {
    let rendered = render_snapshot(attributes)?;
    let path = directory.join(snapshot_file_name(display_name));

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(SNAPSHOT_MODE));
    }
    let mut file = builder.tempfile_in(directory)?;
    file.write_all(rendered.as_bytes())?;
    file.flush()?;
    file.persist(&path).map_err(|e| EntityError::Io(e.error))?;

    debug!(path = %path.display(), keys = attributes.len(), "entity snapshot written");
    Ok(path)
}
