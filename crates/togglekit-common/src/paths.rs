//! Store path conventions shared by the gateway and the snapshot parser.

use crate::types::AppName;

/// Root path under which all application toggle trees live.
pub const TOGGLE_ROOT: &str = "/v1/toggles";

/// Builds the store path holding the toggle tree for an application.
pub fn toggle_path(app: &AppName) -> String {
    format!("{}/{}", TOGGLE_ROOT, app)
}

/// Returns the final `/`-separated segment of a store key.
///
/// Keys ending in a separator yield an empty segment.
pub fn last_segment(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
