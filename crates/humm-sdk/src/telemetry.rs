use std::str::FromStr;

use tracing::Level;

use crate::error::{SdkError, SdkResult};

/// Install a global fmt subscriber at `level` ("error" through "trace").
///
/// Returns `Ok(false)` if a subscriber was already installed, in which case
/// nothing changes.
pub fn init_tracing(level: &str) -> SdkResult<bool> {
    let level = Level::from_str(level)
        .map_err(|_| SdkError::Config(format!("unknown log level: {level}")))?;
    Ok(tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok())
}
