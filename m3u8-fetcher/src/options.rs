use crate::matcher::Matcher;
use std::{path::PathBuf, time::Duration};

/// Continuous quiet period, with nothing in flight, before the network counts as idle.
pub const IDLE_TIME: Duration = Duration::from_secs(2);

/// Overall budget for the idle wait once the page has loaded.
pub const TIMEOUT: Duration = Duration::from_secs(15);

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on the page load itself.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed knobs of a capture run.
///
/// The binary always uses [`CaptureOptions::default`]; the fields are public so
/// that the session loop can be exercised with shorter timings.
#[derive(Clone, Debug)]
pub struct CaptureOptions {
    pub matcher: Matcher,
    pub idle_time: Duration,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub navigation_timeout: Duration,
    /// Where the captured url is written, overwritten on every success.
    pub output: PathBuf,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            matcher: Matcher::default(),
            idle_time: IDLE_TIME,
            timeout: TIMEOUT,
            poll_interval: POLL_INTERVAL,
            navigation_timeout: NAVIGATION_TIMEOUT,
            output: default_output(),
        }
    }
}

#[cfg(unix)]
fn default_output() -> PathBuf {
    PathBuf::from("/tmp/m3u8.txt")
}

#[cfg(not(unix))]
fn default_output() -> PathBuf {
    std::env::temp_dir().join("m3u8.txt")
}
