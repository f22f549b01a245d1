//! Capture the url of a streaming manifest requested by a web page.
//!
//! A headless browser loads the page while every outgoing request is reported
//! to a single session loop. The first request whose url matches
//! [`Matcher`] is written to [`CaptureOptions::output`]. Without a match the
//! session gives up once the network has been idle long enough, or when the
//! overall timeout runs out.

mod args;
mod browser;
mod capture;
mod error;
mod logger;
mod matcher;
mod options;
mod session;

#[doc(hidden)]
pub use args::{Args, usage_exit_code};
pub use capture::{Outcome, capture, conclude, persist};
pub use error::Error;
pub use logger::Logger;
pub use matcher::{MANIFEST_MARKER, Matcher, TOKEN};
pub use options::CaptureOptions;
pub use session::{Finish, Quiescence, SessionEvent, SessionState, watch};
