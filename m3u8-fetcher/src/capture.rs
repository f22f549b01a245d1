use crate::{
    browser::CaptureBrowser,
    error::Error,
    options::CaptureOptions,
    session::{self, Finish, Quiescence, SessionEvent},
};
use log::{info, warn};
use std::{fs, path::Path, sync::mpsc};

/// Result of a capture run that got as far as loading the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The matching url, already written to [`CaptureOptions::output`].
    Found(String),
    NotFound(Quiescence),
}

/// Loads `url` in a headless browser and waits for the manifest request.
///
/// A single navigation attempt is made. The browser is closed before this
/// returns, whatever the result.
pub fn capture(url: &str, options: &CaptureOptions) -> Result<Outcome, Error> {
    let (tx, rx) = mpsc::channel();

    let interrupt = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt.send(SessionEvent::Interrupted);
    }) {
        warn!("Ctrl+C will not close the browser cleanly ({})", e);
    }

    info!("Launching headless browser");
    let browser = CaptureBrowser::launch(options, tx.clone())?;

    info!("Navigating to: {}", url);
    browser.navigate(url, tx);

    let finish = session::watch(&rx, options);
    let outcome = conclude(finish, options);

    drop(browser);
    outcome
}

/// Turns how the session ended into the run's result.
///
/// The output file is written here and only for [`Finish::Found`].
pub fn conclude(finish: Finish, options: &CaptureOptions) -> Result<Outcome, Error> {
    match finish {
        Finish::Found(found) => {
            persist(&options.output, &found)?;
            Ok(Outcome::Found(found))
        }
        Finish::Quiet(Quiescence::Timeout) => {
            warn!("Timeout while waiting for network idle.");
            Ok(Outcome::NotFound(Quiescence::Timeout))
        }
        Finish::Quiet(Quiescence::Idle) => Ok(Outcome::NotFound(Quiescence::Idle)),
        Finish::NavigationFailed(e) => Err(Error::Navigation(e)),
        Finish::Interrupted => Err(Error::Interrupted),
        Finish::Disconnected => Err(Error::Browser("network event stream closed".to_owned())),
    }
}

/// Overwrites `path` with exactly `url`, no trailing newline.
pub fn persist(path: &Path, url: &str) -> Result<(), Error> {
    fs::write(path, url).map_err(|source| Error::Write {
        path: path.to_owned(),
        source,
    })
}
