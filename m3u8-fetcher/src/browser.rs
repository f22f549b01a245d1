use crate::{error::Error, options::CaptureOptions, session::SessionEvent};
use anyhow::anyhow;
use headless_chrome::{
    Browser, LaunchOptions, LaunchOptionsBuilder, Tab,
    browser::tab::EventListener,
    protocol::cdp::{
        Network::{GetResponseBodyReturnObject, events::ResponseReceivedEventParams},
        types::Event,
    },
};
use log::debug;
use std::{
    ffi::OsStr,
    sync::{Arc, Weak, mpsc::Sender},
    thread,
};

const RESPONSE_HANDLER: &str = "m3u8-fetcher";

/// Keeps cross-origin iframes (embedded players) in the page's own process, so
/// their requests are reported on the tab's session instead of a separate
/// target the tab never attaches to.
const SHARED_FRAME_ARGS: [&str; 2] = [
    "--disable-features=IsolateOrigins,site-per-process",
    "--disable-site-isolation-trials",
];

type Listener = dyn EventListener<Event> + Send + Sync;

/// A headless browser with one tab whose network activity is forwarded as
/// [`SessionEvent`]s.
///
/// Dropping it detaches the listeners, closes the tab and then kills the
/// browser process.
pub struct CaptureBrowser {
    tab: Arc<Tab>,
    listener: Weak<Listener>,
    // Killed on drop, after the tab has been closed.
    _browser: Browser,
}

impl CaptureBrowser {
    pub fn launch(options: &CaptureOptions, events: Sender<SessionEvent>) -> Result<Self, Error> {
        let browser = Browser::new(launch_options()?).map_err(Error::Launch)?;
        let tab = browser.new_tab().map_err(Error::Launch)?;
        tab.set_default_timeout(options.navigation_timeout);

        debug!("registering response listener");
        // Also enables the Network domain, which request events depend on.
        tab.register_response_handling(RESPONSE_HANDLER, Box::new(log_response))
            .map_err(|e| Error::Browser(format!("{:#}", e)))?;

        debug!("registering request listener");
        let listener: Arc<Listener> = Arc::new(move |event: &Event| {
            if let Some(event) = session_event(event) {
                // The receiver is gone once the session has finished.
                let _ = events.send(event);
            }
        });
        let listener = tab
            .add_event_listener(listener)
            .map_err(|e| Error::Browser(format!("{:#}", e)))?;

        Ok(Self {
            tab,
            listener,
            _browser: browser,
        })
    }

    /// Starts loading `url` on a helper thread, so requests keep flowing to the
    /// session while the page loads.
    ///
    /// Only a failed navigation is reported from here. A successful load shows
    /// up as `Page.loadEventFired` through the event listener, and the session
    /// itself bounds how long that may take.
    pub fn navigate(&self, url: &str, events: Sender<SessionEvent>) {
        let tab = self.tab.clone();
        let url = url.to_owned();

        thread::spawn(move || {
            if let Err(e) = tab.navigate_to(&url) {
                let _ = events.send(SessionEvent::Navigated(Err(format!("{:#}", e))));
            }
        });
    }
}

impl Drop for CaptureBrowser {
    fn drop(&mut self) {
        debug!("deregistering listeners and closing browser");

        if let Err(e) = self.tab.remove_event_listener(&self.listener) {
            debug!("could not remove request listener: {:#}", e);
        }

        if let Err(e) = self.tab.deregister_response_handling(RESPONSE_HANDLER) {
            debug!("could not remove response listener: {:#}", e);
        }

        if let Err(e) = self.tab.close(false) {
            debug!("could not close tab: {:#}", e);
        }
    }
}

fn launch_options() -> Result<LaunchOptions<'static>, Error> {
    LaunchOptionsBuilder::default()
        .headless(true)
        .args(SHARED_FRAME_ARGS.iter().copied().map(OsStr::new).collect())
        .build()
        .map_err(|e| Error::Launch(anyhow!(e)))
}

fn log_response(
    params: ResponseReceivedEventParams,
    _: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>,
) {
    debug!("response {} {}", params.response.status, params.response.url);
}

fn session_event(event: &Event) -> Option<SessionEvent> {
    match event {
        Event::NetworkRequestWillBeSent(event) => Some(SessionEvent::RequestStarted {
            id: event.params.request_id.clone(),
            url: event.params.request.url.clone(),
        }),
        Event::NetworkLoadingFinished(event) => Some(SessionEvent::RequestFinished {
            id: event.params.request_id.clone(),
        }),
        Event::NetworkLoadingFailed(event) => Some(SessionEvent::RequestFailed {
            id: event.params.request_id.clone(),
            reason: event.params.error_text.clone(),
        }),
        Event::PageLoadEventFired(_) => Some(SessionEvent::Navigated(Ok(()))),
        _ => None,
    }
}
