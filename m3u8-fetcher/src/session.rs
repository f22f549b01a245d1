use crate::{matcher::Matcher, options::CaptureOptions};
use log::{debug, info, trace};
use std::{
    collections::HashSet,
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::{Duration, Instant},
};

/// Everything the browser side reports to a running session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RequestStarted { id: String, url: String },
    RequestFinished { id: String },
    RequestFailed { id: String, reason: String },
    /// Page load completed, or failed with the browser's error text.
    Navigated(Result<(), String>),
    Interrupted,
}

/// Why the network wait gave up without a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quiescence {
    Idle,
    Timeout,
}

/// How [`watch`] ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finish {
    Found(String),
    Quiet(Quiescence),
    NavigationFailed(String),
    Interrupted,
    /// Every event sender was dropped before the session could finish.
    Disconnected,
}

/// Network bookkeeping of one capture run.
///
/// In-flight requests are tracked by CDP request id. A redirect re-announces the
/// same id and a settle for an id never seen is ignored, so the in-flight count
/// is exactly the set size and cannot underflow.
#[derive(Debug)]
pub struct SessionState {
    inflight: HashSet<String>,
    last_activity: Instant,
    found: Option<String>,
}

impl SessionState {
    pub fn new(now: Instant) -> Self {
        Self {
            inflight: HashSet::new(),
            last_activity: now,
            found: None,
        }
    }

    /// Returns `true` only for the request that sets the captured url.
    pub fn request_started(
        &mut self,
        id: String,
        url: &str,
        matcher: &Matcher,
        now: Instant,
    ) -> bool {
        self.inflight.insert(id);
        self.last_activity = now;

        if self.found.is_none() && matcher.matches(url) {
            self.found = Some(url.to_owned());
            return true;
        }

        false
    }

    /// Finished and failed requests are treated the same.
    pub fn request_settled(&mut self, id: &str, now: Instant) {
        self.inflight.remove(id);
        self.last_activity = now;
    }

    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    pub fn quiet_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    pub fn is_idle(&self, now: Instant, idle_time: Duration) -> bool {
        self.inflight.is_empty() && self.quiet_for(now) >= idle_time
    }
}

/// Drains `events` until a matching request shows up, navigation fails or the
/// network settles.
///
/// This is the only consumer of the channel and it owns all session state.
/// `recv_timeout` with the poll interval doubles as the idle poll, so the idle
/// and timeout checks run at least that often. The overall timeout is measured
/// from the moment the page finished loading; before that only the navigation
/// timeout applies.
pub fn watch(events: &Receiver<SessionEvent>, options: &CaptureOptions) -> Finish {
    let started = Instant::now();
    let mut state = SessionState::new(started);
    let mut loaded_at = None;

    loop {
        match events.recv_timeout(options.poll_interval) {
            Ok(event) => {
                let now = Instant::now();

                match event {
                    SessionEvent::RequestStarted { id, url } => {
                        trace!("request {} {}", id, url);

                        if state.request_started(id, &url, &options.matcher, now) {
                            debug!("{} requests still in flight", state.inflight());
                            return Finish::Found(url);
                        }
                    }
                    SessionEvent::RequestFinished { id } => state.request_settled(&id, now),
                    SessionEvent::RequestFailed { id, reason } => {
                        debug!("request {} failed ({})", id, reason);
                        state.request_settled(&id, now);
                    }
                    SessionEvent::Navigated(Ok(())) => {
                        if loaded_at.is_none() {
                            info!("Waiting for network to become idle...");
                            loaded_at = Some(now);
                        }
                    }
                    SessionEvent::Navigated(Err(e)) => return Finish::NavigationFailed(e),
                    SessionEvent::Interrupted => return Finish::Interrupted,
                }
            }
            Err(RecvTimeoutError::Timeout) => (),
            Err(RecvTimeoutError::Disconnected) => return Finish::Disconnected,
        }

        let now = Instant::now();

        match loaded_at {
            Some(loaded_at) => {
                if state.is_idle(now, options.idle_time) {
                    debug!("network quiet for {:?}", state.quiet_for(now));
                    return Finish::Quiet(Quiescence::Idle);
                }

                if now.duration_since(loaded_at) > options.timeout {
                    debug!("{} requests still in flight", state.inflight());
                    return Finish::Quiet(Quiescence::Timeout);
                }
            }
            None if now.duration_since(started) > options.navigation_timeout => {
                return Finish::NavigationFailed(format!(
                    "no load event after {}s",
                    options.navigation_timeout.as_secs()
                ));
            }
            None => (),
        }
    }
}
