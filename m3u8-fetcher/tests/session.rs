use m3u8_fetcher::{CaptureOptions, Finish, Quiescence, SessionEvent, watch};
use std::{
    sync::mpsc::{self, Sender},
    thread,
    time::{Duration, Instant},
};

const HIT: &str = "https://cdn.example.com/hls/MTA4MA/index.m3u8?token=abc";
const IDLE_TIME: Duration = Duration::from_millis(200);
const TIMEOUT: Duration = Duration::from_millis(1500);

fn options() -> CaptureOptions {
    CaptureOptions {
        idle_time: IDLE_TIME,
        timeout: TIMEOUT,
        poll_interval: Duration::from_millis(10),
        navigation_timeout: Duration::from_millis(1500),
        ..Default::default()
    }
}

fn started(id: &str, url: &str) -> SessionEvent {
    SessionEvent::RequestStarted {
        id: id.to_owned(),
        url: url.to_owned(),
    }
}

fn finished(id: &str) -> SessionEvent {
    SessionEvent::RequestFinished { id: id.to_owned() }
}

fn send_all(tx: &Sender<SessionEvent>, events: Vec<SessionEvent>) {
    for event in events {
        tx.send(event).unwrap();
    }
}

#[test]
fn match_finishes_with_requests_in_flight() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![
            started("1", "https://example.com/"),
            started("2", "https://example.com/player.js"),
            started("3", HIT),
            started("4", "https://example.com/ads.js"),
        ],
    );

    assert_eq!(watch(&rx, &options()), Finish::Found(HIT.to_owned()));
}

#[test]
fn match_during_navigation_does_not_wait_for_load() {
    let (tx, rx) = mpsc::channel();
    tx.send(started("1", HIT)).unwrap();

    let start = Instant::now();
    assert_eq!(watch(&rx, &options()), Finish::Found(HIT.to_owned()));
    assert!(start.elapsed() < IDLE_TIME);
}

#[test]
fn first_match_wins() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![
            SessionEvent::Navigated(Ok(())),
            started("1", HIT),
            started("2", "https://cdn.example.com/hls/MTA4MA/other.m3u8"),
        ],
    );

    assert_eq!(watch(&rx, &options()), Finish::Found(HIT.to_owned()));
}

#[test]
fn non_matching_manifest_is_ignored() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![
            SessionEvent::Navigated(Ok(())),
            started("1", "https://cdn.example.com/hls/720/index.m3u8"),
            finished("1"),
        ],
    );

    assert_eq!(watch(&rx, &options()), Finish::Quiet(Quiescence::Idle));
}

#[test]
fn idle_after_quiet_period() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![
            SessionEvent::Navigated(Ok(())),
            started("1", "https://example.com/"),
            SessionEvent::RequestFailed {
                id: "1".to_owned(),
                reason: "net::ERR_ABORTED".to_owned(),
            },
        ],
    );

    let start = Instant::now();
    assert_eq!(watch(&rx, &options()), Finish::Quiet(Quiescence::Idle));

    let elapsed = start.elapsed();
    assert!(elapsed >= IDLE_TIME);
    assert!(elapsed < TIMEOUT);
}

#[test]
fn burst_keeps_network_busy() {
    let (tx, rx) = mpsc::channel();
    tx.send(SessionEvent::Navigated(Ok(()))).unwrap();

    let burst = Duration::from_millis(500);
    let producer = thread::spawn(move || {
        let start = Instant::now();
        let mut i = 0;

        // Every request settles right away, so the in-flight count keeps
        // dropping to zero between requests.
        while start.elapsed() < burst {
            let id = i.to_string();
            tx.send(started(&id, "https://example.com/chunk")).unwrap();
            tx.send(finished(&id)).unwrap();
            thread::sleep(Duration::from_millis(20));
            i += 1;
        }

        tx
    });

    let start = Instant::now();
    assert_eq!(watch(&rx, &options()), Finish::Quiet(Quiescence::Idle));
    assert!(start.elapsed() >= burst);

    drop(producer.join().unwrap());
}

#[test]
fn timeout_when_request_never_settles() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![
            SessionEvent::Navigated(Ok(())),
            started("1", "https://example.com/stream"),
        ],
    );

    let start = Instant::now();
    assert_eq!(watch(&rx, &options()), Finish::Quiet(Quiescence::Timeout));
    assert!(start.elapsed() >= TIMEOUT);
}

#[test]
fn navigation_failure() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![
            started("1", "https://unreachable.invalid/"),
            SessionEvent::RequestFailed {
                id: "1".to_owned(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_owned(),
            },
            SessionEvent::Navigated(Err("net::ERR_NAME_NOT_RESOLVED".to_owned())),
        ],
    );

    assert_eq!(
        watch(&rx, &options()),
        Finish::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".to_owned())
    );
}

#[test]
fn no_idle_before_page_load() {
    let (_tx, rx) = mpsc::channel();

    let start = Instant::now();
    assert!(matches!(watch(&rx, &options()), Finish::NavigationFailed(_)));
    assert!(start.elapsed() >= Duration::from_millis(1500));
}

#[test]
fn interrupted() {
    let (tx, rx) = mpsc::channel();
    send_all(
        &tx,
        vec![started("1", "https://example.com/"), SessionEvent::Interrupted],
    );

    assert_eq!(watch(&rx, &options()), Finish::Interrupted);
}

#[test]
fn disconnected() {
    let (tx, rx) = mpsc::channel();
    tx.send(SessionEvent::Navigated(Ok(()))).unwrap();
    tx.send(started("1", "https://example.com/")).unwrap();
    drop(tx);

    assert_eq!(watch(&rx, &options()), Finish::Disconnected);
}
