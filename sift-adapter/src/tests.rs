use crate::*;

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use sift::{DebounceState, DebouncerOptions, ProjectionOptions};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Framework {
    id: u32,
    name: String,
}

fn fw(id: u32, name: &str) -> Framework {
    Framework {
        id,
        name: name.to_string(),
    }
}

fn frameworks() -> Vec<Framework> {
    vec![fw(1, "Angular"), fw(2, "React"), fw(3, "Vue")]
}

fn by_name(f: &Framework) -> Option<&str> {
    Some(f.name.as_str())
}

fn controller() -> SearchController<Framework> {
    SearchController::new(DebouncerOptions::new(400.0), ProjectionOptions::new(by_name)).unwrap()
}

fn names(c: &SearchController<Framework>) -> Vec<&str> {
    c.projection().iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn typing_settles_after_quiet_period() {
    let mut c = controller();
    c.set_items(frameworks());
    assert_eq!(names(&c), vec!["Angular", "React", "Vue"]);

    c.on_input("r", 0);
    assert!(!c.tick(200));
    c.on_input("re", 200);
    assert_eq!(c.pending_input(), Some("re"));
    assert!(!c.tick(599));
    assert_eq!(c.query().as_str(), "");

    assert!(c.tick(600));
    assert_eq!(c.query().as_str(), "re");
    assert_eq!(c.pending_input(), None);
    assert_eq!(names(&c), vec!["React"]);
}

#[test]
fn settling_the_same_query_is_a_memo_hit() {
    let mut c = controller();
    c.set_items(frameworks());

    c.on_input("a", 0);
    assert!(c.tick(400));
    let count = c.projection().recompute_count();

    c.on_input("A", 500);
    assert!(!c.tick(900));
    assert_eq!(c.projection().recompute_count(), count);
    assert_eq!(c.query().as_str(), "A");
    assert_eq!(names(&c), vec!["Angular", "React"]);
}

#[test]
fn flush_settles_immediately() {
    let mut c = controller();
    c.set_items(frameworks());

    c.on_input("vue", 10);
    assert!(c.flush());
    assert_eq!(names(&c), vec!["Vue"]);
    assert!(!c.flush());
}

#[test]
fn loading_stays_true_until_every_load_finishes() {
    let mut c = controller();
    assert!(!c.is_loading());

    let first = c.begin_load();
    let second = c.begin_load();
    assert!(c.is_loading());
    assert_eq!(c.load_status().in_flight, 2);

    assert!(c.complete_load(first, Ok(frameworks())));
    assert!(c.is_loading());
    assert_eq!(c.projection().total_count(), 3);

    let failed: Result<Vec<Framework>, _> = Err(FetchError::new("network down"));
    assert!(!c.complete_load(second, failed));
    assert!(!c.is_loading());
    assert_eq!(c.last_error(), Some("network down"));
    // The failed load keeps the data from the successful one.
    assert_eq!(c.projection().total_count(), 3);

    let status = c.load_status();
    assert!(!status.is_loading());
    assert_eq!(status.applied, vec![first]);
    assert_eq!(status.last_error.as_deref(), Some("network down"));
}

#[test]
fn stale_load_does_not_overwrite_newer_data() {
    let mut c = controller();
    let older = c.begin_load();
    let newer = c.begin_load();
    assert!(older < newer);

    assert!(c.complete_load(newer, Ok(vec![fw(9, "Svelte")])));
    assert!(!c.complete_load(older, Ok(frameworks())));

    assert_eq!(names(&c), vec!["Svelte"]);
    assert!(!c.is_loading());
}

#[test]
fn secondary_source_never_replaces_searched_collection() {
    let users_fetch = LoadSource(1);
    let mut c = controller();
    let primary = c.begin_load();
    let secondary = c.begin_load_from(users_fetch);
    assert_eq!(secondary.source(), users_fetch);

    // The secondary fetch wins the race; the primary result still lands afterwards.
    assert!(c.complete_load(secondary, Ok(vec![fw(9, "Svelte")])));
    assert!(c.is_loading());
    assert!(c.complete_load(primary, Ok(frameworks())));
    assert!(!c.is_loading());

    assert_eq!(names(&c), vec!["Angular", "React", "Vue"]);
    let side: Vec<&str> = c
        .collection(users_fetch)
        .map(|items| items.iter().map(|f| f.name.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(side, vec!["Svelte"]);
    assert_eq!(
        c.collection(LoadSource::PRIMARY).map(|items| items.len()),
        Some(3)
    );
    assert_eq!(c.load_status().applied, vec![primary, secondary]);

    c.on_input("sv", 0);
    assert!(c.tick(400));
    assert!(c.projection().is_empty());
}

#[test]
fn stale_result_is_dropped_per_source() {
    let side = LoadSource(7);
    let mut tracker = LoadTracker::new();
    let older = tracker.begin_from(side);
    let primary = tracker.begin();
    let newer = tracker.begin_from(side);

    assert_eq!(tracker.complete(newer, Ok("new")), Some("new"));
    assert_eq!(tracker.complete(older, Ok("old")), None);
    // A newer ticket of another source does not make the primary stale.
    assert_eq!(tracker.complete(primary, Ok("primary")), Some("primary"));

    assert_eq!(tracker.applied(side), Some(newer));
    assert_eq!(tracker.applied(LoadSource::PRIMARY), Some(primary));
    assert!(!tracker.is_loading());
}

#[test]
fn successful_load_clears_previous_error() {
    let mut c = controller();
    let t = c.begin_load();
    c.complete_load::<Vec<Framework>>(t, Err(FetchError::new("timeout")));
    assert_eq!(c.last_error(), Some("timeout"));

    let t = c.begin_load();
    assert!(c.complete_load(t, Ok(frameworks())));
    assert_eq!(c.last_error(), None);
}

#[test]
fn unknown_or_repeated_ticket_is_ignored() {
    let mut tracker = LoadTracker::new();
    let t = tracker.begin();
    assert_eq!(tracker.complete(t, Ok(1)), Some(1));
    assert_eq!(tracker.complete(t, Ok(2)), None);
    assert_eq!(tracker.in_flight(), 0);
    assert_eq!(t.id(), 0);
}

#[test]
fn fetch_error_displays_message() {
    let err = FetchError::new("404 Not Found");
    assert_eq!(err.to_string(), "404 Not Found");
}

#[test]
fn disposed_controller_ignores_input() {
    let mut c = controller();
    c.set_items(frameworks());
    c.on_input("vue", 0);
    c.dispose();

    assert!(c.is_disposed());
    assert_eq!(c.debouncer().state(), DebounceState::Disposed);
    assert!(!c.tick(10_000));

    c.on_input("react", 10_000);
    assert!(!c.tick(20_000));
    assert_eq!(names(&c), vec!["Angular", "React", "Vue"]);
}

#[test]
fn invalid_quiet_period_is_rejected() {
    let err = SearchController::<Framework>::new(
        DebouncerOptions::new(-1.0),
        ProjectionOptions::new(by_name),
    )
    .unwrap_err();
    assert!(matches!(err, sift::ConfigError::InvalidConfiguration { .. }));
}

#[test]
fn items_and_keys_flow_through_custom_key() {
    let opts = ProjectionOptions::new_with_key(by_name, |f: &Framework| f.id);
    let mut c: SearchController<Framework, u32> =
        SearchController::new(DebouncerOptions::new(0.0), opts).unwrap();
    c.set_items(frameworks());
    c.on_input("u", 0);
    assert!(c.tick(0));

    let mut keys = Vec::new();
    c.projection()
        .for_each_view_item_keyed(|item, _| keys.push((item.key, item.position)));
    assert_eq!(keys, vec![(1, 0), (3, 1)]);
}

#[cfg(feature = "serde")]
#[test]
fn load_status_serializes() {
    let mut tracker = LoadTracker::new();
    let t = tracker.begin();
    tracker.complete::<()>(t, Err(FetchError::new("boom")));

    let json = serde_json::to_string(&tracker.status()).unwrap();
    assert_eq!(json, r#"{"in_flight":0,"last_error":"boom","applied":[]}"#);
}

#[cfg(feature = "tokio")]
mod timed {
    use super::*;

    use alloc::sync::Arc;
    use core::time::Duration;

    use parking_lot::Mutex;

    fn recording(quiet_period_ms: f64) -> (TimedDebouncer<String>, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let d = TimedDebouncer::new(quiet_period_ms, move |v: &String| {
            sink.lock().push(v.clone());
        })
        .unwrap();
        (d, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn latest_submission_wins() {
        let (mut d, seen) = recording(400.0);

        d.submit("a".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        d.submit("an".to_string());
        assert!(d.is_pending());

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert!(seen.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*seen.lock(), vec!["an".to_string()]);
        assert_eq!(d.state(), DebounceState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_submissions_each_settle() {
        let (mut d, seen) = recording(400.0);

        d.submit("a".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;
        d.submit("b".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*seen.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_value() {
        let (mut d, seen) = recording(400.0);

        d.submit("a".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        d.dispose();
        assert_eq!(d.state(), DebounceState::Disposed);

        d.submit("b".to_string());
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(seen.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_pending_value() {
        let (mut d, seen) = recording(400.0);

        d.submit("a".to_string());
        drop(d);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(seen.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_quiet_period_settles_on_next_poll() {
        let (mut d, seen) = recording(0.0);
        assert_eq!(d.quiet_period_ms(), 0);

        d.submit("now".to_string());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(*seen.lock(), vec!["now".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_is_a_full_quiet_period_after_submit() {
        let (mut d, seen) = recording(400.0);

        tokio::time::advance(Duration::from_micros(600)).await;
        let submitted_at = tokio::time::Instant::now();
        d.submit("a".to_string());
        assert_eq!(d.deadline(), Some(submitted_at + Duration::from_millis(400)));

        tokio::time::sleep_until(submitted_at + Duration::from_millis(402)).await;
        assert_eq!(*seen.lock(), vec!["a".to_string()]);
        assert_eq!(d.deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn value_settled_before_dispose_is_not_delivered() {
        let (mut d, seen) = recording(400.0);
        let shared = Arc::clone(&d.shared);

        d.submit("a".to_string());
        let settled = shared.settle(u64::MAX);
        assert_eq!(settled.as_deref(), Some("a"));

        d.dispose();
        if let Some(value) = settled {
            shared.deliver(value);
        }
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn invalid_quiet_period_is_rejected() {
        assert!(TimedDebouncer::new(f64::NAN, |_: &String| {}).is_err());
        assert!(TimedDebouncer::new(-5.0, |_: &String| {}).is_err());
    }
}
