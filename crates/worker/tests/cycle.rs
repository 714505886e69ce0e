use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;

use courtwatch_notify::{Dispatcher, Notification, Notifier, NotifyError};
use courtwatch_rules::{load_rules, BookingTimes, PreferenceRule};
use courtwatch_source::FileSource;
use courtwatch_storage::{MemoryStore, NotificationStore, RecordFilter};
use courtwatch_worker::{run_cycle, CycleError, CycleSummary};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}

/// Thursday 2026-10-15, 12:00.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn repo_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").join(relative)
}

fn slot_dump(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn court_a_rule() -> PreferenceRule {
    PreferenceRule {
        days_in_advance: 3,
        min_duration: 60,
        min_booking_time: BookingTimes {
            weekday: chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            weekend: chrono::NaiveTime::MIN,
        },
        ..PreferenceRule::new("courtA")
    }
}

#[tokio::test]
async fn first_cycle_notifies_and_second_skips() {
    let dump = slot_dump(
        r#"[
            {"court": "courtA", "date": "2026-10-15", "start": "18:00", "duration": 60},
            {"court": "courtA", "date": "2026-10-15", "start": "16:00", "duration": 60},
            {"court": "courtA", "date": "2026-10-20", "start": "18:00", "duration": 60},
            {"court": "courtA", "date": "not a date", "start": "18:00", "duration": 60}
        ]"#,
    );
    let source = FileSource::new(dump.path());
    let store = MemoryStore::new();
    let sender = RecordingNotifier::default();
    let dispatcher = Dispatcher::default();
    let rules = vec![court_a_rule()];

    let first = run_cycle(&rules, &source, &store, &dispatcher, &sender, now())
        .await
        .unwrap();
    assert_eq!(first, CycleSummary { sent: 1, skipped: 0, errors: 0, invalid: 1 });

    let second = run_cycle(&rules, &source, &store, &dispatcher, &sender, now())
        .await
        .unwrap();
    assert_eq!(second, CycleSummary { sent: 0, skipped: 1, errors: 0, invalid: 1 });

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "courtA: Thursday, 15 October 2026 at 18:00 (60 min)");

    let records = store.list(&RecordFilter::unviewed()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity.as_str(), "courta:2026-10-15T18:00:60");
}

#[tokio::test]
async fn wrongly_typed_record_counts_as_invalid_and_others_still_notify() {
    let dump = slot_dump(
        r#"[
            {"court": "courtA", "date": "2026-10-15", "start": "18:00", "duration": 60},
            {"court": "courtA", "date": "2026-10-15", "start": "19:00", "duration": 60.5}
        ]"#,
    );
    let source = FileSource::new(dump.path());
    let store = MemoryStore::new();
    let sender = RecordingNotifier::default();

    let summary = run_cycle(&[court_a_rule()], &source, &store, &Dispatcher::default(), &sender, now())
        .await
        .unwrap();

    assert_eq!(summary, CycleSummary { sent: 1, skipped: 0, errors: 0, invalid: 1 });
    assert_eq!(sender.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn bundled_fixtures_run_end_to_end() {
    let rules = load_rules(&repo_file("config/courts.yml")).unwrap();
    let source = FileSource::new(repo_file("data/slots.json"));
    let store = MemoryStore::new();
    let sender = RecordingNotifier::default();

    let summary = run_cycle(&rules, &source, &store, &Dispatcher::default(), &sender, now())
        .await
        .unwrap();

    assert_eq!(summary, CycleSummary { sent: 3, skipped: 0, errors: 0, invalid: 0 });
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.unviewed, 3);
}

#[tokio::test]
async fn scrape_failure_aborts_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::new(dir.path().join("missing.json"));
    let store = MemoryStore::new();
    let sender = RecordingNotifier::default();

    let err = run_cycle(&[court_a_rule()], &source, &store, &Dispatcher::default(), &sender, now())
        .await
        .unwrap_err();

    assert!(matches!(err, CycleError::Scrape { ref court, .. } if court == "courtA"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn unavailable_store_aborts_cycle_without_sending() {
    let dump = slot_dump(r#"[{"court": "courtA", "date": "2026-10-15", "start": "18:00", "duration": 60}]"#);
    let source = FileSource::new(dump.path());
    let store = MemoryStore::new();
    store.set_available(false);
    let sender = RecordingNotifier::default();

    let err = run_cycle(&[court_a_rule()], &source, &store, &Dispatcher::default(), &sender, now())
        .await
        .unwrap_err();

    assert!(matches!(err, CycleError::Store { .. }));
    assert!(sender.sent.lock().unwrap().is_empty());
}
