//! Scenario tests for the background execution boundary.

mod common;

use common::{item, Fixture};
use tapedeck_core::extractor::{ExtractorError, Playlist};
use tapedeck_core::pipeline::MediaRequest;
use tapedeck_core::worker::{RunEvent, WorkRequest, WorkerError, FAILURE_NOTICE};

fn single_request(fixture: &Fixture, url: &str) -> WorkRequest {
    WorkRequest::Single(MediaRequest {
        source_url: url.to_string(),
        format: "mp3".to_string(),
        quality_kbps: None,
        dest_dir: fixture.dest(),
    })
}

async fn collect_events(handle: &mut tapedeck_core::worker::RunHandle) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_single_run_delivers_one_completion_and_no_progress() {
    let fixture = Fixture::new();
    let url = "https://example.com/watch?v=abc";
    fixture
        .extractor
        .set_single(url, item(url, "Test / Video: 1", 125))
        .await;

    let worker = fixture.worker();
    let mut handle = worker.submit(single_request(&fixture, url)).unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(
        events,
        vec![RunEvent::Completed {
            success: true,
            message: "Test Video 1.mp3 is saved".to_string(),
            name: "Test Video 1.mp3".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_failed_single_run_reports_generic_notice() {
    let fixture = Fixture::new();
    let worker = fixture.worker();

    // Unscripted URL: resolution fails.
    let mut handle = worker
        .submit(single_request(&fixture, "https://example.com/unknown"))
        .unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(
        events,
        vec![RunEvent::Completed {
            success: false,
            message: FAILURE_NOTICE.to_string(),
            name: String::new(),
        }]
    );
}

#[tokio::test]
async fn test_playlist_run_delivers_progress_then_completion() {
    let fixture = Fixture::new();
    let url = "https://example.com/playlist?list=xyz";
    fixture
        .extractor
        .set_playlist(
            url,
            Playlist {
                title: "My Playlist".to_string(),
                items: vec![
                    item("https://example.com/watch?v=a", "One", 60),
                    item("https://example.com/watch?v=b", "Two", 90),
                ],
            },
        )
        .await;

    let worker = fixture.worker();
    let mut handle = worker
        .submit(WorkRequest::Playlist {
            source_url: url.to_string(),
            format: "mp3".to_string(),
            quality_kbps: None,
            dest_dir: fixture.dest(),
        })
        .unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(
        events,
        vec![
            RunEvent::Progress(50),
            RunEvent::Progress(100),
            RunEvent::Completed {
                success: true,
                message: "My Playlist is saved".to_string(),
                name: "My Playlist".to_string(),
            },
        ]
    );

    let playlist_dir = fixture.dest().join("My Playlist");
    assert!(playlist_dir.join("One.mp3").exists());
    assert!(playlist_dir.join("Two.mp3").exists());
}

#[tokio::test]
async fn test_playlist_resolution_failure_does_no_item_work() {
    let fixture = Fixture::new();
    fixture
        .extractor
        .set_next_error(ExtractorError::extraction_failed("playlist gone"))
        .await;

    let worker = fixture.worker();
    let mut handle = worker
        .submit(WorkRequest::Playlist {
            source_url: "https://example.com/playlist?list=gone".to_string(),
            format: "mp3".to_string(),
            quality_kbps: None,
            dest_dir: fixture.dest(),
        })
        .unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        RunEvent::Completed { success: false, .. }
    ));

    assert_eq!(fixture.fetcher.fetch_count().await, 0);
    assert!(common::dir_entries(&fixture.dest()).is_empty());
}

#[tokio::test]
async fn test_selected_items_run_skips_resolution() {
    let fixture = Fixture::new();
    let worker = fixture.worker();

    let mut handle = worker
        .submit(WorkRequest::SelectedItems {
            playlist_title: "Picked".to_string(),
            items: vec![item("https://example.com/watch?v=a", "Only One", 60)],
            format: "mp3".to_string(),
            quality_kbps: None,
            dest_dir: fixture.dest(),
        })
        .unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(
        events,
        vec![
            RunEvent::Progress(100),
            RunEvent::Completed {
                success: true,
                message: "Picked is saved".to_string(),
                name: "Picked".to_string(),
            },
        ]
    );

    // No resolution happened; the items were pre-resolved.
    assert!(fixture.extractor.recorded_calls().await.is_empty());
}

#[tokio::test]
async fn test_second_submission_rejected_while_active() {
    let fixture = Fixture::new();
    let url = "https://example.com/watch?v=abc";
    fixture.extractor.set_single(url, item(url, "Song", 60)).await;
    // Park the run inside its fetch until cancelled.
    fixture.fetcher.park_until_cancelled_on_call(1).await;

    let worker = fixture.worker();
    let mut handle = worker.submit(single_request(&fixture, url)).unwrap();

    // No queuing: the slot is taken until the first run finishes.
    let rejected = worker.submit(single_request(&fixture, url));
    assert!(matches!(rejected, Err(WorkerError::Busy)));
    assert!(worker.is_active());

    handle.cancel();
    let events = collect_events(&mut handle).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        RunEvent::Completed { success: false, .. }
    ));

    // The slot is free again once the terminal event has been delivered.
    assert!(!worker.is_active());
    assert!(worker.submit(single_request(&fixture, url)).is_ok());
}

#[tokio::test]
async fn test_unrecognized_format_fails_selected_run_without_io() {
    let fixture = Fixture::new();
    let worker = fixture.worker();

    let mut handle = worker
        .submit(WorkRequest::SelectedItems {
            playlist_title: "Picked".to_string(),
            items: vec![item("https://example.com/watch?v=a", "Only One", 60)],
            format: "wav".to_string(),
            quality_kbps: None,
            dest_dir: fixture.dest(),
        })
        .unwrap();

    let events = collect_events(&mut handle).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        RunEvent::Completed { success: false, .. }
    ));
    assert_eq!(fixture.fetcher.fetch_count().await, 0);
}
