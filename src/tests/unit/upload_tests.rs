//! Upload progress scenarios.

use std::sync::atomic::Ordering;

use futures::stream;
use serde_json::json;

use crate::core::api::{ApiError, UploadEvent, UploadProgress, UploadStream};
use crate::core::events::{LibraryEvent, NoticeLevel};
use crate::core::models::{Document, FileSelection};
use crate::core::upload::UploadState;
use crate::core::LibraryError;
use crate::tests::common::*;

fn file() -> FileSelection {
    FileSelection::new("report.pdf", vec![0u8; 100]).with_content_type("application/pdf")
}

fn scripted(events: Vec<UploadEvent>) -> UploadStream {
    Box::pin(stream::iter(events))
}

fn progress(transferred: u64, total: Option<u64>) -> UploadEvent {
    UploadEvent::Progress(UploadProgress::new(transferred, total))
}

fn progress_percents(events: &[LibraryEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            LibraryEvent::UploadProgress { percent } => Some(*percent),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_successful_upload_clears_selection_and_reloads_once() {
    let (mut api, calls) = mock_with_lists(
        json!([]),
        json!([doc_json("new-1", "report.pdf", "2024-04-01T00:00:00Z", "application/pdf")]),
    );
    api.expect_upload_document()
        .withf(|f| f.name == "report.pdf")
        .times(1)
        .returning(|_| {
            scripted(vec![
                progress(25, Some(100)),
                progress(50, Some(100)),
                progress(100, Some(100)),
                UploadEvent::Finished(Ok(Document::new("new-1", "report.pdf"))),
            ])
        });
    let (mut library, mut rx) = create_test_library(api);
    library.load().await.unwrap();
    drain(&mut rx);

    library.on_file_picked(Some(file()));
    let created = library.on_upload_submit().await.unwrap();

    assert_eq!(created.map(|d| d.id), Some("new-1".to_string()));
    assert_eq!(library.upload_state(), &UploadState::Empty);
    assert!(library.selected_file().is_none());
    assert_eq!(library.upload_progress(), 0);
    assert_eq!(library.documents().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let events = drain(&mut rx);
    assert_eq!(progress_percents(&events), vec![0, 25, 50, 100]);
    assert_eq!(count_reloads(&events), 1);
    assert!(events.contains(&LibraryEvent::Uploaded { file_name: "report.pdf".into() }));
}

#[tokio::test]
async fn test_unknown_totals_are_ignored() {
    let (mut api, _) = mock_with_list(json!([]));
    api.expect_upload_document().returning(|_| {
        scripted(vec![
            progress(10, None),
            progress(30, Some(0)),
            progress(1, Some(3)),
            UploadEvent::Finished(Ok(Document::new("x", "report.pdf"))),
        ])
    });
    let (mut library, mut rx) = create_test_library(api);

    library.on_file_picked(Some(file()));
    library.on_upload_submit().await.unwrap();

    assert_eq!(progress_percents(&drain(&mut rx)), vec![0, 33]);
}

#[tokio::test]
async fn test_failed_upload_keeps_file_for_retry() {
    let (mut api, calls) = mock_with_list(json!([]));
    api.expect_upload_document().times(1).returning(|_| {
        scripted(vec![
            progress(40, Some(100)),
            UploadEvent::Finished(Err(ApiError::Status { status: 413, body: "too large".into() })),
        ])
    });
    let (mut library, mut rx) = create_test_library(api);

    library.on_file_picked(Some(file()));
    let err = library.on_upload_submit().await.unwrap_err();

    assert!(matches!(err, LibraryError::Upload { ref file, .. } if file == "report.pdf"));
    assert_eq!(library.upload_state(), &UploadState::Selected(file()));
    assert_eq!(library.upload_progress(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let events = drain(&mut rx);
    assert_eq!(count_reloads(&events), 0);
    assert!(events
        .iter()
        .any(|e| matches!(e, LibraryEvent::Notice(n) if n.level == NoticeLevel::Error)));
}

#[tokio::test]
async fn test_stream_without_terminal_event_is_a_failure() {
    let (mut api, _) = mock_with_list(json!([]));
    api.expect_upload_document()
        .returning(|_| scripted(vec![progress(50, Some(100))]));
    let (mut library, _rx) = create_test_library(api);

    library.on_file_picked(Some(file()));
    let err = library.on_upload_submit().await.unwrap_err();

    assert!(matches!(err, LibraryError::Upload { source: ApiError::UploadIncomplete, .. }));
    assert!(matches!(library.upload_state(), UploadState::Selected(_)));
}

#[tokio::test]
async fn test_submit_without_file_is_noop() {
    let (mut api, _) = mock_with_list(json!([]));
    api.expect_upload_document().never();
    let (mut library, mut rx) = create_test_library(api);

    assert!(library.on_upload_submit().await.unwrap().is_none());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_retry_after_failure() {
    let attempts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = attempts.clone();
    let (mut api, _) = mock_with_list(json!([]));
    api.expect_upload_document().times(2).returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            scripted(vec![UploadEvent::Finished(Err(ApiError::UploadIncomplete))])
        } else {
            scripted(vec![UploadEvent::Finished(Ok(Document::new("x", "report.pdf")))])
        }
    });
    let (mut library, _rx) = create_test_library(api);

    library.on_file_picked(Some(file()));
    assert!(library.on_upload_submit().await.is_err());
    assert!(library.on_upload_submit().await.unwrap().is_some());
    assert_eq!(library.upload_state(), &UploadState::Empty);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_picking_none_clears_selection() {
    let (api, _) = mock_with_list(json!([]));
    let (mut library, _rx) = create_test_library(api);

    library.on_file_picked(Some(file()));
    assert!(library.selected_file().is_some());
    library.on_file_picked(None);
    assert_eq!(library.upload_state(), &UploadState::Empty);
}
