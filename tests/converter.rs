//! Background execution through `Converter`.

mod common;

use common::{completions_of, progress_of, FakeRasterizer, Gate, SMALL_PAGE};
use futures::StreamExt;
use pdf2png::{ConversionConfig, ConversionEvent, ConversionJob, Converter, Pdf2PngError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn converter(fake: FakeRasterizer) -> Converter {
    Converter::new(Arc::new(fake), ConversionConfig::default())
}

fn two_docs(fake: &mut FakeRasterizer, dir: &TempDir) -> Vec<PathBuf> {
    vec![
        fake.add_pdf(dir.path(), "a.pdf", &[SMALL_PAGE]),
        fake.add_pdf(dir.path(), "b.pdf", &[SMALL_PAGE, SMALL_PAGE]),
    ]
}

#[tokio::test]
async fn events_end_with_a_single_completion() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut fake = FakeRasterizer::new();
    let inputs = two_docs(&mut fake, &src);
    let conv = converter(fake);

    let mut handle = assert_ok!(conv.start(ConversionJob::new(&inputs, out.path()).unwrap()));

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }

    assert_eq!(events.first(), Some(&ConversionEvent::Started { total_files: 2 }));
    assert_eq!(
        events.last(),
        Some(&ConversionEvent::Completed { success: true })
    );
    assert_eq!(progress_of(&events), vec![50, 100]);
    assert_eq!(completions_of(&events), vec![true]);

    let summary = assert_ok!(handle.wait().await);
    assert_eq!(summary.total_pages, 3);
    assert!(!conv.is_busy());
}

#[tokio::test]
async fn failure_is_binary_in_events_and_detailed_from_wait() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let missing = src.path().join("gone.pdf");
    let conv = converter(FakeRasterizer::new());

    let mut handle = conv
        .start(ConversionJob::new([&missing], out.path()).unwrap())
        .unwrap();

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    assert_eq!(completions_of(&events), vec![false]);
    assert!(progress_of(&events).is_empty());

    let err = assert_err!(handle.wait().await);
    assert!(matches!(err, Pdf2PngError::FileNotFound { ref path } if *path == missing));
}

#[tokio::test]
async fn second_start_while_running_is_rejected() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let gate = Gate::new();
    let mut fake = FakeRasterizer::new();
    let inputs = two_docs(&mut fake, &src);
    let conv = converter(fake.gated(Arc::clone(&gate)));
    let job = ConversionJob::new(&inputs, out.path()).unwrap();

    let handle = conv.start(job.clone()).unwrap();
    assert!(conv.is_busy());

    let again = conv.start(job.clone());
    assert!(matches!(again, Err(Pdf2PngError::JobInProgress)));

    // Clones share the flag.
    assert!(matches!(
        conv.clone().start(job.clone()),
        Err(Pdf2PngError::JobInProgress)
    ));

    gate.release();
    assert_ok!(handle.wait().await);
    assert!(!conv.is_busy());

    let next = assert_ok!(conv.start(job));
    assert_ok!(next.wait().await);
}

#[tokio::test]
async fn events_can_be_polled_without_waiting() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut fake = FakeRasterizer::new();
    let inputs = two_docs(&mut fake, &src);
    let conv = converter(fake);

    let mut handle = conv
        .start(ConversionJob::new(&inputs, out.path()).unwrap())
        .unwrap();

    let mut events = Vec::new();
    let done = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            match handle.try_next_event() {
                Some(event) => {
                    let last = matches!(event, ConversionEvent::Completed { .. });
                    events.push(event);
                    if last {
                        break;
                    }
                }
                None => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    })
    .await;

    assert!(done.is_ok(), "no completion within the timeout");
    assert_eq!(progress_of(&events), vec![50, 100]);
    assert_ok!(handle.wait().await);
}

#[tokio::test]
async fn event_stream_drains_to_completion() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut fake = FakeRasterizer::new();
    let inputs = two_docs(&mut fake, &src);
    let conv = converter(fake);

    let handle = conv
        .start(ConversionJob::new(&inputs, out.path()).unwrap())
        .unwrap();
    let (stream, task) = handle.into_stream();

    let pages: Vec<usize> = stream
        .filter_map(|e| async move {
            match e {
                ConversionEvent::PageWritten { page, .. } => Some(page),
                _ => None,
            }
        })
        .collect()
        .await;

    assert_eq!(pages, vec![1, 1, 2]);
    let summary = assert_ok!(task.await.unwrap());
    assert_eq!(summary.documents.len(), 2);
}

#[test]
fn start_outside_a_runtime_is_an_error() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut fake = FakeRasterizer::new();
    let inputs = two_docs(&mut fake, &src);
    let conv = converter(fake);

    let result = conv.start(ConversionJob::new(&inputs, out.path()).unwrap());
    assert!(matches!(result, Err(Pdf2PngError::Internal(_))));
    assert!(!conv.is_busy());
    assert!(!out.path().join("a").exists());
}
