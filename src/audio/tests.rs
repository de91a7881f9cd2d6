use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use rodio::Sink;
use rodio::buffer::SamplesBuffer;

use super::sink::{append_source, path_from_uri, status_of};
use super::types::ResourceId;
use super::types::StatusUpdate;
use super::watcher::{Watcher, spawn_watcher};
use crate::error::BackendError;

#[test]
fn path_from_uri_accepts_plain_paths_and_file_uris() {
    assert_eq!(path_from_uri("/music/a.mp3"), PathBuf::from("/music/a.mp3"));
    assert_eq!(path_from_uri("file:///music/a.mp3"), PathBuf::from("/music/a.mp3"));
}

#[test]
fn resource_id_displays_with_hash() {
    assert_eq!(ResourceId::new(7).to_string(), "#7");
}

#[test]
fn append_source_reports_missing_file_as_open_error() {
    let (sink, _queue) = Sink::new();
    let err = append_source(&sink, "/definitely/not/here.mp3", false, Duration::ZERO).unwrap_err();
    assert!(matches!(err, BackendError::Open { .. }));
    assert!(sink.empty());
}

#[test]
fn append_source_reports_garbage_as_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.mp3");
    std::fs::write(&path, b"not a real mp3").unwrap();

    let (sink, _queue) = Sink::new();
    let err = append_source(&sink, path.to_str().unwrap(), false, Duration::ZERO).unwrap_err();
    assert!(matches!(err, BackendError::Decode { .. }));
}

#[test]
fn status_of_empty_sink_is_loaded_but_not_playing() {
    let (sink, _queue) = Sink::new();
    let status = status_of(&sink, true);
    assert!(status.is_loaded);
    assert!(!status.is_playing);
    assert!(status.is_looping);
    assert_eq!(status.position_ms, 0);
}

const POLL: Duration = Duration::from_millis(5);

/// A sink holding a tenth of a second of silence.
fn short_sink() -> (Arc<Sink>, rodio::queue::SourcesQueueOutput) {
    let (sink, queue) = Sink::new();
    sink.append(SamplesBuffer::new(1, 8_000, vec![0.0f32; 800]));
    (Arc::new(sink), queue)
}

fn watch(sink: &Arc<Sink>, id: u64, armed: bool) -> (Watcher, mpsc::Receiver<StatusUpdate>) {
    let (tx, rx) = mpsc::channel();
    let watcher = spawn_watcher(ResourceId::new(id), Arc::clone(sink), false, tx, POLL, armed).unwrap();
    (watcher, rx)
}

/// Pull samples the way an output device would until the queue runs dry.
fn play_out(queue: &mut rodio::queue::SourcesQueueOutput) {
    queue.by_ref().take(4_000).for_each(drop);
}

#[test]
fn watcher_reports_natural_end_once() {
    let (sink, mut queue) = short_sink();
    let (_watcher, rx) = watch(&sink, 7, false);

    play_out(&mut queue);
    assert!(sink.empty());

    let update = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(update.resource, ResourceId::new(7));
    assert!(update.did_just_finish);
    assert!(update.status.is_loaded);
    assert!(!update.status.is_playing);

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn released_watcher_stays_silent() {
    let (sink, mut queue) = short_sink();
    let (watcher, rx) = watch(&sink, 1, false);

    watcher.release();
    play_out(&mut queue);

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn dropped_watcher_stays_silent() {
    let (sink, mut queue) = short_sink();
    let (watcher, rx) = watch(&sink, 1, false);
    drop(watcher);

    play_out(&mut queue);

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn armed_watcher_reports_a_source_that_drained_before_it_started() {
    let (sink, mut queue) = short_sink();
    play_out(&mut queue);
    assert!(sink.empty());

    let (_watcher, rx) = watch(&sink, 3, true);

    let update = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(update.resource, ResourceId::new(3));
    assert!(update.did_just_finish);
}

#[test]
fn unarmed_watcher_ignores_an_already_empty_sink() {
    let (sink, _queue) = Sink::new();
    let (_watcher, rx) = watch(&Arc::new(sink), 4, false);

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}
