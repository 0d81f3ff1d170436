// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Asciinema v2 recording and playback: one JSON header line followed by
//! `[time, "o"|"i", data]` event lines, optionally gzip-compressed
//! end-to-end. Playback batches consecutive output events that land within
//! a short window so a burst of individually-timestamped writes replays as
//! one paint instead of stuttering character by character.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TermError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const BATCH_WINDOW: Duration = Duration::from_millis(10);

/// The first line of an asciinema v2 file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub width: u16,
    pub height: u16,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Which stream an event's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stream {
    #[serde(rename = "o")]
    Output,
    #[serde(rename = "i")]
    Input,
}

/// One `[time, code, data]` line. A tuple struct rather than a regular
/// struct so serde emits it as a bare JSON array, matching the format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent(pub f64, pub Stream, pub String);

/// A fully parsed recording: header plus every event line, in file order.
#[derive(Debug, Clone)]
pub struct Recording {
    pub header: Header,
    pub events: Vec<RawEvent>,
}

impl Recording {
    /// Read a recording from `reader`, auto-detecting gzip compression by
    /// its magic bytes.
    pub fn load(mut reader: impl Read) -> Result<Self> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw).map_err(TermError::Io)?;

        let text = if raw.starts_with(&GZIP_MAGIC) {
            let mut decompressed = String::new();
            GzDecoder::new(&raw[..]).read_to_string(&mut decompressed).map_err(TermError::Io)?;
            decompressed
        } else {
            String::from_utf8(raw).map_err(|e| TermError::Recording(e.to_string()))?
        };

        let mut lines = text.lines();
        let header_line =
            lines.next().ok_or_else(|| TermError::Recording("recording has no header line".into()))?;
        let header: Header =
            serde_json::from_str(header_line).map_err(|e| TermError::Recording(e.to_string()))?;

        let mut events = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let event: RawEvent =
                serde_json::from_str(line).map_err(|e| TermError::Recording(e.to_string()))?;
            events.push(event);
        }

        Ok(Self { header, events })
    }
}

/// Writes an asciinema v2 stream as a session progresses. The header is
/// written eagerly on construction; every subsequent write is one event
/// line timestamped against the recorder's start.
pub struct Recorder<W> {
    writer: W,
    start: Instant,
}

impl<W: Write> Recorder<W> {
    pub fn new(mut writer: W, width: u16, height: u16, title: Option<String>) -> Result<Self> {
        let header = Header {
            version: 2,
            width,
            height,
            timestamp: chrono::Utc::now().timestamp(),
            env: HashMap::new(),
            title,
        };
        let line = serde_json::to_string(&header).map_err(|e| TermError::Recording(e.to_string()))?;
        writeln!(writer, "{line}").map_err(TermError::Io)?;
        Ok(Self { writer, start: Instant::now() })
    }

    pub fn record_output(&mut self, data: &[u8]) -> Result<()> {
        self.write_event(Stream::Output, data)
    }

    pub fn record_input(&mut self, data: &[u8]) -> Result<()> {
        self.write_event(Stream::Input, data)
    }

    fn write_event(&mut self, stream: Stream, data: &[u8]) -> Result<()> {
        let elapsed = self.start.elapsed().as_secs_f64();
        let event = RawEvent(elapsed, stream, String::from_utf8_lossy(data).into_owned());
        let line = serde_json::to_string(&event).map_err(|e| TermError::Recording(e.to_string()))?;
        writeln!(self.writer, "{line}").map_err(TermError::Io)
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(TermError::Io)?;
        Ok(self.writer)
    }
}

/// Merge consecutive output events less than `window` apart into single
/// chunks, dropping input events entirely — playback only ever writes the
/// output stream to the terminal.
fn batch_output(events: &[RawEvent], window: Duration) -> Vec<(f64, Vec<u8>)> {
    let window_secs = window.as_secs_f64();
    let mut batches: Vec<(f64, Vec<u8>)> = Vec::new();
    for event in events {
        if event.1 != Stream::Output {
            continue;
        }
        let bytes = event.2.as_bytes();
        match batches.last_mut() {
            Some((start, buf)) if event.0 - *start <= window_secs => buf.extend_from_slice(bytes),
            _ => batches.push((event.0, bytes.to_vec())),
        }
    }
    batches
}

/// Replays a [`Recording`]'s output stream at a configurable speed, with
/// pause/resume, seek, and loop support.
pub struct Player {
    pub header: Header,
    schedule: Vec<(f64, Vec<u8>)>,
    position: usize,
    speed: f64,
    loop_enabled: bool,
    paused: Arc<AtomicBool>,
    resume_signal: Arc<tokio::sync::Notify>,
}

impl Player {
    #[must_use]
    pub fn new(recording: Recording) -> Self {
        let schedule = batch_output(&recording.events, BATCH_WINDOW);
        Self {
            header: recording.header,
            schedule,
            position: 0,
            speed: 1.0,
            loop_enabled: false,
            paused: Arc::new(AtomicBool::new(false)),
            resume_signal: Arc::new(tokio::sync::Notify::new()),
        }
    }

    /// Set the playback speed multiplier. Values are clamped away from
    /// zero to avoid an infinite wait between frames.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed = multiplier.max(0.01);
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.resume_signal.notify_waiters();
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Jump to the first batched frame at or after `seconds`.
    pub fn seek(&mut self, seconds: f64) {
        self.position = self.schedule.partition_point(|(offset, _)| *offset < seconds);
    }

    /// Replay the output stream, calling `on_output` for each batched chunk
    /// and sleeping between chunks scaled by the speed multiplier. Returns
    /// once the schedule is exhausted, unless loop mode is enabled, in
    /// which case it restarts from the beginning indefinitely.
    pub async fn run<F: FnMut(&[u8])>(&mut self, mut on_output: F) {
        let mut last_offset = self.schedule.get(self.position).map_or(0.0, |(offset, _)| *offset);
        loop {
            while self.is_paused() {
                self.resume_signal.notified().await;
            }
            let Some((offset, data)) = self.schedule.get(self.position).cloned() else {
                if self.loop_enabled && !self.schedule.is_empty() {
                    self.position = 0;
                    last_offset = 0.0;
                    continue;
                }
                return;
            };
            let delay = (offset - last_offset).max(0.0) / self.speed;
            if delay > 0.0 {
                tokio::time::sleep(Duration::from_secs_f64(delay)).await;
            }
            on_output(&data);
            last_offset = offset;
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn sample_recording() -> Recording {
        Recording {
            header: Header {
                version: 2,
                width: 80,
                height: 24,
                timestamp: 0,
                env: HashMap::new(),
                title: None,
            },
            events: vec![
                RawEvent(0.0, Stream::Output, "a".into()),
                RawEvent(0.002, Stream::Output, "b".into()),
                RawEvent(0.5, Stream::Output, "c".into()),
                RawEvent(0.5, Stream::Input, "x".into()),
            ],
        }
    }

    #[test]
    fn header_round_trips_through_json() {
        let header = Header {
            version: 2,
            width: 80,
            height: 24,
            timestamp: 1_700_000_000,
            env: HashMap::new(),
            title: Some("demo".into()),
        };
        let json = serde_json::to_string(&header).unwrap();
        let back: Header = serde_json::from_str(&json).unwrap();
        assert_eq!(back, header);
    }

    #[test]
    fn raw_event_serializes_as_a_bare_array() {
        let event = RawEvent(1.5, Stream::Output, "hi".into());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"[1.5,"o","hi"]"#);
    }

    #[test]
    fn batch_output_merges_close_events_and_drops_input() {
        let recording = sample_recording();
        let batches = batch_output(&recording.events, Duration::from_millis(10));
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].1, b"ab");
        assert_eq!(batches[1].1, b"c");
    }

    #[test]
    fn load_detects_and_decodes_gzip_by_magic_bytes() {
        let plain = "{\"version\":2,\"width\":80,\"height\":24,\"timestamp\":0}\n[0.1,\"o\",\"hi\"]\n";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(plain.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let recording = Recording::load(&compressed[..]).unwrap();
        assert_eq!(recording.header.width, 80);
        assert_eq!(recording.events.len(), 1);
    }

    #[test]
    fn seek_lands_on_first_frame_at_or_after_target() {
        let mut player = Player::new(sample_recording());
        player.seek(0.1);
        assert_eq!(player.position, 2);
    }

    #[tokio::test]
    async fn run_delivers_batched_output_in_order() {
        let mut player = Player::new(sample_recording());
        player.set_speed(1000.0);
        let mut received = Vec::new();
        player.run(|chunk| received.push(chunk.to_vec())).await;
        assert_eq!(received, vec![b"ab".to_vec(), b"c".to_vec()]);
    }

    #[tokio::test]
    async fn run_stops_after_one_pass_without_loop() {
        let mut player = Player::new(sample_recording());
        player.set_speed(1000.0);
        let mut count = 0;
        player.run(|_| count += 1).await;
        assert_eq!(count, 2);
    }
}
