//! Voice capture
//!
//! Audio capture is an external collaborator behind [`AudioCapture`]. The
//! core only sees success with an opaque [`CaptureHandle`], or a device
//! failure that surfaces as `CaptureDenied`.
//!
//! A [`RecordingSession`] counts whole seconds on the refresh tick and stops
//! the device itself once the chosen [`RecordingCap`] is reached.

use std::time::Duration;

use tracing::{debug, info, warn};
use whisper_core::{RecordingCap, WhisperError, WhisperResult};
use whisper_state::CaptureHandle;

/// Device-side audio capture
pub trait AudioCapture {
    /// Open the device and start recording.
    /// `Err` carries the device's reason (denied, unavailable).
    fn start(&mut self) -> Result<(), String>;

    /// Stop recording and hand back the captured audio
    fn stop(&mut self, recorded: Duration) -> Result<CaptureHandle, String>;
}

/// Capture that fabricates a deterministic byte stream, for demos and tests
#[derive(Clone, Debug, Default)]
pub struct SyntheticCapture {
    /// Bytes produced per recorded second
    pub bytes_per_sec: usize,
    active: bool,
}

impl SyntheticCapture {
    pub fn new(bytes_per_sec: usize) -> Self {
        SyntheticCapture {
            bytes_per_sec,
            active: false,
        }
    }
}

impl AudioCapture for SyntheticCapture {
    fn start(&mut self) -> Result<(), String> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self, recorded: Duration) -> Result<CaptureHandle, String> {
        if !self.active {
            return Err("device not started".into());
        }
        self.active = false;
        let len = self.bytes_per_sec * recorded.as_secs() as usize;
        let bytes = (0..len).map(|i| (i % 251) as u8).collect();
        Ok(CaptureHandle::new(bytes, recorded))
    }
}

/// Capture whose device is never available
#[derive(Clone, Debug)]
pub struct DeniedCapture {
    pub reason: String,
}

impl Default for DeniedCapture {
    fn default() -> Self {
        DeniedCapture {
            reason: "Microphone access denied or unavailable".into(),
        }
    }
}

impl AudioCapture for DeniedCapture {
    fn start(&mut self) -> Result<(), String> {
        Err(self.reason.clone())
    }

    fn stop(&mut self, _recorded: Duration) -> Result<CaptureHandle, String> {
        Err(self.reason.clone())
    }
}

#[derive(Debug)]
enum RecordingState {
    Idle,
    Recording { elapsed_secs: u64 },
    Captured(CaptureHandle),
}

/// One composer's recorder: idle, recording, or holding a finished capture
#[derive(Debug)]
pub struct RecordingSession<C> {
    device: C,
    cap: RecordingCap,
    state: RecordingState,
}

impl<C: AudioCapture> RecordingSession<C> {
    pub fn new(device: C, cap: RecordingCap) -> Self {
        RecordingSession {
            device,
            cap,
            state: RecordingState::Idle,
        }
    }

    pub fn cap(&self) -> RecordingCap {
        self.cap
    }

    /// Change the cap. Only allowed while not recording.
    pub fn set_cap(&mut self, cap: RecordingCap) -> WhisperResult<()> {
        if self.is_recording() {
            return Err(WhisperError::RecordingInProgress);
        }
        self.cap = cap;
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording { .. })
    }

    pub fn elapsed_secs(&self) -> u64 {
        match self.state {
            RecordingState::Recording { elapsed_secs } => elapsed_secs,
            _ => 0,
        }
    }

    /// Seconds until the cap stops the recording
    pub fn remaining_secs(&self) -> u64 {
        self.cap.as_secs().saturating_sub(self.elapsed_secs())
    }

    /// Start recording. Any previous capture is discarded.
    pub fn start(&mut self) -> WhisperResult<()> {
        if self.is_recording() {
            return Err(WhisperError::RecordingInProgress);
        }
        self.state = RecordingState::Idle;

        self.device.start().map_err(|reason| {
            warn!(%reason, "audio capture failed to start");
            WhisperError::CaptureDenied(reason)
        })?;

        self.state = RecordingState::Recording { elapsed_secs: 0 };
        info!(cap = %self.cap, "recording started");
        Ok(())
    }

    /// Advance by one second. Returns `true` when the cap stopped the recording.
    pub fn tick(&mut self) -> WhisperResult<bool> {
        let RecordingState::Recording { elapsed_secs } = &mut self.state else {
            return Ok(false);
        };
        *elapsed_secs += 1;
        if *elapsed_secs >= self.cap.as_secs() {
            debug!("recording cap reached");
            self.stop()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Stop recording and keep the capture. No-op when not recording.
    pub fn stop(&mut self) -> WhisperResult<()> {
        let RecordingState::Recording { elapsed_secs } = self.state else {
            return Ok(());
        };
        self.state = RecordingState::Idle;

        let recorded = Duration::from_secs(elapsed_secs);
        let handle = self.device.stop(recorded).map_err(|reason| {
            warn!(%reason, "audio capture failed");
            WhisperError::CaptureDenied(reason)
        })?;

        info!(secs = elapsed_secs, bytes = handle.byte_len(), "recording completed");
        self.state = RecordingState::Captured(handle);
        Ok(())
    }

    pub fn capture(&self) -> Option<&CaptureHandle> {
        match &self.state {
            RecordingState::Captured(handle) => Some(handle),
            _ => None,
        }
    }

    /// Take the finished capture, leaving the session idle
    pub fn take_capture(&mut self) -> Option<CaptureHandle> {
        match std::mem::replace(&mut self.state, RecordingState::Idle) {
            RecordingState::Captured(handle) => Some(handle),
            other => {
                self.state = other;
                None
            }
        }
    }
}
