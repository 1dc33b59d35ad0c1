use anyhow;
use parking_lot::Mutex;
use portaudio as pa;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A finalized microphone clip ready for upload.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Source of microphone samples. The production backend wraps PortAudio;
/// tests substitute a mock so the recording state machine can run without a
/// capture device.
pub trait CaptureBackend: Send {
    /// Opens the input stream. Samples are appended to `sink` while
    /// `recording` is set.
    fn start(
        &mut self,
        sink: Arc<Mutex<Vec<f32>>>,
        recording: Arc<AtomicBool>,
    ) -> anyhow::Result<()>;

    /// Stops and closes the stream, releasing the device.
    fn stop(&mut self);
}

/// Microphone capture using a non-blocking PortAudio input stream.
pub struct PortAudioCapture {
    sample_rate: usize,
    buffer_size: usize,
    stream: Option<pa::Stream<pa::NonBlocking, pa::Input<f32>>>,
}

impl PortAudioCapture {
    pub fn new(sample_rate: usize, buffer_size: usize) -> Self {
        Self {
            sample_rate,
            buffer_size,
            stream: None,
        }
    }
}

impl CaptureBackend for PortAudioCapture {
    fn start(
        &mut self,
        sink: Arc<Mutex<Vec<f32>>>,
        recording: Arc<AtomicBool>,
    ) -> anyhow::Result<()> {
        let pa = pa::PortAudio::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize PortAudio: {}", e))?;

        let input_params = pa
            .default_input_stream_params::<f32>(1)
            .map_err(|e| anyhow::anyhow!("Failed to get default input stream parameters: {}", e))?;
        let input_settings = pa::InputStreamSettings::new(
            input_params,
            self.sample_rate as f64,
            self.buffer_size as u32,
        );

        let callback = move |pa::InputStreamCallbackArgs { buffer, .. }| {
            if recording.load(Ordering::Relaxed) {
                sink.lock().extend_from_slice(buffer);
                pa::Continue
            } else {
                pa::Complete
            }
        };

        let mut stream = pa
            .open_non_blocking_stream(input_settings, callback)
            .map_err(|e| anyhow::anyhow!("Failed to open stream: {}", e))?;

        stream
            .start()
            .map_err(|e| anyhow::anyhow!("Failed to start stream: {}", e))?;

        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = &mut self.stream {
            if let Err(e) = stream.stop() {
                log::warn!("Failed to stop capture stream: {}", e);
            }
            if let Err(e) = stream.close() {
                log::warn!("Failed to close capture stream: {}", e);
            }
        }
        self.stream = None;
    }
}

impl Drop for PortAudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Recording session state machine: Idle until `start`, Recording until
/// `stop` or the auto-stop deadline. At most one session is active; the
/// atomic flag doubles as the gate the capture callback reads.
pub struct VoiceRecorder {
    backend: Box<dyn CaptureBackend>,
    recording: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<f32>>>,
    deadline: Option<Instant>,
    max_duration: Duration,
    sample_rate: u32,
}

impl VoiceRecorder {
    pub fn new(backend: Box<dyn CaptureBackend>, max_duration: Duration, sample_rate: u32) -> Self {
        Self {
            backend,
            recording: Arc::new(AtomicBool::new(false)),
            samples: Arc::new(Mutex::new(Vec::new())),
            deadline: None,
            max_duration,
            sample_rate,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Relaxed)
    }

    /// Idle -> Recording. A no-op while already recording: the state is
    /// unchanged and no second stream is acquired.
    pub fn start(&mut self, now: Instant) -> anyhow::Result<()> {
        if self.is_recording() {
            return Ok(());
        }
        self.samples.lock().clear();
        self.recording.store(true, Ordering::Relaxed);
        if let Err(e) = self
            .backend
            .start(self.samples.clone(), self.recording.clone())
        {
            self.recording.store(false, Ordering::Relaxed);
            return Err(e);
        }
        self.deadline = Some(now + self.max_duration);
        Ok(())
    }

    /// Recording -> Idle. Releases the stream and finalizes the buffered
    /// samples into one clip. Returns `None` when idle.
    pub fn stop(&mut self) -> Option<AudioClip> {
        if !self.is_recording() {
            return None;
        }
        self.recording.store(false, Ordering::Relaxed);
        self.backend.stop();
        self.deadline = None;
        let samples = std::mem::take(&mut *self.samples.lock());
        Some(AudioClip {
            samples,
            sample_rate: self.sample_rate,
        })
    }

    /// Whether the auto-stop deadline has passed.
    pub fn deadline_elapsed(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }
}

impl Drop for VoiceRecorder {
    fn drop(&mut self) {
        // Release the device on every exit path
        self.recording.store(false, Ordering::Relaxed);
        self.backend.stop();
    }
}
