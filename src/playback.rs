use anyhow::Context;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;

/// Playback of the endpoint's audio reply through the default output device.
/// The output stream must outlive the sink, so both are held here.
pub struct AudioPlayback {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
}

impl AudioPlayback {
    pub fn new() -> anyhow::Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().context("no audio output device")?;
        let sink = Sink::try_new(&stream_handle).context("failed to create playback sink")?;
        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink,
        })
    }

    /// Decodes and queues audio bytes (WAV/MP3). Empty input is a no-op.
    pub fn play_bytes(&self, bytes: &[u8]) -> anyhow::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let source = Decoder::new(Cursor::new(bytes.to_vec()))
            .context("failed to decode reply audio")?;
        self.sink.append(source.convert_samples::<f32>());
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.empty()
    }

    pub fn stop(&self) {
        self.sink.stop();
    }
}
