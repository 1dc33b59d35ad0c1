use anyhow::Context;
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;

use crate::recorder::AudioClip;

/// Response from the voice-chat endpoint. Every field is optional and unknown
/// fields are ignored; whatever is missing simply skips the matching UI
/// update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceReply {
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub audio_base64: Option<String>,
}

/// Client for the remote voice-chat endpoint: one multipart POST per clip.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    endpoint: String,
    client: reqwest::Client,
}

impl VoiceClient {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Encodes the clip as WAV and posts it as the `file` multipart field.
    /// Non-2xx status and transport errors both surface as `Err`.
    pub async fn submit(&self, clip: &AudioClip) -> anyhow::Result<VoiceReply> {
        let wav = encode_wav(&clip.samples, clip.sample_rate)?;
        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .context("failed to build audio part")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("voice request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("voice endpoint returned HTTP {}", status);
        }

        res.json::<VoiceReply>()
            .await
            .context("malformed voice response")
    }
}

/// Finalizes f32 samples into a single 16-bit PCM mono WAV clip.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("failed to start WAV writer")?;
        for &sample in samples {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(scaled)
                .context("failed to write WAV sample")?;
        }
        writer.finalize().context("failed to finalize WAV clip")?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn clip() -> AudioClip {
        AudioClip {
            samples: vec![0.0, 0.5, -0.5, 1.0],
            sample_rate: 16000,
        }
    }

    #[test]
    fn encode_wav_writes_riff_header() {
        let wav = encode_wav(&clip().samples, 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus 2 bytes per sample
        assert_eq!(wav.len(), 44 + 4 * 2);
    }

    #[tokio::test]
    async fn submit_parses_full_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transcript": "oi",
                "reply": "olá",
                "extra_field": 42
            })))
            .mount(&server)
            .await;

        let client = VoiceClient::new(format!("{}/api/voice/chat", server.uri())).unwrap();
        let reply = client.submit(&clip()).await.unwrap();
        assert_eq!(reply.transcript.as_deref(), Some("oi"));
        assert_eq!(reply.reply.as_deref(), Some("olá"));
        assert!(reply.audio_base64.is_none());
    }

    #[tokio::test]
    async fn submit_tolerates_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = VoiceClient::new(server.uri()).unwrap();
        let reply = client.submit(&clip()).await.unwrap();
        assert!(reply.transcript.is_none());
        assert!(reply.reply.is_none());
    }

    #[tokio::test]
    async fn submit_fails_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = VoiceClient::new(server.uri()).unwrap();
        let err = client.submit(&clip()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
