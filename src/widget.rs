use base64::Engine;
use glam::Vec3;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::geometry::{HitShape, Ray};
use crate::layout::layout_panel;
use crate::message::{MessageLog, Sender};
use crate::playback::AudioPlayback;
use crate::recorder::{CaptureBackend, PortAudioCapture, VoiceRecorder};
use crate::scene::{ButtonSpec, NodeId, NodeRole, PanelSpec, SceneHost};
use crate::texture::PanelTexture;
use crate::voice_client::{VoiceClient, VoiceReply};

const OPEN_ANIMATION: Duration = Duration::from_millis(300);
const OPEN_START_SCALE: f32 = 0.01;

const TOGGLE_RADIUS: f32 = 0.05;
const TOGGLE_OFFSET: Vec3 = Vec3::new(0.8, 0.6, 0.0);
const SEND_EXTENTS: Vec3 = Vec3::new(0.15, 0.08, 0.03);
const SEND_OFFSET: Vec3 = Vec3::new(0.4, -0.7, 0.1);

pub const RECORDING_NOTICE: &str = "\u{1F3A4} Recording...";
pub const PROCESSING_NOTICE: &str = "\u{23F9} Processing...";
pub const MIC_ERROR_NOTICE: &str = "Error: could not access the microphone";
pub const VOICE_ERROR_NOTICE: &str = "Could not process the audio. Please try again.";

/// Scene nodes the widget owns; removed together in `destroy`.
struct PanelNodes {
    panel: NodeId,
    toggle: NodeId,
    send: NodeId,
}

struct InteractiveNode {
    role: NodeRole,
    shape: HitShape,
}

enum VoiceOutcome {
    Reply(VoiceReply),
    Failed(String),
}

/// 3D chat panel for an immersive scene: bounded message log rendered to a
/// panel texture, ray-tested toggle/send controls, and a record-submit-reply
/// voice loop against a remote endpoint.
///
/// All methods are meant to be called from the host's frame loop; voice
/// submission runs on the ambient tokio runtime and reports back through a
/// channel drained by [`ChatPanelWidget::update`].
pub struct ChatPanelWidget {
    config: AppConfig,
    log: MessageLog,
    texture: PanelTexture,
    uploaded_generation: u64,
    nodes: Option<PanelNodes>,
    hit_nodes: Vec<InteractiveNode>,
    visible: bool,
    scale: f32,
    anim_started: Option<Instant>,
    recorder: VoiceRecorder,
    client: VoiceClient,
    outcome_tx: mpsc::UnboundedSender<VoiceOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<VoiceOutcome>,
    playback: Option<AudioPlayback>,
}

impl ChatPanelWidget {
    /// Widget with the default PortAudio capture backend.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let capture = PortAudioCapture::new(config.voice.sample_rate, config.voice.buffer_size);
        Self::with_capture(config, Box::new(capture))
    }

    /// Widget with an explicit capture backend (tests, alternative devices).
    pub fn with_capture(
        config: AppConfig,
        capture: Box<dyn CaptureBackend>,
    ) -> anyhow::Result<Self> {
        let client = VoiceClient::new(config.voice.endpoint.clone())?;
        let recorder = VoiceRecorder::new(
            capture,
            Duration::from_secs(config.voice.max_recording_secs),
            config.voice.sample_rate as u32,
        );
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let log = MessageLog::new(config.text.max_lines);
        let mut texture = PanelTexture::new();
        texture.repaint(&layout_panel(&log, &config.text, &config.colors));
        Ok(Self {
            config,
            log,
            texture,
            uploaded_generation: 0,
            nodes: None,
            hit_nodes: Vec::new(),
            visible: false,
            scale: 1.0,
            anim_started: None,
            recorder,
            client,
            outcome_tx,
            outcome_rx,
            playback: None,
        })
    }

    /// Builds the visual hierarchy once. No-op if already built.
    pub fn create(&mut self, host: &mut dyn SceneHost) {
        if self.nodes.is_some() {
            return;
        }
        let position = Vec3::from_array(self.config.panel.position);
        let panel_cfg = &self.config.panel;
        let colors = &self.config.colors;

        let panel = host.attach_panel(&PanelSpec {
            position,
            width: panel_cfg.width,
            height: panel_cfg.height,
            depth: panel_cfg.depth,
            color: colors.panel,
            border_color: colors.border,
            opacity: 0.95,
        });
        let toggle = host.attach_button(&ButtonSpec {
            role: NodeRole::Toggle,
            position: position + TOGGLE_OFFSET,
            extents: Vec3::splat(TOGGLE_RADIUS * 2.0),
            color: colors.button,
            icon: "\u{1F4AC}",
        });
        let send = host.attach_button(&ButtonSpec {
            role: NodeRole::Send,
            position: position + SEND_OFFSET,
            extents: SEND_EXTENTS,
            color: colors.button,
            icon: "\u{1F3A4}",
        });

        self.hit_nodes = vec![
            InteractiveNode {
                role: NodeRole::Panel,
                shape: HitShape::centered_box(
                    position,
                    Vec3::new(panel_cfg.width, panel_cfg.height, panel_cfg.depth),
                ),
            },
            InteractiveNode {
                role: NodeRole::Toggle,
                shape: HitShape::Sphere {
                    center: position + TOGGLE_OFFSET,
                    radius: TOGGLE_RADIUS,
                },
            },
            InteractiveNode {
                role: NodeRole::Send,
                shape: HitShape::centered_box(position + SEND_OFFSET, SEND_EXTENTS),
            },
        ];

        host.set_visible(panel, self.visible);
        host.upload_panel_frame(panel, self.texture.frame());
        self.uploaded_generation = self.texture.generation();
        self.nodes = Some(PanelNodes {
            panel,
            toggle,
            send,
        });
    }

    /// Removes the widget's nodes from the scene. `create` may run again.
    pub fn destroy(&mut self, host: &mut dyn SceneHost) {
        if let Some(nodes) = self.nodes.take() {
            host.remove_node(nodes.send);
            host.remove_node(nodes.toggle);
            host.remove_node(nodes.panel);
        }
        self.hit_nodes.clear();
        self.visible = false;
        self.anim_started = None;
        // Discard any active recording without submitting
        let _ = self.recorder.stop();
    }

    /// Appends a message and repaints the panel texture. Empty or
    /// whitespace-only text is rejected.
    pub fn add_message(&mut self, text: &str, sender: Sender) -> bool {
        if !self.log.push(text, sender) {
            return false;
        }
        self.repaint();
        true
    }

    /// Flips panel visibility; becoming visible starts the eased open
    /// animation sampled by `update`.
    pub fn toggle(&mut self, host: &mut dyn SceneHost) {
        let Some(nodes) = &self.nodes else {
            return;
        };
        self.visible = !self.visible;
        host.set_visible(nodes.panel, self.visible);
        if self.visible {
            self.scale = OPEN_START_SCALE;
            host.set_scale(nodes.panel, self.scale);
            self.anim_started = Some(Instant::now());
        } else {
            self.anim_started = None;
        }
    }

    /// Per-frame hook: advances the open animation, fires the recording
    /// auto-stop, drains finished voice submissions, and uploads the panel
    /// texture when it changed since the last upload.
    pub fn update(&mut self, host: &mut dyn SceneHost, now: Instant) {
        if let (Some(started), Some(nodes)) = (self.anim_started, &self.nodes) {
            let progress = (now.saturating_duration_since(started).as_secs_f32()
                / OPEN_ANIMATION.as_secs_f32())
            .min(1.0);
            let eased = ease_out_cubic(progress);
            self.scale = OPEN_START_SCALE + (1.0 - OPEN_START_SCALE) * eased;
            host.set_scale(nodes.panel, self.scale);
            if progress >= 1.0 {
                self.scale = 1.0;
                self.anim_started = None;
            }
        }

        if self.recorder.is_recording() && self.recorder.deadline_elapsed(now) {
            log::info!("recording auto-stop deadline reached");
            self.stop_voice_recording();
        }

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.handle_outcome(outcome);
        }

        if let Some(nodes) = &self.nodes {
            if self.texture.generation() != self.uploaded_generation {
                host.upload_panel_frame(nodes.panel, self.texture.frame());
                self.uploaded_generation = self.texture.generation();
            }
        }
    }

    /// Casts the pointer ray against the widget's nodes. The nearest hit on
    /// the toggle control flips the panel; on the send control (panel
    /// visible) it starts a recording. Returns whether a hit was handled so
    /// the caller can suppress other interaction handling. No-op returning
    /// `false` when the host is not presenting an immersive session.
    pub fn handle_interaction(
        &mut self,
        host: &mut dyn SceneHost,
        origin: Vec3,
        direction: Vec3,
    ) -> bool {
        if !host.is_presenting() || self.nodes.is_none() {
            return false;
        }
        let ray = Ray::new(origin, direction);
        let mut nearest: Option<(f32, NodeRole)> = None;
        for node in &self.hit_nodes {
            // The hidden panel neither renders nor occludes the controls
            if node.role == NodeRole::Panel && !self.visible {
                continue;
            }
            if let Some(t) = node.shape.intersect(&ray) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, node.role));
                }
            }
        }

        match nearest {
            Some((_, NodeRole::Toggle)) => {
                self.toggle(host);
                host.pulse(0.5, 100);
                true
            }
            Some((_, NodeRole::Send)) if self.visible => {
                self.start_voice_recording();
                host.pulse(0.7, 150);
                true
            }
            _ => false,
        }
    }

    /// Idle -> Recording: acquires the capture stream, arms the auto-stop
    /// deadline and posts a status message. No-op while already recording.
    /// A capture failure is surfaced as a chat message, never an error.
    pub fn start_voice_recording(&mut self) {
        if self.recorder.is_recording() {
            return;
        }
        match self.recorder.start(Instant::now()) {
            Ok(()) => {
                self.add_message(RECORDING_NOTICE, Sender::User);
            }
            Err(e) => {
                log::error!("microphone capture failed: {:#}", e);
                self.add_message(MIC_ERROR_NOTICE, Sender::Assistant);
            }
        }
    }

    /// Recording -> Idle: finalizes the clip, releases the stream, and
    /// submits the clip in the background. No-op while idle.
    pub fn stop_voice_recording(&mut self) {
        let Some(clip) = self.recorder.stop() else {
            return;
        };
        self.add_message(PROCESSING_NOTICE, Sender::User);

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = match client.submit(&clip).await {
                Ok(reply) => VoiceOutcome::Reply(reply),
                Err(e) => VoiceOutcome::Failed(format!("{e:#}")),
            };
            let _ = tx.send(outcome);
        });
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    /// Latest panel frame, for hosts that poll instead of waiting on
    /// `update`'s upload.
    pub fn panel_frame(&self) -> &crate::texture::PanelFrame {
        self.texture.frame()
    }

    fn handle_outcome(&mut self, outcome: VoiceOutcome) {
        match outcome {
            VoiceOutcome::Reply(reply) => {
                if let Some(transcript) = reply.transcript {
                    self.add_message(&transcript, Sender::User);
                }
                if let Some(text) = reply.reply {
                    self.add_message(&text, Sender::Assistant);
                }
                if let Some(audio) = reply.audio_base64 {
                    self.play_reply_audio(&audio);
                }
            }
            VoiceOutcome::Failed(err) => {
                log::error!("voice submission failed: {}", err);
                self.add_message(VOICE_ERROR_NOTICE, Sender::Assistant);
            }
        }
    }

    /// Decode and play the reply audio. Malformed base64 or playback
    /// trouble is logged and dropped without a user-visible message.
    fn play_reply_audio(&mut self, audio_base64: &str) {
        let bytes = match base64::engine::general_purpose::STANDARD.decode(audio_base64) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("discarding malformed reply audio: {}", e);
                return;
            }
        };
        if self.playback.is_none() {
            match AudioPlayback::new() {
                Ok(playback) => self.playback = Some(playback),
                Err(e) => {
                    log::warn!("audio playback unavailable: {:#}", e);
                    return;
                }
            }
        }
        if let Some(playback) = &self.playback {
            if let Err(e) = playback.play_bytes(&bytes) {
                log::warn!("failed to play reply audio: {:#}", e);
            }
        }
    }

    fn repaint(&mut self) {
        let layout = layout_panel(&self.log, &self.config.text, &self.config.colors);
        self.texture.repaint(&layout);
    }
}

fn ease_out_cubic(progress: f32) -> f32 {
    1.0 - (1.0 - progress).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::testing::MockCapture;
    use crate::texture::PanelFrame;
    use std::collections::HashMap;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct MockHost {
        presenting: bool,
        next_id: u64,
        attached: Vec<NodeId>,
        visible: HashMap<NodeId, bool>,
        scales: Vec<f32>,
        uploads: Vec<u64>,
        pulses: Vec<(f32, u32)>,
    }

    impl MockHost {
        fn presenting() -> Self {
            Self {
                presenting: true,
                ..Default::default()
            }
        }
    }

    impl SceneHost for MockHost {
        fn is_presenting(&self) -> bool {
            self.presenting
        }

        fn attach_panel(&mut self, _spec: &PanelSpec) -> NodeId {
            self.next_id += 1;
            let id = NodeId(self.next_id);
            self.attached.push(id);
            id
        }

        fn attach_button(&mut self, _spec: &ButtonSpec) -> NodeId {
            self.next_id += 1;
            let id = NodeId(self.next_id);
            self.attached.push(id);
            id
        }

        fn remove_node(&mut self, id: NodeId) {
            self.attached.retain(|&n| n != id);
        }

        fn set_visible(&mut self, id: NodeId, visible: bool) {
            self.visible.insert(id, visible);
        }

        fn set_scale(&mut self, _id: NodeId, scale: f32) {
            self.scales.push(scale);
        }

        fn upload_panel_frame(&mut self, _id: NodeId, frame: &PanelFrame) {
            self.uploads.push(frame.generation);
        }

        fn pulse(&mut self, strength: f32, duration_ms: u32) {
            self.pulses.push((strength, duration_ms));
        }
    }

    fn widget() -> ChatPanelWidget {
        widget_with(MockCapture::new(vec![0.1, 0.2]), AppConfig::default())
    }

    fn widget_with(capture: MockCapture, config: AppConfig) -> ChatPanelWidget {
        let _ = env_logger::builder().is_test(true).try_init();
        ChatPanelWidget::with_capture(config, Box::new(capture)).unwrap()
    }

    fn toggle_ray(config: &AppConfig) -> (Vec3, Vec3) {
        let center = Vec3::from_array(config.panel.position) + TOGGLE_OFFSET;
        (center + Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn send_ray(config: &AppConfig) -> (Vec3, Vec3) {
        let center = Vec3::from_array(config.panel.position) + SEND_OFFSET;
        (center + Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn create_is_idempotent() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        assert_eq!(host.attached.len(), 3);
        w.create(&mut host);
        assert_eq!(host.attached.len(), 3);
    }

    #[test]
    fn destroy_removes_nodes_and_allows_recreate() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        w.destroy(&mut host);
        assert!(host.attached.is_empty());
        w.create(&mut host);
        assert_eq!(host.attached.len(), 3);
    }

    #[test]
    fn toggle_twice_restores_visibility() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        assert!(!w.is_visible());
        w.toggle(&mut host);
        assert!(w.is_visible());
        w.toggle(&mut host);
        assert!(!w.is_visible());
    }

    #[test]
    fn open_animation_eases_to_full_scale() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        w.toggle(&mut host);
        assert!(w.scale() <= OPEN_START_SCALE + f32::EPSILON);
        let now = Instant::now();
        w.update(&mut host, now + Duration::from_millis(150));
        let midway = w.scale();
        assert!(midway > OPEN_START_SCALE && midway < 1.0);
        w.update(&mut host, now + Duration::from_millis(400));
        assert_eq!(w.scale(), 1.0);
        // Animation finished; further updates leave the scale alone
        let samples = host.scales.len();
        w.update(&mut host, now + Duration::from_millis(500));
        assert_eq!(host.scales.len(), samples);
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn interaction_requires_immersive_session() {
        let mut host = MockHost::default();
        let mut w = widget();
        w.create(&mut host);
        let (origin, dir) = toggle_ray(&AppConfig::default());
        assert!(!w.handle_interaction(&mut host, origin, dir));
        assert!(!w.is_visible());
    }

    #[test]
    fn ray_miss_returns_false_without_state_change() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        let handled = w.handle_interaction(&mut host, Vec3::new(10.0, 10.0, 10.0), Vec3::Z);
        assert!(!handled);
        assert!(!w.is_visible());
        assert!(!w.is_recording());
        assert!(host.pulses.is_empty());
    }

    #[test]
    fn toggle_hit_flips_panel_and_pulses() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        let (origin, dir) = toggle_ray(&AppConfig::default());
        assert!(w.handle_interaction(&mut host, origin, dir));
        assert!(w.is_visible());
        assert_eq!(host.pulses, vec![(0.5, 100)]);
    }

    #[test]
    fn send_hit_is_ignored_while_panel_hidden() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        let (origin, dir) = send_ray(&AppConfig::default());
        assert!(!w.handle_interaction(&mut host, origin, dir));
        assert!(!w.is_recording());
    }

    #[test]
    fn send_hit_starts_recording_when_visible() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        w.toggle(&mut host);
        let (origin, dir) = send_ray(&AppConfig::default());
        assert!(w.handle_interaction(&mut host, origin, dir));
        assert!(w.is_recording());
        let last = w.messages().tail(1)[0].clone();
        assert_eq!(last.text, RECORDING_NOTICE);
        assert_eq!(last.sender, Sender::User);
    }

    #[test]
    fn start_while_recording_leaves_state_unchanged() {
        let mut w = widget();
        w.start_voice_recording();
        assert!(w.is_recording());
        let count = w.messages().len();
        w.start_voice_recording();
        assert!(w.is_recording());
        assert_eq!(w.messages().len(), count);
    }

    #[test]
    fn capture_failure_surfaces_as_chat_message() {
        let mut w = widget_with(MockCapture::failing(), AppConfig::default());
        w.start_voice_recording();
        assert!(!w.is_recording());
        let last = w.messages().tail(1)[0].clone();
        assert_eq!(last.text, MIC_ERROR_NOTICE);
        assert_eq!(last.sender, Sender::Assistant);
    }

    #[test]
    fn add_message_marks_texture_dirty() {
        let mut w = widget();
        let before = w.panel_frame().generation;
        assert!(w.add_message("hello", Sender::User));
        assert_eq!(w.panel_frame().generation, before + 1);
        assert!(!w.add_message("  ", Sender::User));
        assert_eq!(w.panel_frame().generation, before + 1);
    }

    #[test]
    fn update_uploads_dirty_frames_once() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        let initial_uploads = host.uploads.len();
        w.add_message("hello", Sender::User);
        w.update(&mut host, Instant::now());
        assert_eq!(host.uploads.len(), initial_uploads + 1);
        w.update(&mut host, Instant::now());
        assert_eq!(host.uploads.len(), initial_uploads + 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn auto_stop_fires_after_deadline() {
        let mut host = MockHost::presenting();
        let mut w = widget();
        w.create(&mut host);
        w.start_voice_recording();
        assert!(w.is_recording());
        let now = Instant::now();
        w.update(&mut host, now + Duration::from_secs(5));
        assert!(w.is_recording());
        w.update(&mut host, now + Duration::from_secs(11));
        assert!(!w.is_recording());
        assert!(w.messages().iter().any(|m| m.text == PROCESSING_NOTICE));
    }

    async fn drain_until<F: Fn(&ChatPanelWidget) -> bool>(
        w: &mut ChatPanelWidget,
        host: &mut MockHost,
        done: F,
    ) {
        for _ in 0..250 {
            w.update(host, Instant::now());
            if done(w) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("voice outcome never arrived");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn successful_submission_appends_transcript_then_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transcript": "oi",
                "reply": "ol\u{e1}"
            })))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.voice.endpoint = format!("{}/api/voice/chat", server.uri());
        let mut w = widget_with(MockCapture::new(vec![0.1, 0.2, 0.3]), config);
        let mut host = MockHost::presenting();
        w.create(&mut host);

        w.start_voice_recording();
        w.stop_voice_recording();
        drain_until(&mut w, &mut host, |w| {
            w.messages().iter().any(|m| m.text == "ol\u{e1}")
        })
        .await;

        let texts: Vec<_> = w.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            [RECORDING_NOTICE, PROCESSING_NOTICE, "oi", "ol\u{e1}"]
        );
        let senders: Vec<_> = w.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders[2], Sender::User);
        assert_eq!(senders[3], Sender::Assistant);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_appends_exactly_one_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.voice.endpoint = server.uri();
        let mut w = widget_with(MockCapture::new(vec![0.1]), config);
        let mut host = MockHost::presenting();
        w.create(&mut host);

        w.start_voice_recording();
        w.stop_voice_recording();
        drain_until(&mut w, &mut host, |w| {
            w.messages().iter().any(|m| m.text == VOICE_ERROR_NOTICE)
        })
        .await;

        let failures = w
            .messages()
            .iter()
            .filter(|m| m.text == VOICE_ERROR_NOTICE)
            .count();
        assert_eq!(failures, 1);
        assert!(!w.is_recording());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_reply_audio_is_dropped_silently() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "reply": "done",
                "audio_base64": "!!! not base64 !!!"
            })))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.voice.endpoint = server.uri();
        let mut w = widget_with(MockCapture::new(vec![0.1]), config);
        let mut host = MockHost::presenting();
        w.create(&mut host);

        w.start_voice_recording();
        w.stop_voice_recording();
        drain_until(&mut w, &mut host, |w| {
            w.messages().iter().any(|m| m.text == "done")
        })
        .await;

        // No failure message for a cosmetic playback problem
        assert!(w.messages().iter().all(|m| m.text != VOICE_ERROR_NOTICE));
    }
}
