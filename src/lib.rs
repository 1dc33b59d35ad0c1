pub mod config;
pub mod geometry;
pub mod layout;
pub mod message;
pub mod playback;
pub mod prompt;
pub mod recorder;
pub mod scene;
pub mod texture;
pub mod voice_client;
pub mod widget;

// Re-export key components for easier access
pub use config::{read_app_config, AppConfig};
pub use message::{Message, MessageLog, Sender};
pub use prompt::SystemPrompt;
pub use recorder::{AudioClip, CaptureBackend, PortAudioCapture, VoiceRecorder};
pub use scene::{ButtonSpec, NodeId, NodeRole, PanelSpec, SceneHost};
pub use texture::{PanelFrame, PanelTexture};
pub use voice_client::{VoiceClient, VoiceReply};
pub use widget::ChatPanelWidget;
