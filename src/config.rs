use serde::{Deserialize, Serialize};

/// Physical dimensions and placement of the chat panel in scene units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Panel center position in the scene (x, y, z).
    pub position: [f32; 3],
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 1.2,
            height: 1.6,
            depth: 0.05,
            position: [-1.5, 0.8, 0.0],
        }
    }
}

/// Text layout parameters for the panel texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Message font size in texture pixels
    pub font_size: f32,
    /// Vertical advance per wrapped line in texture pixels
    pub line_height: f32,
    /// Inner padding of the message area
    pub padding: f32,
    /// Maximum number of messages drawn per repaint
    pub max_lines: usize,
    /// Estimated average glyph advance, used for greedy wrapping
    /// (the host's text renderer does the exact rasterization)
    pub char_width: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            line_height: 30.0,
            padding: 20.0,
            max_lines: 20,
            char_width: 11.0,
        }
    }
}

/// Panel palette as 0xRRGGBB values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub panel: u32,
    pub border: u32,
    pub text: u32,
    pub user_text: u32,
    pub assistant_text: u32,
    pub button: u32,
    pub message_area: u32,
    pub subtitle: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            panel: 0x1E293B,
            border: 0x334155,
            text: 0xF1F5F9,
            user_text: 0x10B981,
            assistant_text: 0x64748B,
            button: 0x059669,
            message_area: 0x0F172A,
            subtitle: 0x94A3B8,
        }
    }
}

/// Voice capture and submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Endpoint receiving the multipart audio upload
    pub endpoint: String,
    /// Recording auto-stop deadline in seconds
    pub max_recording_secs: u64,
    /// Capture sample rate in Hz
    pub sample_rate: usize,
    /// Capture block size in samples
    pub buffer_size: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/voice/chat".to_string(),
            max_recording_secs: 10,
            sample_rate: 16000,
            buffer_size: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub panel: PanelConfig,
    pub text: TextConfig,
    pub colors: ColorConfig,
    pub voice: VoiceConfig,
    /// Optional path to a system prompt file overriding the built-in persona
    pub prompt_path: Option<String>,
}

/// Helper function to read the application configuration
pub fn read_app_config() -> AppConfig {
    match std::fs::read_to_string("config.json") {
        Ok(config_str) => match serde_json::from_str(&config_str) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Failed to parse config.json: {}. Using default configuration.",
                    e
                );
                AppConfig::default()
            }
        },
        Err(e) => {
            log::debug!(
                "Failed to read config.json: {}. Using default configuration.",
                e
            );
            AppConfig::default()
        }
    }
}
