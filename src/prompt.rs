use anyhow::Context;
use std::path::Path;

/// Built-in persona for the respiratory-health assistant. Handed verbatim to
/// the external chat backend; the widget itself never interprets it.
const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a virtual assistant specialized in pulmonology (respiratory medicine).

YOUR CAPABILITIES:
- Provide educational information about the anatomy and physiology of the respiratory system
- Explain common lung diseases (asthma, COPD, pneumonia, pulmonary fibrosis, lung cancer, etc.)
- Describe respiratory symptoms and their possible general causes
- Inform about risk factors and prevention of respiratory diseases
- Explain diagnostic exams (spirometry, CT scans, chest X-rays, etc.)
- Advise on when to seek emergency medical care

IMPORTANT LIMITATIONS:
- Do NOT make specific medical diagnoses
- Do NOT prescribe medication or treatments
- Do NOT replace a professional medical consultation
- Always advise seeking medical care for concerning symptoms

GUIDELINES:
- Use clear, accessible language, explaining technical terms when needed
- Base answers on scientific evidence and established medical guidelines
- When relevant, mention trusted sources (WHO, medical societies, etc.)
- For emergency symptoms (severe shortness of breath, chest pain, etc.), advise seeking emergency care immediately

RESPONSE FORMATTING (for better user comprehension):
- Structure answers with short headings (###) and '-' bullet lists
- Use short, focused paragraphs; avoid long blocks of text
- Highlight important terms in **bold** when useful
- Use numbered lists for steps or practical guidance
";

/// System prompt with an explicit load lifecycle: built-in default persona,
/// optionally overridden by a file named in the configuration.
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    text: String,
}

impl SystemPrompt {
    /// Loads the prompt from a file. Fails if the file is missing or empty.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read system prompt from {}", path.display()))?;
        if text.trim().is_empty() {
            anyhow::bail!("system prompt file {} is empty", path.display());
        }
        Ok(Self { text })
    }

    /// Loads from the configured path when present, otherwise the built-in
    /// default. A broken override falls back to the default with a warning.
    pub fn from_config(prompt_path: Option<&str>) -> Self {
        match prompt_path {
            Some(path) => match Self::load(path) {
                Ok(prompt) => prompt,
                Err(e) => {
                    log::warn!("{:#}. Using built-in system prompt.", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self {
            text: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}
