use crate::config::{ColorConfig, TextConfig};
use crate::message::{MessageLog, Sender};

/// Panel texture dimensions in pixels.
pub const CANVAS_WIDTH: u32 = 512;
pub const CANVAS_HEIGHT: u32 = 683;

const HEADER_HEIGHT: f32 = 60.0;
const MESSAGE_AREA_TOP: f32 = 80.0;
const FOOTER_HEIGHT: f32 = 40.0;
const FOOTER_MARGIN: f32 = 50.0;
/// Messages draw slightly smaller than the configured base font size
const MESSAGE_FONT_SCALE: f32 = 20.0 / 24.0;

pub const PANEL_TITLE: &str = "Respiratory Assistant";
pub const PANEL_SUBTITLE: &str = "Specialized in lung health";
pub const FOOTER_HINT: &str = "Use VR controls or voice to interact";

/// A filled rectangle in texture space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectOp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: u32,
}

/// A positioned line of text for the host's glyph renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
    pub color: u32,
    pub bold: bool,
}

/// One repaint of the panel: background rectangles plus text runs.
#[derive(Debug, Clone, Default)]
pub struct PanelLayout {
    pub rects: Vec<RectOp>,
    pub runs: Vec<TextRun>,
}

/// Greedy word wrap against an estimated glyph advance: words accumulate
/// while the line stays under `max_width`, otherwise the line is flushed and
/// a new one starts. A single word wider than the limit keeps its own line;
/// words are never split.
pub fn wrap_text(text: &str, max_width: f32, char_width: f32) -> Vec<String> {
    let max_chars = (max_width / char_width).floor().max(1.0) as usize;
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_chars = word_chars;
        } else if line_chars + 1 + word_chars > max_chars {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_chars = word_chars;
        } else {
            line.push(' ');
            line.push_str(word);
            line_chars += 1 + word_chars;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lays out the full panel: header band with title and subtitle, the most
/// recent messages word-wrapped into the message area, and the footer hint.
/// Layout stops once a message would cross the message area's lower bound.
pub fn layout_panel(log: &MessageLog, text_cfg: &TextConfig, colors: &ColorConfig) -> PanelLayout {
    let width = CANVAS_WIDTH as f32;
    let height = CANVAS_HEIGHT as f32;
    let mut layout = PanelLayout::default();

    // Background and header band
    layout.rects.push(RectOp {
        x: 0.0,
        y: 0.0,
        width,
        height,
        color: colors.panel,
    });
    layout.rects.push(RectOp {
        x: 0.0,
        y: 0.0,
        width,
        height: HEADER_HEIGHT,
        color: colors.border,
    });
    layout.runs.push(TextRun {
        x: 20.0,
        y: 20.0,
        text: PANEL_TITLE.to_string(),
        font_size: 28.0,
        color: colors.text,
        bold: true,
    });
    layout.runs.push(TextRun {
        x: 20.0,
        y: 45.0,
        text: PANEL_SUBTITLE.to_string(),
        font_size: 18.0,
        color: colors.subtitle,
        bold: false,
    });

    // Message area
    let area_height = height - (MESSAGE_AREA_TOP + HEADER_HEIGHT);
    layout.rects.push(RectOp {
        x: 10.0,
        y: MESSAGE_AREA_TOP,
        width: width - 20.0,
        height: area_height,
        color: colors.message_area,
    });

    let max_line_width = width - 40.0;
    let y_limit = MESSAGE_AREA_TOP + area_height - 30.0;
    let mut y = MESSAGE_AREA_TOP + 10.0;

    'messages: for message in log.tail(text_cfg.max_lines) {
        let is_user = message.sender == Sender::User;
        let color = if is_user { colors.user_text } else { colors.text };
        for line in wrap_text(&message.text, max_line_width, text_cfg.char_width) {
            layout.runs.push(TextRun {
                x: 20.0,
                y,
                text: line,
                font_size: text_cfg.font_size * MESSAGE_FONT_SCALE,
                color,
                bold: is_user,
            });
            y += text_cfg.line_height;
            if y > y_limit {
                break 'messages;
            }
        }
        y += 5.0;
        if y > y_limit {
            break;
        }
    }

    // Footer hint band
    let footer_y = height - FOOTER_MARGIN;
    layout.rects.push(RectOp {
        x: 10.0,
        y: footer_y,
        width: width - 20.0,
        height: FOOTER_HEIGHT,
        color: colors.border,
    });
    layout.runs.push(TextRun {
        x: 20.0,
        y: footer_y + 15.0,
        text: FOOTER_HINT.to_string(),
        font_size: 16.0,
        color: colors.subtitle,
        bold: false,
    });

    layout
}
