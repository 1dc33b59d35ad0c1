use glam::Vec3;

use crate::texture::PanelFrame;

/// Opaque handle to a node the host created on the widget's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Role of an interactive node, used to route hits back to widget behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Panel body; participates in occlusion but has no action
    Panel,
    /// Sphere control that shows/hides the panel
    Toggle,
    /// Button that starts a voice recording while the panel is visible
    Send,
}

/// Description of the panel mesh handed to the host: a bordered box with the
/// chat texture on its front face.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub color: u32,
    pub border_color: u32,
    pub opacity: f32,
}

/// Description of a button mesh: its body plus a short icon label the host
/// renders onto the face.
#[derive(Debug, Clone)]
pub struct ButtonSpec {
    pub role: NodeRole,
    pub position: Vec3,
    /// Full extents for a box button, or (diameter, _, _) for a sphere
    pub extents: Vec3,
    pub color: u32,
    pub icon: &'static str,
}

/// Seam between the widget and the caller-owned scene graph / renderer.
///
/// The widget only describes what should exist; meshes, materials and glyph
/// rasterization are the host's concern. Implementations are expected to be
/// cheap to call from the frame loop.
pub trait SceneHost {
    /// Whether an immersive (head-mounted) session is currently presenting.
    fn is_presenting(&self) -> bool;

    fn attach_panel(&mut self, spec: &PanelSpec) -> NodeId;
    fn attach_button(&mut self, spec: &ButtonSpec) -> NodeId;
    fn remove_node(&mut self, id: NodeId);

    fn set_visible(&mut self, id: NodeId, visible: bool);
    fn set_scale(&mut self, id: NodeId, scale: f32);

    /// Upload a repainted panel frame. Hosts should compare
    /// [`PanelFrame::generation`] to skip frames they have already seen.
    fn upload_panel_frame(&mut self, id: NodeId, frame: &PanelFrame);

    /// Haptic feedback on the pointing controller. Default: no-op.
    fn pulse(&mut self, _strength: f32, _duration_ms: u32) {}
}
