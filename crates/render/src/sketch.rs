use crate::scene::{Frame, SceneAssets};
use sketchbook_common::CanvasSize;
use sketchbook_input::{Action, ActionState};

/// A self-contained animated drawing.
///
/// The host calls [`tick`](Sketch::tick) at a fixed rate and
/// [`frame`](Sketch::frame) once per redraw. Static geometry is handed over
/// once through [`scene_assets`](Sketch::scene_assets).
pub trait Sketch {
    fn name(&self) -> &'static str;

    /// Logical canvas for 2D sketches; `None` for 3D scenes.
    fn canvas_size(&self) -> Option<CanvasSize> {
        None
    }

    /// Meshes, materials and lines to upload before the first frame.
    fn scene_assets(&self) -> SceneAssets {
        SceneAssets::default()
    }

    /// Advance the animation by one fixed step of `dt` seconds.
    fn tick(&mut self, dt: f32, input: &ActionState);

    /// React to a pressed key or a pointer gesture.
    fn on_action(&mut self, _action: Action) {}

    /// Describe the current state for drawing. `aspect` is the viewport's
    /// width over height.
    fn frame(&self, aspect: f32) -> Frame;

    /// One-line summary for overlays and logs.
    fn status(&self) -> String;
}
