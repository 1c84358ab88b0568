//! The 2D drawing surface the particle field renders onto.
//!
//! The trait mirrors the handful of `CanvasRenderingContext2d` calls the
//! renderer needs. The only state read back from a surface is its pixel
//! size. [`RecordingSurface`] captures calls as [`DrawCommand`]s so frames can
//! be inspected without a browser.

use crate::color::Rgba;
use serde::Serialize;

/// Immediate-mode 2D drawing target.
///
/// Object-safe, so hosts can hand the renderer a `&mut dyn Surface`.
pub trait Surface {
    /// Current pixel size as `(width, height)`.
    fn size(&self) -> (f64, f64);

    /// Clears the rectangle `(0, 0, width, height)` to transparent.
    fn clear(&mut self);

    /// Sets the color used by [`Surface::fill_circle`].
    fn set_fill_color(&mut self, color: Rgba);

    /// Fills a full circle centered at `(x, y)`.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);

    /// Sets the color (including alpha) used by [`Surface::stroke_line`].
    fn set_stroke_color(&mut self, color: Rgba);

    /// Sets the stroke width in pixels.
    fn set_line_width(&mut self, width: f64);

    /// Strokes a straight segment from `(x0, y0)` to `(x1, y1)`.
    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    FillColor { color: Rgba },
    Circle { x: f64, y: f64, radius: f64 },
    StrokeColor { color: Rgba },
    LineWidth { width: f64 },
    Line { x0: f64, y0: f64, x1: f64, y1: f64 },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recorder reporting the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Changes the reported size, as a canvas resize would.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// All commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `Circle` commands recorded.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    /// Number of `Line` commands recorded.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::FillColor { color });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Circle { x, y, radius });
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::StrokeColor { color });
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth { width });
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.commands.push(DrawCommand::Line { x0, y0, x1, y1 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_trait_is_object_safe() {
        let mut rec = RecordingSurface::new(10.0, 20.0);
        let surface: &mut dyn Surface = &mut rec;
        surface.clear();
        assert_eq!(surface.size(), (10.0, 20.0));
    }

    #[test]
    fn records_calls_in_order() {
        let mut rec = RecordingSurface::new(1.0, 1.0);
        rec.clear();
        rec.set_fill_color(Rgba::new(1, 2, 3, 0.5));
        rec.fill_circle(0.5, 0.5, 1.0);
        rec.stroke_line(0.0, 0.0, 1.0, 1.0);
        assert_eq!(rec.commands().len(), 4);
        assert_eq!(rec.commands()[0], DrawCommand::Clear);
        assert_eq!(rec.circle_count(), 1);
        assert_eq!(rec.line_count(), 1);
    }

    #[test]
    fn take_commands_empties_the_log() {
        let mut rec = RecordingSurface::new(1.0, 1.0);
        rec.clear();
        assert_eq!(rec.take_commands().len(), 1);
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn set_size_changes_reported_size() {
        let mut rec = RecordingSurface::new(1.0, 1.0);
        rec.set_size(300.0, 150.0);
        assert_eq!(rec.size(), (300.0, 150.0));
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let v = serde_json::to_value(DrawCommand::LineWidth { width: 1.0 }).unwrap();
        assert_eq!(v["op"], "line_width");
        assert_eq!(v["width"], 1.0);
    }
}
