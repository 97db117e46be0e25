//! Free-hand annotation layer drawn over the video.
//!
//! Strokes belong to the viewer, not to the stream: pausing, stopping or
//! restarting a session leaves them in place. Only [`Telestrator::clear`]
//! removes them.

pub const STROKE_COLOR: &str = "#facc15";
pub const STROKE_WIDTH: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    pub points: Vec<CanvasPoint>,
}

#[derive(Clone, Debug, Default)]
pub struct Telestrator {
    active: bool,
    strokes: Vec<Stroke>,
    drawing: Option<Stroke>,
}

impl Telestrator {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable drawing. Disabling ends an open stroke but keeps
    /// everything already drawn.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.end_stroke();
        }
    }

    pub fn toggle(&mut self) {
        self.set_active(!self.active);
    }

    /// Pointer down. Ignored while inactive.
    pub fn begin_stroke(&mut self, point: CanvasPoint) {
        if !self.active {
            return;
        }
        self.end_stroke();
        self.drawing = Some(Stroke {
            points: vec![point],
        });
    }

    /// Pointer move while a stroke is open.
    pub fn extend_stroke(&mut self, point: CanvasPoint) {
        if !self.active {
            return;
        }
        if let Some(stroke) = self.drawing.as_mut() {
            stroke.points.push(point);
        }
    }

    /// Pointer up or leaving the canvas.
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.drawing.take() {
            self.strokes.push(stroke);
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = None;
    }

    /// Finished strokes followed by the one being drawn.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.drawing.iter())
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len() + usize::from(self.drawing.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> CanvasPoint {
        CanvasPoint { x, y }
    }

    #[test]
    fn inactive_canvas_ignores_input() {
        let mut canvas = Telestrator::default();
        canvas.begin_stroke(point(1.0, 1.0));
        canvas.extend_stroke(point(2.0, 2.0));
        canvas.end_stroke();
        assert_eq!(canvas.stroke_count(), 0);
    }

    #[test]
    fn strokes_survive_deactivation_until_cleared() {
        let mut canvas = Telestrator::default();
        canvas.toggle();
        canvas.begin_stroke(point(0.0, 0.0));
        canvas.extend_stroke(point(5.0, 5.0));
        canvas.toggle();
        assert!(!canvas.is_active());
        assert_eq!(canvas.stroke_count(), 1);
        assert_eq!(canvas.strokes().next().unwrap().points.len(), 2);
        canvas.clear();
        assert_eq!(canvas.stroke_count(), 0);
    }
}
