// viewer.rs - look-around state and the drag/zoom state machine

use log::debug;

use crate::input::{PointerInput, PointerPosition, WheelInput};

pub const DEFAULT_FOV: f32 = 60.0;

/// Degrees of rotation per pixel of drag. Negative for the inverted-drag feel.
const DRAG_SENSITIVITY: f32 = -0.1;

/// Pointer position and orientation captured when a drag begins. Moves are
/// applied relative to this baseline, never incrementally.
#[derive(Debug, Clone, Copy)]
struct DragBaseline {
    pointer: PointerPosition,
    lon: f32,
    lat: f32,
}

/// Everything that outlives a single frame: the look direction in degrees,
/// the vertical field of view, the in-flight drag gesture if any, and the
/// run flag that keeps the redraw loop armed.
pub struct Viewer {
    pub lon: f32,
    pub lat: f32,
    pub fov: f32,
    drag: Option<DragBaseline>,
    running: bool,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            lon: 0.0,
            lat: 0.0,
            fov: DEFAULT_FOV,
            drag: None,
            running: true,
        }
    }

    /// Idle -> Dragging. A pointer-down during an active drag re-baselines
    /// the same session; there is never more than one. Events without a
    /// resolvable position are ignored.
    pub fn pointer_down(&mut self, input: &PointerInput) {
        let Some(pointer) = input.position() else {
            return;
        };
        self.drag = Some(DragBaseline {
            pointer,
            lon: self.lon,
            lat: self.lat,
        });
    }

    /// Recompute the look direction from the drag baseline. No-op in Idle and
    /// for events without a resolvable position.
    pub fn pointer_move(&mut self, input: &PointerInput) {
        let Some(base) = self.drag else {
            return;
        };
        let Some(pos) = input.position() else {
            return;
        };
        self.lon = (base.pointer.x - pos.x) * DRAG_SENSITIVITY + base.lon;
        self.lat = (base.pointer.y - pos.y) * DRAG_SENSITIVITY + base.lat;
    }

    /// Dragging -> Idle. No-op in Idle.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// The pointer left the rendering surface; an active drag ends there.
    pub fn pointer_left(&mut self) {
        if self.drag.take().is_some() {
            debug!("pointer left the viewport, drag session ended");
        }
    }

    /// Apply a scroll event to the field of view. Returns whether the event
    /// carried a usable delta. The stored value is intentionally unclamped;
    /// the projection clamps at the matrix boundary.
    pub fn wheel(&mut self, input: &WheelInput) -> bool {
        match input.fov_delta() {
            Some(delta) => {
                self.fov += delta;
                true
            }
            None => false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Clear the run flag; the event loop exits on its next pass.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(x: f32, y: f32) -> PointerInput {
        PointerInput::from_client(x, y)
    }

    #[test]
    fn drag_applies_relative_deltas_then_idle_ignores_moves() {
        let mut viewer = Viewer::new();

        viewer.pointer_down(&client(100.0, 100.0));
        viewer.pointer_move(&client(80.0, 90.0));
        assert_eq!(viewer.lon, -2.0);
        assert_eq!(viewer.lat, -1.0);

        viewer.pointer_up();
        assert!(!viewer.is_dragging());

        viewer.pointer_move(&client(50.0, 50.0));
        assert_eq!(viewer.lon, -2.0);
        assert_eq!(viewer.lat, -1.0);
    }

    #[test]
    fn moves_are_ignored_before_any_down() {
        let mut viewer = Viewer::new();
        viewer.pointer_move(&client(10.0, 10.0));
        assert_eq!(viewer.lon, 0.0);
        assert_eq!(viewer.lat, 0.0);
    }

    #[test]
    fn deltas_match_across_coordinate_shapes() {
        let down = PointerPosition { x: 200.0, y: 150.0 };
        let moved = PointerPosition { x: 170.0, y: 155.0 };

        let mut by_client = Viewer::new();
        by_client.pointer_down(&PointerInput::from_client(down.x, down.y));
        by_client.pointer_move(&PointerInput::from_client(moved.x, moved.y));

        let mut by_touches = Viewer::new();
        by_touches.pointer_down(&PointerInput::from_touches(vec![down]));
        by_touches.pointer_move(&PointerInput::from_touches(vec![moved]));

        let mut by_changed = Viewer::new();
        by_changed.pointer_down(&PointerInput::from_changed_touches(vec![down]));
        by_changed.pointer_move(&PointerInput::from_changed_touches(vec![moved]));

        assert_eq!(by_client.lon, by_touches.lon);
        assert_eq!(by_client.lat, by_touches.lat);
        assert_eq!(by_client.lon, by_changed.lon);
        assert_eq!(by_client.lat, by_changed.lat);
    }

    #[test]
    fn pointer_down_without_coordinates_fails_closed() {
        let mut viewer = Viewer::new();
        viewer.pointer_down(&PointerInput::default());
        assert!(!viewer.is_dragging());
    }

    #[test]
    fn pointer_leaving_surface_ends_the_session_once() {
        let mut viewer = Viewer::new();
        viewer.pointer_down(&client(10.0, 10.0));
        assert!(viewer.is_dragging());

        viewer.pointer_left();
        assert!(!viewer.is_dragging());

        // second leave and a stale move are both no-ops
        viewer.pointer_left();
        viewer.pointer_move(&client(0.0, 0.0));
        assert_eq!(viewer.lon, 0.0);
        assert_eq!(viewer.lat, 0.0);
    }

    #[test]
    fn second_down_rebaselines_the_single_session() {
        let mut viewer = Viewer::new();
        viewer.pointer_down(&client(100.0, 100.0));
        viewer.pointer_move(&client(90.0, 100.0));
        assert_eq!(viewer.lon, -1.0);

        viewer.pointer_down(&client(50.0, 50.0));
        assert!(viewer.is_dragging());

        // deltas are now relative to the new baseline and orientation
        viewer.pointer_move(&client(40.0, 50.0));
        assert_eq!(viewer.lon, -2.0);
    }

    #[test]
    fn wheel_conventions_update_fov_additively() {
        let mut viewer = Viewer::new();
        assert!(viewer.wheel(&WheelInput::from_wheel_delta_y(120.0)));
        assert_eq!(viewer.fov, 54.0);

        assert!(viewer.wheel(&WheelInput::from_detail(3.0)));
        assert_eq!(viewer.fov, 57.0);
    }

    #[test]
    fn empty_wheel_event_leaves_fov_untouched() {
        let mut viewer = Viewer::new();
        assert!(!viewer.wheel(&WheelInput::default()));
        assert_eq!(viewer.fov, DEFAULT_FOV);
    }

    #[test]
    fn stop_clears_the_run_flag() {
        let mut viewer = Viewer::new();
        assert!(viewer.is_running());
        viewer.stop();
        assert!(!viewer.is_running());
    }
}
