//! Bounded dragging of overlay elements.
//!
//! Every overlay type (text label or image) is dragged the same way: the
//! pointer offset from the element's top-left corner is captured on press and
//! stays fixed for the whole gesture, and each move sample is clamped so the
//! element never leaves the container.

use super::{Point, Size};

/// Clamp a proposed top-left position so the element stays inside the container.
///
/// Each axis is resolved independently:
/// - a negative coordinate snaps to 0
/// - a coordinate whose far edge passes the container snaps to `container - element`
/// - anything else is kept as proposed
///
/// An element larger than the container is pinned at 0 on that axis.
///
/// # Example
///
/// ```
/// use photo_editor_core::geometry::{clamp_position, Point, Size};
///
/// let pos = clamp_position(
///     Point::new(1000.0, 820.0),
///     Size::new(100.0, 50.0),
///     Size::new(1000.0, 800.0),
/// );
/// assert_eq!(pos, Point::new(900.0, 750.0));
/// ```
pub fn clamp_position(proposed: Point, element: Size, container: Size) -> Point {
    Point::new(
        clamp_axis(proposed.x, element.width, container.width),
        clamp_axis(proposed.y, element.height, container.height),
    )
}

#[inline]
fn clamp_axis(proposed: f32, extent: f32, limit: f32) -> f32 {
    if proposed < 0.0 {
        0.0
    } else if proposed + extent > limit {
        (limit - extent).max(0.0)
    } else {
        proposed
    }
}

/// How a finished pointer gesture on an element should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Pressed and released without any move sample.
    Tap,
    /// At least one move sample repositioned the element.
    Drag,
}

/// State of a single-pointer drag on one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    grab_offset: Point,
    moved: bool,
}

impl DragSession {
    /// Start a drag: remember where inside the element the pointer went down.
    pub fn begin(pointer: Point, element_position: Point) -> Self {
        Self {
            grab_offset: Point::new(
                pointer.x - element_position.x,
                pointer.y - element_position.y,
            ),
            moved: false,
        }
    }

    /// Offset between the pointer and the element's top-left corner at press time.
    pub fn grab_offset(&self) -> Point {
        self.grab_offset
    }

    /// Resolve a move sample into the element's new clamped position.
    pub fn update(&mut self, pointer: Point, element: Size, container: Size) -> Point {
        self.moved = true;
        let proposed = Point::new(pointer.x - self.grab_offset.x, pointer.y - self.grab_offset.y);
        clamp_position(proposed, element, container)
    }

    /// End the gesture.
    pub fn finish(self) -> GestureOutcome {
        if self.moved {
            GestureOutcome::Drag
        } else {
            GestureOutcome::Tap
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size {
        width: 1000.0,
        height: 800.0,
    };
    const ELEMENT: Size = Size {
        width: 100.0,
        height: 50.0,
    };

    #[test]
    fn test_clamp_inside_is_unchanged() {
        let pos = clamp_position(Point::new(10.0, 20.0), ELEMENT, CONTAINER);
        assert_eq!(pos, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_clamp_negative_snaps_to_zero() {
        let pos = clamp_position(Point::new(-5.0, -0.1), ELEMENT, CONTAINER);
        assert_eq!(pos, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_clamp_far_edge() {
        let pos = clamp_position(Point::new(1000.0, 820.0), ELEMENT, CONTAINER);
        assert_eq!(pos, Point::new(900.0, 750.0));
    }

    #[test]
    fn test_clamp_exact_fit_at_edge() {
        let pos = clamp_position(Point::new(900.0, 750.0), ELEMENT, CONTAINER);
        assert_eq!(pos, Point::new(900.0, 750.0));
    }

    #[test]
    fn test_clamp_oversized_element_floors_at_zero() {
        let big = Size::new(1200.0, 900.0);
        let pos = clamp_position(Point::new(50.0, 50.0), big, CONTAINER);
        assert_eq!(pos, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_drag_scenario_from_press_near_corner() {
        // Element at (950, 790), pointer grabs it 10px inside on each axis.
        let mut session = DragSession::begin(Point::new(960.0, 800.0), Point::new(950.0, 790.0));
        assert_eq!(session.grab_offset(), Point::new(10.0, 10.0));

        let pos = session.update(Point::new(1010.0, 830.0), ELEMENT, CONTAINER);
        assert_eq!(pos, Point::new(900.0, 750.0));
        assert_eq!(session.finish(), GestureOutcome::Drag);
    }

    #[test]
    fn test_grab_offset_fixed_for_whole_gesture() {
        let mut session = DragSession::begin(Point::new(120.0, 130.0), Point::new(100.0, 100.0));

        let first = session.update(Point::new(220.0, 230.0), ELEMENT, CONTAINER);
        assert_eq!(first, Point::new(200.0, 200.0));

        let second = session.update(Point::new(320.0, 330.0), ELEMENT, CONTAINER);
        assert_eq!(second, Point::new(300.0, 300.0));
        assert_eq!(session.grab_offset(), Point::new(20.0, 30.0));
    }

    #[test]
    fn test_press_release_is_tap() {
        let session = DragSession::begin(Point::new(5.0, 5.0), Point::new(0.0, 0.0));
        assert_eq!(session.finish(), GestureOutcome::Tap);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
