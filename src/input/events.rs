use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Raw pointer, touch and window events the map reacts to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed
    MouseDown { position: Point },
    /// Pointer moved
    MouseMove { position: Point },
    /// Primary button released
    MouseUp,
    /// Pointer left the map container
    MouseLeave,
    /// Scroll wheel; positive `delta_y` scrolls down (zoom out)
    Wheel { delta_y: f64, position: Point },
    /// Touch events (multi-touch)
    Touch {
        event_type: TouchEventType,
        touches: Vec<TouchPoint>,
    },
    /// Container resize
    Resize { size: Point },
}

/// Types of touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, position: Point) -> Self {
        Self { id, position }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl InputEvent {
    /// A touch event carrying exactly one finger
    pub fn single_touch(&self) -> Option<Point> {
        match self {
            InputEvent::Touch { touches, .. } if touches.len() == 1 => Some(touches[0].position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_touch() {
        let one = InputEvent::Touch {
            event_type: TouchEventType::Move,
            touches: vec![TouchPoint::new(1, Point::new(10.0, 20.0))],
        };
        assert_eq!(one.single_touch(), Some(Point::new(10.0, 20.0)));

        let two = InputEvent::Touch {
            event_type: TouchEventType::Move,
            touches: vec![
                TouchPoint::new(1, Point::new(10.0, 20.0)),
                TouchPoint::new(2, Point::new(30.0, 40.0)),
            ],
        };
        assert_eq!(two.single_touch(), None);
    }
}
