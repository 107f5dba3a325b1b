use crate::{
    core::geo::Point,
    input::events::{InputEvent, TouchEventType},
};

/// What the map should do in response to an input event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add `delta` to the pan offset
    Pan { delta: Point },
    /// Change zoom by `step` levels, keeping `anchor` fixed on screen
    Zoom { step: i32, anchor: Option<Point> },
    /// The container changed size
    Resize { size: Point },
}

/// Drag state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// A drag is in progress; `last` is the previous pointer position
    Dragging { last: Point },
}

/// Turns raw input into map actions.
///
/// Dragging is a two-state machine. A mouse press or a single-finger touch
/// starts a drag, every move while dragging yields the delta since the last
/// point, and release, leave, touch end or cancel stop it. Wheel events zoom
/// by one level per notch.
pub struct InputHandler {
    pub enabled: bool,
    pub zoom_on_wheel: bool,
    pub pan_on_drag: bool,
    state: DragState,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            enabled: true,
            zoom_on_wheel: true,
            pan_on_drag: true,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Handle one input event and return the actions it produces
    pub fn handle_event(&mut self, event: &InputEvent) -> Vec<Action> {
        if !self.enabled {
            return vec![];
        }

        let mut actions = vec![];

        match event {
            InputEvent::MouseDown { position } => self.start_drag(*position),
            InputEvent::MouseMove { position } => {
                actions.extend(self.drag_to(*position));
            }
            InputEvent::MouseUp | InputEvent::MouseLeave => self.end_drag(),
            InputEvent::Wheel { delta_y, position } => {
                if self.zoom_on_wheel {
                    if let Some(step) = wheel_step(*delta_y) {
                        actions.push(Action::Zoom {
                            step,
                            anchor: Some(*position),
                        });
                    }
                }
            }
            InputEvent::Touch { event_type, .. } => match event_type {
                TouchEventType::Start => {
                    if let Some(position) = event.single_touch() {
                        self.start_drag(position);
                    }
                }
                TouchEventType::Move => {
                    if let Some(position) = event.single_touch() {
                        actions.extend(self.drag_to(position));
                    }
                }
                TouchEventType::End | TouchEventType::Cancel => self.end_drag(),
            },
            InputEvent::Resize { size } => actions.push(Action::Resize { size: *size }),
        }

        actions
    }

    fn start_drag(&mut self, position: Point) {
        if self.pan_on_drag {
            self.state = DragState::Dragging { last: position };
        }
    }

    fn drag_to(&mut self, position: Point) -> Option<Action> {
        let DragState::Dragging { last } = self.state else {
            return None;
        };
        self.state = DragState::Dragging { last: position };
        let delta = position.subtract(&last);
        (!delta.is_zero()).then_some(Action::Pan { delta })
    }

    fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Scrolling down zooms out, scrolling up zooms in, zero is ignored
fn wheel_step(delta_y: f64) -> Option<i32> {
    if delta_y > 0.0 {
        Some(-1)
    } else if delta_y < 0.0 {
        Some(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::TouchPoint;

    fn touch(event_type: TouchEventType, points: &[(f64, f64)]) -> InputEvent {
        InputEvent::Touch {
            event_type,
            touches: points
                .iter()
                .enumerate()
                .map(|(i, (x, y))| TouchPoint::new(i as u64, Point::new(*x, *y)))
                .collect(),
        }
    }

    #[test]
    fn test_move_while_idle_ignored() {
        let mut handler = InputHandler::new();
        let actions = handler.handle_event(&InputEvent::MouseMove {
            position: Point::new(10.0, 10.0),
        });
        assert!(actions.is_empty());
        assert_eq!(handler.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_yields_incremental_deltas() {
        let mut handler = InputHandler::new();
        handler.handle_event(&InputEvent::MouseDown {
            position: Point::new(100.0, 100.0),
        });
        assert!(handler.is_dragging());

        let first = handler.handle_event(&InputEvent::MouseMove {
            position: Point::new(110.0, 95.0),
        });
        assert_eq!(
            first,
            vec![Action::Pan {
                delta: Point::new(10.0, -5.0)
            }]
        );

        let second = handler.handle_event(&InputEvent::MouseMove {
            position: Point::new(115.0, 95.0),
        });
        assert_eq!(
            second,
            vec![Action::Pan {
                delta: Point::new(5.0, 0.0)
            }]
        );

        handler.handle_event(&InputEvent::MouseLeave);
        assert!(!handler.is_dragging());
        assert!(handler
            .handle_event(&InputEvent::MouseMove {
                position: Point::new(200.0, 200.0)
            })
            .is_empty());
    }

    #[test]
    fn test_wheel_direction() {
        let mut handler = InputHandler::new();
        let anchor = Point::new(300.0, 200.0);

        let down = handler.handle_event(&InputEvent::Wheel {
            delta_y: 120.0,
            position: anchor,
        });
        assert_eq!(
            down,
            vec![Action::Zoom {
                step: -1,
                anchor: Some(anchor)
            }]
        );

        let up = handler.handle_event(&InputEvent::Wheel {
            delta_y: -3.0,
            position: anchor,
        });
        assert_eq!(
            up,
            vec![Action::Zoom {
                step: 1,
                anchor: Some(anchor)
            }]
        );

        let zero = handler.handle_event(&InputEvent::Wheel {
            delta_y: 0.0,
            position: anchor,
        });
        assert!(zero.is_empty());
    }

    #[test]
    fn test_multi_finger_touch_does_not_drag() {
        let mut handler = InputHandler::new();
        handler.handle_event(&touch(TouchEventType::Start, &[(0.0, 0.0), (50.0, 50.0)]));
        assert!(!handler.is_dragging());

        handler.handle_event(&touch(TouchEventType::Start, &[(10.0, 10.0)]));
        assert!(handler.is_dragging());

        let pinch = handler.handle_event(&touch(TouchEventType::Move, &[(20.0, 20.0), (60.0, 60.0)]));
        assert!(pinch.is_empty());

        let single = handler.handle_event(&touch(TouchEventType::Move, &[(15.0, 10.0)]));
        assert_eq!(
            single,
            vec![Action::Pan {
                delta: Point::new(5.0, 0.0)
            }]
        );

        handler.handle_event(&touch(TouchEventType::Cancel, &[]));
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_disabled_handler() {
        let mut handler = InputHandler::new();
        handler.enabled = false;
        assert!(handler
            .handle_event(&InputEvent::Resize {
                size: Point::new(10.0, 10.0)
            })
            .is_empty());
        handler.handle_event(&InputEvent::MouseDown {
            position: Point::new(0.0, 0.0),
        });
        assert!(!handler.is_dragging());
    }
}
