pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{EventHandled, InputEvent, TouchEventType, TouchPoint};
pub use handler::{Action, DragState, InputHandler};
