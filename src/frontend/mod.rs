//! egui frontend: the rendering collaborator and its editor UI.
//!
//! The frontend is one of two `GraphRenderer` implementations in the crate
//! (the other is the headless recorder used by tests). `GraphScene` holds
//! the visual arenas the graph core drives via opaque handles; the editor
//! pane paints that state and turns interactions into `EditorAction`s for
//! the app to apply.

pub mod app;
pub mod editor;
pub mod inspector;
pub mod scene;
pub mod state;

pub use app::FlowVisApp;
pub use editor::EditorState;
pub use scene::{GraphScene, NodeVisual};
pub use state::EditorAction;
