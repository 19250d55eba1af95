#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod layer;
pub mod playback;
pub mod renderer;
pub mod selection;
pub mod state;
pub mod stroke;
pub mod timeline;
pub mod tool;
pub mod util;
pub mod viewport;

pub use app::FlipbookApp;
pub use command::{Command, CommandError, CommandHistory};
pub use config::EditorConfig;
pub use document::Document;
pub use error::TransitionError;
pub use frame::Frame;
pub use id_generator::{FrameId, LayerId, StrokeId};
pub use input::{Gesture, InputEvent, PointerPhase};
pub use layer::Layer;
pub use renderer::{Renderer, Scene};
pub use selection::Selection;
pub use state::{EditorContext, EditorState, ProjectFile};
pub use stroke::{MutableStroke, Point, Stroke, StrokeRef};
pub use tool::{BrushSettings, StrokeColor, ToolKind};
pub use viewport::Viewport;
