//! MockDraft Core Library
//!
//! Platform-agnostic core of the MockDraft UI mockup editor: widget
//! archetypes, the item scene, gestures, undoable commands and the XML
//! mockup format.

pub mod commands;
pub mod config;
pub mod document;
pub mod draw;
pub mod error;
pub mod interaction;
pub mod items;
pub mod persist;
pub mod scene;
pub mod snap;
pub mod storage;
pub mod theme;
pub mod widgets;

pub use commands::{Command, CommandContext, CommandStack, DataEdit};
pub use config::EditorConfig;
pub use document::Document;
pub use draw::{ColorRole, DrawOp, FontSpec, WidgetColor};
pub use error::{DocumentError, DocumentResult};
pub use interaction::{Gesture, HandleKind, Interaction};
pub use items::{Group, Item, ItemId, Placeable, Widget};
pub use scene::{Painter, Scene, SceneEvent};
pub use snap::{SnapGuide, SnapPolicy};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use theme::{ApproxTheme, Theme};
pub use widgets::{BoolProperty, IntProperty, PropertySet, WidgetData, WidgetFields, WidgetType};
