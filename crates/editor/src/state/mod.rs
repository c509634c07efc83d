pub mod clipboard;
pub mod guard;
pub mod history;
pub mod placement;
pub mod scene;
pub mod selection;
pub mod settings;

pub use clipboard::{ClipboardController, ClipboardState, CutOutcome, PasteOutcome};
pub use history::{SceneSnapshot, UndoRedoController};
pub use placement::{PasteOffsetResolver, PlacementOffset};
pub use scene::{element_display_name, short_id, SceneState};
pub use selection::SelectionState;
pub use settings::AppSettings;
