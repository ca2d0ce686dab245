pub mod constants;
pub mod hit_window;
pub mod note;
pub mod playfield;

pub use constants::*;
pub use hit_window::HitWindow;
pub use note::NoteRuntime;
pub use playfield::PlayfieldConfig;
