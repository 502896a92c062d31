pub mod audio_io;
pub mod carver;
pub mod config;
pub mod freehand;
pub mod history;
pub mod markers;
pub mod pyramid;
pub mod selection;
pub mod surface;
mod trace;
pub mod wave;

pub use carver::WaveCarver;
pub use config::CarverConfig;
pub use freehand::{PointerEvent, PointerKind, StrokeOutcome};
pub use selection::{DragEdge, Selection, SnapDirection};
