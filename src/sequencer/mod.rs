// Sequencer module
// Note modeling and timeline construction for exercise synthesis

pub mod note;
pub mod timeline;

pub use note::{Instrument, NoteError, NoteEvent, NoteKey, TICKS_PER_QUARTER};
pub use timeline::{NoteSignal, TickGroup, Timeline};
