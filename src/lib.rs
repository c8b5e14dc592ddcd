// Rhythmlab - Ear-training exercise synthesis
// Turns generated note events into multi-track Standard MIDI File bytes

pub mod exercises;
pub mod midi;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use exercises::{ExerciseError, ExerciseKind, ExerciseParams, generate_exercise};
pub use midi::encoder::{ChannelStream, EncodeError, TimedSignal};
pub use midi::writer::MidiFile;
pub use sequencer::{Instrument, NoteError, NoteEvent, NoteSignal, Timeline, TICKS_PER_QUARTER};
