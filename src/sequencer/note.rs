// Note representation for exercise synthesis
// A note is an abstract event with pitch, velocity, start, duration, and instrument

use serde::{Deserialize, Serialize};

/// Ticks per quarter note (PPQN - Pulses Per Quarter Note)
/// Resolution of the encoded timeline
pub const TICKS_PER_QUARTER: u32 = 64;

/// Instrument a note is played on
///
/// Each instrument owns one channel in the encoded file and maps to a
/// sound font resource consumed by the external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Drums,
    Piano,
}

impl Instrument {
    /// All instruments, in channel order
    pub const ALL: [Instrument; 2] = [Instrument::Drums, Instrument::Piano];

    /// Channel number carried by this instrument's messages
    pub fn channel(&self) -> u8 {
        match self {
            Instrument::Drums => 0,
            Instrument::Piano => 1,
        }
    }

    /// Sound font resource name used by the renderer for this channel
    pub fn sound_font(&self) -> &'static str {
        match self {
            Instrument::Drums => "Drums.sf2",
            Instrument::Piano => "Piano.sf2",
        }
    }
}

/// Note construction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoteError {
    #[error("note duration must be positive, got {0}")]
    InvalidDuration(f64),
}

/// Composite identity key for a note
///
/// Two notes are the same event for deduplication and membership purposes
/// when they share pitch and start tick. Never rely on full structural
/// equality for that question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteKey {
    pub pitch: u8,
    pub start_tick: u32,
}

/// A musical note event
///
/// Time is expressed in quarter notes; `start` is measured from the beginning
/// of the exercise. Values are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI note number (0-127, where 60 = C4)
    pub pitch: u8,

    /// MIDI velocity (0-127, where 127 = maximum)
    pub velocity: u8,

    /// Start time in quarter notes from the beginning
    pub start: f64,

    /// Duration in quarter notes, always > 0
    pub duration: f64,

    /// Instrument (and therefore channel) this note plays on
    pub instrument: Instrument,
}

impl NoteEvent {
    /// Creates a new note event
    ///
    /// Rejects non-positive durations: the rest of the pipeline assumes
    /// every note's release lands strictly after its onset.
    pub fn new(
        pitch: u8,
        velocity: u8,
        start: f64,
        duration: f64,
        instrument: Instrument,
    ) -> Result<Self, NoteError> {
        debug_assert!(pitch <= 127, "MIDI pitch must be 0-127");
        debug_assert!(velocity <= 127, "MIDI velocity must be 0-127");

        if duration <= 0.0 {
            return Err(NoteError::InvalidDuration(duration));
        }

        Ok(Self {
            pitch,
            velocity,
            start,
            duration,
            instrument,
        })
    }

    /// Tick position of the note onset
    pub fn start_tick(&self) -> u32 {
        (self.start * TICKS_PER_QUARTER as f64) as u32
    }

    /// Tick position of the note release
    /// Strictly greater than `start_tick` for any valid note
    pub fn end_tick(&self) -> u32 {
        ((self.start + self.duration) * TICKS_PER_QUARTER as f64) as u32
    }

    /// Identity key for deduplication and membership checks
    pub fn key(&self) -> NoteKey {
        NoteKey {
            pitch: self.pitch,
            start_tick: self.start_tick(),
        }
    }
}
