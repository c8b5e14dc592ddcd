// Exercises module
// Boundary layer: exercise routing, caller parameters, and synthesis errors

pub mod rhythm;

pub use rhythm::RhythmGenerator;

use serde::{Deserialize, Serialize};

use crate::midi::encoder::EncodeError;
use crate::sequencer::note::NoteError;

/// Recognized exercise kinds
///
/// The service layer routes on the string identifier; parsing it here keeps
/// unrecognized kinds out of the core entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseKind {
    Rhythm,
}

impl ExerciseKind {
    /// Parse a kind identifier as used in request paths
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "rhythm" => Some(ExerciseKind::Rhythm),
            _ => None,
        }
    }

    /// The identifier this kind is requested under
    pub fn id(&self) -> &'static str {
        match self {
            ExerciseKind::Rhythm => "rhythm",
        }
    }
}

/// Caller-facing synthesis parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseParams {
    /// Tempo in beats per minute, must be positive (practical range 20-400)
    pub bpm: u32,

    /// Number of preparatory click beats before the generated rhythm
    pub count_in: u32,
}

impl Default for ExerciseParams {
    fn default() -> Self {
        Self {
            bpm: 120,
            count_in: 4,
        }
    }
}

/// Exercise synthesis error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExerciseError {
    #[error("unknown exercise kind: {0:?}")]
    UnknownKind(String),

    #[error("bpm must be positive, got {0}")]
    InvalidBpm(u32),

    /// The placement loop ran out of attempts before reaching the target
    /// note count. Reported instead of silently returning fewer notes: the
    /// requested granularity/measure/target combination may be infeasible.
    #[error("placed only {placed} of {target} notes after {attempts} attempts")]
    GenerationExhausted {
        placed: usize,
        target: usize,
        attempts: u32,
    },

    #[error(transparent)]
    Note(#[from] NoteError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Synthesize one exercise to MIDI file bytes
///
/// Pure and deterministic: identical `(kind, seed, params)` always produce a
/// byte-identical buffer. Parameters are validated here, before any core
/// computation begins.
pub fn generate_exercise(
    kind: &str,
    seed: u64,
    params: &ExerciseParams,
) -> Result<Vec<u8>, ExerciseError> {
    let kind = ExerciseKind::from_id(kind).ok_or_else(|| ExerciseError::UnknownKind(kind.into()))?;
    if params.bpm == 0 {
        return Err(ExerciseError::InvalidBpm(params.bpm));
    }

    match kind {
        ExerciseKind::Rhythm => rhythm::rhythm_exercise(seed, params),
    }
}
