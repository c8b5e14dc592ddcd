// Rhythm exercise - Seeded placement of non-overlapping notes
// Rejection sampling on a discrete grid inside one measure, plus a fixed
// count-in click prefix

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::exercises::{ExerciseError, ExerciseParams};
use crate::midi::writer::MidiFile;
use crate::sequencer::note::{Instrument, NoteError, NoteEvent};

/// Quarter notes per measure
const BEATS_PER_MEASURE: u32 = 4;

/// Count-in click: pitch, velocity, duration in quarter notes
const CLICK_PITCH: u8 = 36;
const CLICK_VELOCITY: u8 = 90;
const CLICK_DURATION: f64 = 0.5;

/// Velocity of generated rhythm notes
const NOTE_VELOCITY: u8 = 120;

/// Candidate draws before the placement loop gives up
///
/// The granularity/measure/target combination can be mathematically
/// infeasible, so the retry loop must be bounded.
const MAX_PLACEMENT_ATTEMPTS: u32 = 1024;

/// Seeded rhythm pattern generator
///
/// Places `note_count` non-overlapping notes on a `granularity`-spaced grid
/// within `measures` measures. Identical seeds always yield identical
/// placements, which is what makes caching and reproducible fixtures work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhythmGenerator {
    /// Number of measures the placements must fit in
    pub measures: u32,

    /// Number of notes to place
    pub note_count: usize,

    /// Grid spacing in quarter notes
    pub granularity: f64,

    /// Pitch of the generated notes
    pub pitch: u8,
}

impl Default for RhythmGenerator {
    fn default() -> Self {
        Self {
            measures: 1,
            note_count: 4,
            granularity: 0.5,
            pitch: 66,
        }
    }
}

impl RhythmGenerator {
    /// Generate the placed notes, shifted right by `offset` quarter notes
    ///
    /// Rejection sampling: draw a grid-aligned candidate interval, reject it
    /// when it overlaps an accepted interval or runs past the measure bound,
    /// repeat until `note_count` notes are accepted. Bounded by
    /// `MAX_PLACEMENT_ATTEMPTS`; exhaustion is an error, never a short count.
    pub fn generate(&self, seed: u64, offset: f64) -> Result<Vec<NoteEvent>, ExerciseError> {
        assert!(self.granularity > 0.0, "granularity must be positive");
        assert!(self.measures > 0, "measure count must be positive");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let measure_end = (self.measures * BEATS_PER_MEASURE) as f64;
        let grid_slots = (measure_end / self.granularity) as u32;
        let max_steps = (1.0 / self.granularity) as u32;

        let mut placed: Vec<(f64, f64)> = Vec::with_capacity(self.note_count);
        let mut attempts = 0;

        while placed.len() < self.note_count {
            if attempts == MAX_PLACEMENT_ATTEMPTS {
                return Err(ExerciseError::GenerationExhausted {
                    placed: placed.len(),
                    target: self.note_count,
                    attempts,
                });
            }
            attempts += 1;

            let start = rng.gen_range(0..grid_slots) as f64 * self.granularity;
            let end = start + rng.gen_range(1..=max_steps) as f64 * self.granularity;

            if end > measure_end {
                continue;
            }
            // Interval intersection against every accepted placement
            if placed.iter().any(|&(s, e)| start < e && end > s) {
                continue;
            }

            placed.push((start, end));
        }

        placed
            .into_iter()
            .map(|(start, end)| {
                NoteEvent::new(
                    self.pitch,
                    NOTE_VELOCITY,
                    start + offset,
                    end - start,
                    Instrument::Piano,
                )
            })
            .collect::<Result<Vec<_>, NoteError>>()
            .map_err(Into::into)
    }
}

/// Fixed preparatory click sequence, one drum hit per beat
///
/// Not subject to random placement; always precedes the generated rhythm.
pub fn click_track(count_in: u32) -> Result<Vec<NoteEvent>, NoteError> {
    (0..count_in)
        .map(|beat| {
            NoteEvent::new(
                CLICK_PITCH,
                CLICK_VELOCITY,
                beat as f64,
                CLICK_DURATION,
                Instrument::Drums,
            )
        })
        .collect()
}

/// Synthesize a complete rhythm exercise to MIDI file bytes
pub fn rhythm_exercise(seed: u64, params: &ExerciseParams) -> Result<Vec<u8>, ExerciseError> {
    let mut notes = click_track(params.count_in)?;
    notes.extend(RhythmGenerator::default().generate(seed, params.count_in as f64)?);

    let file = MidiFile::new(params.bpm, notes);
    Ok(file.to_bytes()?)
}
