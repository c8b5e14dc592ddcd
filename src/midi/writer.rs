// MIDI file writer - Standard MIDI File (SMF) assembly
// Serializes per-channel delta-time streams into a multi-track container

use crate::midi::encoder::{ChannelStream, EncodeError, encode_channels};
use crate::sequencer::note::{Instrument, NoteEvent, TICKS_PER_QUARTER};
use crate::sequencer::timeline::{NoteSignal, Timeline, expand};

/// SMF format 1: multiple simultaneous tracks
const FORMAT_MULTI_TRACK: u16 = 1;

/// Program selected on the percussion channel before any note message
const PERCUSSION_PROGRAM: u8 = 115;

/// Wire velocity carried by note-off messages (the release itself has none)
const NOTE_OFF_VELOCITY: u8 = 64;

/// A complete MIDI file: tempo plus the notes of every channel
///
/// Transient value assembled once per synthesis call; `to_bytes` runs the
/// whole expand/merge/encode/assemble pipeline and returns the container
/// bytes. Nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiFile {
    pub bpm: u32,
    pub notes: Vec<NoteEvent>,
}

impl MidiFile {
    /// Create a new file description
    pub fn new(bpm: u32, notes: Vec<NoteEvent>) -> Self {
        assert!(bpm > 0, "BPM must be positive");
        Self { bpm, notes }
    }

    /// Serialize to Standard MIDI File bytes
    ///
    /// Onsets for all notes are queued ahead of all releases so that a
    /// release colliding with another note's onset on the same tick sorts
    /// after it, matching the renderer's expectations.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let pairs: Vec<(NoteSignal, NoteSignal)> = self.notes.iter().map(expand).collect();
        let mut signals: Vec<NoteSignal> = Vec::with_capacity(pairs.len() * 2);
        signals.extend(pairs.iter().map(|p| p.0));
        signals.extend(pairs.iter().map(|p| p.1));

        let timeline = Timeline::merge(signals);
        let streams = encode_channels(&timeline)?;
        Ok(assemble(self.bpm, &streams))
    }
}

/// Assemble encoded channel streams into the final byte buffer
///
/// Layout: one `MThd` header declaring the multi-track format and tick
/// resolution, then one `MTrk` chunk per channel. Each track starts with a
/// set-tempo meta message; the percussion track additionally selects its
/// program before any note message. Tracks are serialized independently and
/// concatenated, so each channel owns a contiguous byte region.
pub fn assemble(bpm: u32, streams: &[ChannelStream]) -> Vec<u8> {
    assert!(bpm > 0, "BPM must be positive");

    let mut buf = Vec::new();
    buf.extend(b"MThd");
    buf.extend(6u32.to_be_bytes()); // header chunk length
    buf.extend(FORMAT_MULTI_TRACK.to_be_bytes());
    buf.extend((streams.len() as u16).to_be_bytes());
    buf.extend((TICKS_PER_QUARTER as u16).to_be_bytes());

    for stream in streams {
        let body = track_body(bpm, stream);
        buf.extend(b"MTrk");
        buf.extend((body.len() as u32).to_be_bytes());
        buf.extend(body);
    }

    buf
}

/// Serialize one channel's sub-stream
fn track_body(bpm: u32, stream: &ChannelStream) -> Vec<u8> {
    let mut body = Vec::new();

    // Tempo: microseconds per quarter note, 3 bytes big-endian
    let tempo = 60_000_000 / bpm;
    push_var_len(&mut body, 0);
    body.extend([0xff, 0x51, 0x03]);
    body.extend(&tempo.to_be_bytes()[1..]);

    if stream.channel == Instrument::Drums.channel() {
        push_var_len(&mut body, 0);
        body.push(0xc0 | stream.channel);
        body.push(PERCUSSION_PROGRAM);
    }

    for message in &stream.messages {
        push_var_len(&mut body, message.delta);
        match message.signal {
            NoteSignal::On {
                channel,
                pitch,
                velocity,
                ..
            } => {
                body.push(0x90 | channel);
                body.push(pitch);
                body.push(velocity);
            }
            NoteSignal::Off { channel, pitch, .. } => {
                body.push(0x80 | channel);
                body.push(pitch);
                body.push(NOTE_OFF_VELOCITY);
            }
        }
    }

    // End of track
    push_var_len(&mut body, 0);
    body.extend([0xff, 0x2f, 0x00]);

    body
}

/// Append a variable-length quantity (7 bits per byte, MSB-first,
/// continuation bit on every byte but the last)
fn push_var_len(buf: &mut Vec<u8>, value: u32) {
    debug_assert!(value < 1 << 28);

    let mut shift = 21;
    while shift > 0 {
        if value >> shift != 0 {
            buf.push((value >> shift) as u8 & 0x7f | 0x80);
        }
        shift -= 7;
    }
    buf.push(value as u8 & 0x7f);
}
