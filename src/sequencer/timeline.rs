// Timeline - Chronological merge of note signals
// Expands notes into on/off signals and orders them for delta-time encoding

use crate::sequencer::note::NoteEvent;

/// A discrete timeline signal
///
/// Every note contributes exactly two signals: an `On` at its start tick
/// carrying the velocity, and an `Off` at its end tick carrying none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSignal {
    On {
        channel: u8,
        tick: u32,
        pitch: u8,
        velocity: u8,
    },
    Off {
        channel: u8,
        tick: u32,
        pitch: u8,
    },
}

impl NoteSignal {
    /// Absolute tick position of this signal
    pub fn tick(&self) -> u32 {
        match self {
            NoteSignal::On { tick, .. } | NoteSignal::Off { tick, .. } => *tick,
        }
    }

    /// Channel this signal belongs to
    pub fn channel(&self) -> u8 {
        match self {
            NoteSignal::On { channel, .. } | NoteSignal::Off { channel, .. } => *channel,
        }
    }
}

/// Expand a note into its onset/release signal pair
///
/// Pure function; duration validity is guaranteed by `NoteEvent::new`, so the
/// release always lands strictly after the onset.
pub fn expand(note: &NoteEvent) -> (NoteSignal, NoteSignal) {
    debug_assert!(note.duration > 0.0, "expand requires a validated note");

    let channel = note.instrument.channel();
    let on = NoteSignal::On {
        channel,
        tick: note.start_tick(),
        pitch: note.pitch,
        velocity: note.velocity,
    };
    let off = NoteSignal::Off {
        channel,
        tick: note.end_tick(),
        pitch: note.pitch,
    };
    (on, off)
}

/// All signals sharing one tick, sub-partitioned by channel
///
/// Channels appear in first-encounter order; within a channel the signals
/// keep the relative order they were inserted in. There is no natural total
/// order for simultaneous signals on one channel, so insertion order is the
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct TickGroup {
    pub tick: u32,
    pub channels: Vec<(u8, Vec<NoteSignal>)>,
}

impl TickGroup {
    fn new(tick: u32) -> Self {
        Self {
            tick,
            channels: Vec::new(),
        }
    }

    fn push(&mut self, signal: NoteSignal) {
        let channel = signal.channel();
        match self.channels.iter_mut().find(|(c, _)| *c == channel) {
            Some((_, signals)) => signals.push(signal),
            None => self.channels.push((channel, vec![signal])),
        }
    }
}

/// The full ordered multiset of signals across all channels
///
/// Groups are strictly ascending in tick; each channel's own signal sequence
/// read across groups is therefore non-decreasing in tick, which is what
/// makes per-channel delta encoding well-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    groups: Vec<TickGroup>,
}

impl Timeline {
    /// Merge signals into chronological tick groups
    ///
    /// Stable sort by tick (ties preserve insertion order), partition into
    /// groups of identical tick, then sub-partition each group by channel
    /// while preserving relative order.
    pub fn merge(mut signals: Vec<NoteSignal>) -> Self {
        signals.sort_by_key(|s| s.tick());

        let mut groups: Vec<TickGroup> = Vec::new();
        for signal in signals {
            match groups.last_mut() {
                Some(group) if group.tick == signal.tick() => group.push(signal),
                _ => {
                    let mut group = TickGroup::new(signal.tick());
                    group.push(signal);
                    groups.push(group);
                }
            }
        }

        Self { groups }
    }

    /// Ordered tick groups
    pub fn groups(&self) -> &[TickGroup] {
        &self.groups
    }

    /// Total number of signals across all groups
    pub fn signal_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.channels.iter())
            .map(|(_, signals)| signals.len())
            .sum()
    }
}
