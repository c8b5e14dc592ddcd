// Track encoder - Absolute ticks to per-channel delta times
// Each channel carries its own cursor; deltas are relative to the previous
// message on the same channel only

use crate::sequencer::note::Instrument;
use crate::sequencer::timeline::{NoteSignal, Timeline};

/// Encoding error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// A signal's tick fell behind its channel cursor. The timeline merge
    /// guarantees non-decreasing per-channel ticks, so this is an internal
    /// invariant violation, never a user-input condition.
    #[error("delta time underflow on channel {channel}: tick {tick} precedes cursor {cursor}")]
    NegativeDelta { channel: u8, tick: u32, cursor: u32 },
}

/// A signal paired with its delta time, ready for wire serialization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSignal {
    /// Ticks since the previous message on the same channel
    /// (for the first message, since tick 0)
    pub delta: u32,
    pub signal: NoteSignal,
}

/// Ordered wire messages for one channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStream {
    pub channel: u8,
    pub messages: Vec<TimedSignal>,
}

impl ChannelStream {
    fn new(channel: u8) -> Self {
        Self {
            channel,
            messages: Vec::new(),
        }
    }
}

/// Encode a timeline into per-channel delta-time streams
///
/// One stream per instrument channel, present even when empty so the file
/// assembler always emits the full track set. Walks tick groups in order,
/// maintaining an independent cursor per channel.
pub fn encode_channels(timeline: &Timeline) -> Result<Vec<ChannelStream>, EncodeError> {
    let mut streams: Vec<ChannelStream> = Instrument::ALL
        .iter()
        .map(|i| ChannelStream::new(i.channel()))
        .collect();
    let mut cursors = vec![0u32; streams.len()];

    for group in timeline.groups() {
        for (channel, signals) in &group.channels {
            let index = streams
                .iter()
                .position(|s| s.channel == *channel)
                .unwrap_or_else(|| panic!("signal on unmapped channel {channel}"));

            let cursor = cursors[index];
            if group.tick < cursor {
                return Err(EncodeError::NegativeDelta {
                    channel: *channel,
                    tick: group.tick,
                    cursor,
                });
            }

            // First signal in the group pays the full gap from the cursor;
            // the rest of the group shares its tick, so their deltas are 0.
            let mut delta = group.tick - cursor;
            for signal in signals {
                streams[index].messages.push(TimedSignal {
                    delta,
                    signal: *signal,
                });
                delta = 0;
            }
            cursors[index] = group.tick;
        }
    }

    Ok(streams)
}
