// MIDI module
// Delta-time encoding and Standard MIDI File assembly

pub mod encoder;
pub mod writer;

pub use encoder::{ChannelStream, EncodeError, TimedSignal, encode_channels};
pub use writer::MidiFile;
