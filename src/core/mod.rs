pub mod channel;
pub mod packet;
pub mod sample;

pub use channel::{Channel, ChannelSet};
pub use packet::{ChannelSeries, Packet, Point, TimestampFormat};
pub use sample::RawSample;
