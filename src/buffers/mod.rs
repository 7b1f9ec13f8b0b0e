pub mod batch;
pub mod exchange;

pub use batch::{BatchBuffer, BufferState};
pub use exchange::{batch_exchange, Drained, DrainSide, FillSide, HandOff};
