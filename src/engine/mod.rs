pub mod acquisition;
pub mod assembler;
pub mod bridge;
pub mod clock;
pub mod state;

pub use acquisition::AcquisitionLoop;
pub use assembler::PacketAssembler;
pub use bridge::Bridge;
pub use clock::{Clock, FixedClock, SystemClock};
pub use state::{BridgeStatus, LoopExit};
