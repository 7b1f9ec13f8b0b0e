pub mod adapter;
pub mod format_converter;
pub mod mock;
pub mod traits;
pub mod types;

pub use adapter::{DeviceAdapter, WORD_BITS};
pub use format_converter::{sign_extend, Convention, Converter, PhysicalUnit};
pub use traits::AcquisitionDevice;
pub use types::{ReadyOutcome, ReadyPolicy};
