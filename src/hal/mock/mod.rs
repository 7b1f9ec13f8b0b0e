pub mod adc;
pub mod scripted;

pub use adc::SimulatedAdc;
pub use scripted::{ScriptedAdc, SelectionLog};
