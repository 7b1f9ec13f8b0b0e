pub mod http;
pub mod recording;
pub mod traits;

pub use http::HttpSender;
pub use recording::RecordingSender;
pub use traits::{SendOutcome, TransportSender};
