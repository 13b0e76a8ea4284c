pub mod config;
pub mod error;
pub mod input;
pub mod result;
pub mod traits;

pub use config::QuickAddConfig;
pub use error::QuickAddError;
pub use input::InputState;
pub use result::QuickAddResult;
pub use traits::{Clock, FixedClock, SystemClock};
