pub mod scheduler;
pub mod session;

pub use scheduler::{DebounceScheduler, LatestParse, ParseRequest};
pub use session::QuickAddSession;
