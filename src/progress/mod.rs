pub mod engine;
pub mod struggle;
pub mod types;

pub use engine::{ActivityOutcome, ProgressEngine};
pub use struggle::{StruggleEvent, StruggleEventType, StruggleLog};
pub use types::{ActivityType, TopicProgress, UserProgress};
