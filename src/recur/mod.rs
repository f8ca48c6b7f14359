pub mod dates;
pub mod parser;
pub mod schedule;

pub use parser::{parse_recur, RecurError, RecurRule, RecurSpec};
pub use schedule::resolve;
