pub mod check_cmd;
pub mod query_cmd;

pub use check_cmd::{cmd_check, CheckArgs};
pub use query_cmd::cmd_query;
