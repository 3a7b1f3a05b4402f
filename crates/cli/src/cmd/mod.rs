mod check;
mod list;
mod plan;
mod why;

pub use check::cmd_check;
pub use list::cmd_list;
pub use plan::cmd_plan;
pub use why::cmd_why;
