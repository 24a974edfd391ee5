pub mod args;
pub mod drivers;
pub mod report;
pub mod session;
