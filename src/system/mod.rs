pub mod cache;
pub mod collector;
pub mod details;
pub mod history;
pub mod kill;
pub mod platform;
pub mod process;
pub mod source;
pub mod summary;
