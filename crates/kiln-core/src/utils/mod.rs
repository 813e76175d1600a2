//! Small helpers shared by the plugin sources, the loader and the dependency
//! model.
pub mod fs;
pub mod panic;

pub use fs::{find_executable, list_candidate_dirs};
pub use panic::{catch_panic, panic_message};

#[cfg(test)]
mod tests;
