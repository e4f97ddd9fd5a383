//! Mock filesystem and canned `/proc` states for tests.

mod filesystem;
#[cfg(test)]
pub(crate) mod scenarios;

pub use filesystem::MockFs;
