//! MariaDB persistence: the `graph` series table and the single-row `stat` table.

pub mod schema;
mod store;

pub use store::{Store, StoreError};

#[cfg(test)]
pub(crate) use store::tests::sqlite_store;
