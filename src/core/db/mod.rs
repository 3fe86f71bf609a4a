/// Database Module
///
/// The database layer is split into two concerns:
/// - **Connection Management** (`connection.rs`): opens the single
///   connection, drives it, and guarantees exactly-once release.
/// - **Query Execution** (`query.rs`): runs opaque query strings with bound
///   parameters and projects rows into JSON.
///
/// All operations use the crate-wide `PgqError` for error propagation.
pub mod connection;
pub mod query;

pub use connection::*;
pub use query::*;
