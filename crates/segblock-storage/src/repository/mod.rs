//! Database repositories for each table.

pub mod records;

pub use records::RecordRepo;
