pub mod serialization;

pub use serialization::{BoardSnapshot, ColumnSnapshot, SnapshotError};
