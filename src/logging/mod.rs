mod format;

pub use format::{OutputRecord, StructuredLogger};
