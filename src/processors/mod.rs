pub mod record_merger;

pub use record_merger::{coordinate_key, MergeSummary, RecordMerger};
