pub mod ghr;
pub mod sources;

pub use ghr::{field_index, FieldSpec, GHR_FIELDS, GHR_RECORD_WIDTH};
pub use sources::{SourceEncoding, SourceSpec, DELIMITED_SOURCES, F02_SOURCE, GHR_SOURCE};
