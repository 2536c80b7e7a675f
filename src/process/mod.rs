pub mod delimited;
pub mod encoding;
pub mod fixed_width;

pub use delimited::parse_rows;
pub use encoding::{decode_bytes, decode_file, EncodingError};
pub use fixed_width::{decode_fields, encode_line};
