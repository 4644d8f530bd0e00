//! Services at the edges of a session: data URL encoding and the
//! upload/download file boundaries.

pub mod encoding;
pub mod io;

pub use encoding::{decode_base64, encode_base64, DataUrl, RESULT_MIME_TYPE};
pub use io::{ImageIOService, DOWNLOAD_FILE_NAME, FALLBACK_MIME_TYPE};
