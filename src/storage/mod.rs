//! Local file storage
//!
//! The only state kept between runs is the OAuth token; it is read and
//! written through these JSON helpers.

pub mod file_io;

pub use file_io::{read_json_optional, read_json_required, write_json_atomic};
