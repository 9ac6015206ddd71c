//! Flat setfile codec
//!
//! - `naming`: flat-key templates shared by encoder, importer and parity checks
//! - `encoder`: document → ordered `key=value` entries
//! - `decoder`: setfile bytes → key/value map (last write wins)
//! - `importer`: key/value map → document
//! - `encoding`: UTF-8 / UTF-16LE handling and atomic writes

mod checksum;
mod decoder;
mod encoder;
mod encoding;
mod errors;
mod importer;
mod naming;
mod value;

pub use checksum::Checksum;
pub use decoder::{decode_setfile, parse_setfile, read_setfile, DecodedSetfile};
pub use encoder::{encode_document, encode_field, render_setfile, FlatEntry};
pub use encoding::{decode_bytes, encode_text, write_setfile, TextEncoding, WriteSummary};
pub use errors::{SetfileError, SetfileResult};
pub use importer::{detect_group_count, import_document, ImportOptions};
pub use naming::{
    engine_key, engine_level_keys, expected_keys, group_key, group_level_keys, logic_key, logic_short, logic_suffix,
};
pub use value::FlatValue;
