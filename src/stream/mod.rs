//! Reply stream decoding.

pub mod decoder;
pub mod utf8;

pub use decoder::{collect_reply, decode, FragmentStream};
pub use utf8::Utf8Reassembler;
