//! Custom option extension access

use prost::bytes::Buf;
use prost::encoding::{DecodeContext, WireType, decode_key, decode_varint, skip_field};

use crate::codec::CodecError;

/// Field number shared by `(tagger.tags)` on fields and
/// `(tagger.oneof_tags)` on oneofs
pub const TAGS_EXTENSION: u32 = 847939;

/// Read a string extension from encoded options
///
/// Returns `None` when the extension is not set. When it occurs more than
/// once the last occurrence wins, as for any singular protobuf field.
pub fn extension_string(options: &[u8], field_number: u32) -> Result<Option<String>, CodecError> {
    let mut buf = options;
    let mut value = None;

    while buf.has_remaining() {
        let (tag, wire_type) = decode_key(&mut buf).map_err(malformed)?;
        if tag != field_number {
            skip_field(wire_type, tag, &mut buf, DecodeContext::default()).map_err(malformed)?;
            continue;
        }
        if wire_type != WireType::LengthDelimited {
            return Err(CodecError::InvalidExtension(format!(
                "extension {field_number} has wire type {wire_type:?}, expected a string"
            )));
        }

        let len = usize::try_from(decode_varint(&mut buf).map_err(malformed)?)
            .map_err(|_| CodecError::InvalidExtension("extension length overflows".to_string()))?;
        if len > buf.remaining() {
            return Err(CodecError::InvalidExtension(format!(
                "extension {field_number} is truncated"
            )));
        }
        let (bytes, rest) = buf.split_at(len);
        buf = rest;
        value = Some(String::from_utf8(bytes.to_vec()).map_err(|_| {
            CodecError::InvalidExtension(format!("extension {field_number} is not valid UTF-8"))
        })?);
    }

    Ok(value)
}

fn malformed(err: prost::DecodeError) -> CodecError {
    CodecError::InvalidExtension(format!("malformed options: {err}"))
}
