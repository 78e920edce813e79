//! Codec negotiation strings from AVC decoder configuration records.
//!
//! Record layout (only the head is read):
//!
//! | Offset | Field |
//! |--------|-------|
//! | 0 | configuration version |
//! | 1 | profile indication |
//! | 2 | profile compatibility |
//! | 3 | level indication |

use crate::common::CodecError;

/// Codec family tag placed in front of the hex triple.
pub const AVC_CODEC_PREFIX: &str = "avc1.";

/// Shortest record that still carries profile, compatibility and level.
pub const MIN_RECORD_LEN: usize = 4;

/// A negotiation identifier paired with the record it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecDescriptor<B> {
    codec: String,
    description: B,
}

impl<B: AsRef<[u8]>> CodecDescriptor<B> {
    /// e.g. `avc1.4d401e`.
    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// The original record, untouched.
    pub fn description(&self) -> &B {
        &self.description
    }

    pub fn into_parts(self) -> (String, B) {
        (self.codec, self.description)
    }

    pub fn profile(&self) -> u8 {
        self.description.as_ref()[1]
    }

    pub fn compatibility(&self) -> u8 {
        self.description.as_ref()[2]
    }

    pub fn level(&self) -> u8 {
        self.description.as_ref()[3]
    }

    /// Container MIME type advertising this codec.
    pub fn mime_type(&self) -> String {
        format_mp4_mime(&self.codec)
    }
}

/// Builds the codec descriptor for an AVC configuration record.
///
/// The buffer is moved into the descriptor as-is. Records shorter than
/// [`MIN_RECORD_LEN`] are rejected before any byte is read.
pub fn parse_codec_descriptor<B: AsRef<[u8]>>(config: B) -> Result<CodecDescriptor<B>, CodecError> {
    let bytes = config.as_ref();
    if bytes.len() < MIN_RECORD_LEN {
        return Err(CodecError::Malformed {
            len: bytes.len(),
            required: MIN_RECORD_LEN,
        });
    }

    let codec = format!("{}{}", AVC_CODEC_PREFIX, hex::encode(&bytes[1..MIN_RECORD_LEN]));
    Ok(CodecDescriptor {
        codec,
        description: config,
    })
}

pub fn format_mp4_mime(codec: &str) -> String {
    format!(r#"video/mp4; codecs="{}""#, codec)
}

/// Decodes a hex dump such as `01 4d 40 1e ff`. Whitespace is ignored.
pub fn parse_hex_record(input: &str) -> Result<Vec<u8>, CodecError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    Ok(hex::decode(compact)?)
}
