//! Represents a single part extracted from a multipart/form-data body.

use bytes::Bytes;
use std::fmt;

/// One named field (and optional file) taken from a multipart body.
///
/// The payload always holds decoded bytes. Parts are produced by the
/// multipart extractor in body order and consumed once by the
/// transcription gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedPart {
    /// Value of the `name` parameter of `Content-Disposition`.
    pub field_name: String,

    /// Value of the `filename` parameter, when the part carries a file.
    pub file_name: Option<String>,

    /// Declared media type of the part (e.g. `video/mp4`).
    pub content_type: Option<String>,

    /// Decoded payload bytes.
    pub payload: Bytes,
}

impl UploadedPart {
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Why a segment of a multipart body did not yield a part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Part headers could not be read (bad header line, no blank line after them).
    MalformedHeaders,
    /// `Content-Disposition` absent or without a `name` parameter.
    MissingFieldName,
    /// Declared `Content-Transfer-Encoding: base64` but payload did not decode.
    InvalidBase64,
    /// Segment never closed by a following delimiter.
    Unterminated,
    /// Any other framing error reported by the parser.
    Malformed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MalformedHeaders => "part headers could not be read",
            SkipReason::MissingFieldName => "part has no field name",
            SkipReason::InvalidBase64 => "part payload is not valid base64",
            SkipReason::Unterminated => "part is not closed by a boundary delimiter",
            SkipReason::Malformed => "multipart framing is malformed",
        };
        f.write_str(text)
    }
}

/// A segment of the body that could not be turned into a part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSegment {
    /// Zero-based position of the segment among all segments of the body.
    pub index: usize,
    pub reason: SkipReason,
}
