//! src/services/multipart.rs
//!
//! multipart/form-data extraction on top of `multer`. Payloads are kept as
//! raw bytes so binary uploads survive untouched; parts declared as
//! `Content-Transfer-Encoding: base64` are decoded after reading. Segments
//! that cannot be turned into a part are returned as [`SkippedSegment`]
//! diagnostics rather than being dropped silently.

use crate::models::upload::{SkipReason, SkippedSegment, UploadedPart};
use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use futures::stream;
use multer::{Field, Multipart};
use std::convert::Infallible;
use thiserror::Error;
use tracing::debug;

const TRANSFER_ENCODING: &str = "content-transfer-encoding";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("no multipart boundary found in content type")]
    MissingBoundary,
}

/// Result of reading one multipart body.
#[derive(Debug, Default)]
pub struct MultipartBody {
    /// Parts in body order. Field names are not de-duplicated.
    pub parts: Vec<UploadedPart>,
    pub skipped: Vec<SkippedSegment>,
}

impl MultipartBody {
    /// Take the first part with the given field name.
    pub fn take_part(&mut self, field_name: &str) -> Option<UploadedPart> {
        let idx = self
            .parts
            .iter()
            .position(|part| part.field_name == field_name)?;
        Some(self.parts.remove(idx))
    }
}

/// Read the `boundary` parameter from a `multipart/form-data` content type header.
pub fn boundary_from_content_type(header: Option<&str>) -> Result<String, MultipartError> {
    let header = header.ok_or(MultipartError::MissingBoundary)?;
    multer::parse_boundary(header)
        .ok()
        .filter(|boundary| !boundary.is_empty())
        .ok_or(MultipartError::MissingBoundary)
}

/// Read every part of `body`, in order.
///
/// A part without a field name or with an undecodable base64 payload is
/// skipped and reading continues. A framing error (bad headers, missing
/// delimiter) ends the scan; parts read before it are kept.
pub async fn extract_parts(body: Bytes, boundary: &str) -> MultipartBody {
    let source = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = Multipart::new(source, boundary);
    let mut out = MultipartBody::default();
    let mut index = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                out.skip(index, &err);
                break;
            }
        };

        let header = PartHeader::of(&field);
        let raw = match field.bytes().await {
            Ok(raw) => raw,
            Err(err) => {
                out.skip(index, &err);
                break;
            }
        };

        match header.into_part(raw) {
            Ok(part) => out.parts.push(part),
            Err(reason) => out.skipped.push(SkippedSegment { index, reason }),
        }
        index += 1;
    }

    out
}

impl MultipartBody {
    fn skip(&mut self, index: usize, err: &multer::Error) {
        debug!(segment = index, error = %err, "Multipart framing error");
        self.skipped.push(SkippedSegment {
            index,
            reason: skip_reason(err),
        });
    }
}

fn skip_reason(err: &multer::Error) -> SkipReason {
    match err {
        multer::Error::IncompleteStream | multer::Error::IncompleteFieldData { .. } => {
            SkipReason::Unterminated
        }
        multer::Error::IncompleteHeaders
        | multer::Error::ReadHeaderFailed(..)
        | multer::Error::DecodeHeaderName { .. }
        | multer::Error::DecodeHeaderValue { .. }
        | multer::Error::DecodeContentType(..) => SkipReason::MalformedHeaders,
        _ => SkipReason::Malformed,
    }
}

/// Metadata captured from a part's headers before its payload is consumed.
struct PartHeader {
    field_name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    base64_encoded: bool,
}

impl PartHeader {
    fn of(field: &Field<'_>) -> Self {
        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

        Self {
            field_name: non_empty(field.name()),
            file_name: non_empty(field.file_name()),
            content_type: field.content_type().map(ToString::to_string),
            base64_encoded: field
                .headers()
                .get(TRANSFER_ENCODING)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("base64")),
        }
    }

    fn into_part(self, raw: Bytes) -> Result<UploadedPart, SkipReason> {
        let field_name = self.field_name.ok_or(SkipReason::MissingFieldName)?;
        let payload = if self.base64_encoded {
            decode_base64(&raw)?
        } else {
            raw
        };

        Ok(UploadedPart {
            field_name,
            file_name: self.file_name,
            content_type: self.content_type,
            payload,
        })
    }
}

/// Decode a base64 payload, ignoring the line breaks MIME encoders insert.
fn decode_base64(raw: &[u8]) -> Result<Bytes, SkipReason> {
    let compact: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    general_purpose::STANDARD
        .decode(compact)
        .map(Bytes::from)
        .map_err(|_| SkipReason::InvalidBase64)
}
