//! The host-facing output seam.
//!
//! The pipeline never talks to a display mechanism directly; hosts (notebook
//! bridges, CLIs, tests) inject a [`DisplaySink`] and receive tagged
//! MIME-type → bytes payloads.

use std::collections::BTreeMap;

use crate::error::Result;

/// Source tag attached to every payload this pipeline publishes.
pub const DISPLAY_SOURCE: &str = "tikzmill.render";

pub const PLAIN_TEXT: &str = "text/plain";

/// Resolves the MIME type for an output format. Unrecognized formats fall
/// back to `image/<format>`, so `bmp` becomes `image/bmp`.
pub fn mime_type(format: &str) -> String {
    match format {
        "png" => "image/png".to_string(),
        "svg" => "image/svg+xml".to_string(),
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        other => format!("image/{other}"),
    }
}

/// Rendering hints attached to a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayMetadata {
    /// Ask the host to sandbox the payload, e.g. to keep id and glyph
    /// declarations from clashing when several SVGs share a page.
    pub isolated: bool,
}

/// One unit of output for the host's display mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPayload {
    pub source: &'static str,
    /// MIME type to raw payload bytes.
    pub data: BTreeMap<String, Vec<u8>>,
    pub metadata: Option<DisplayMetadata>,
}

impl DisplayPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::single(PLAIN_TEXT.to_string(), text.into().into_bytes(), None)
    }

    pub fn image(mime: String, bytes: Vec<u8>, metadata: Option<DisplayMetadata>) -> Self {
        Self::single(mime, bytes, metadata)
    }

    fn single(mime: String, bytes: Vec<u8>, metadata: Option<DisplayMetadata>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(mime, bytes);
        Self {
            source: DISPLAY_SOURCE,
            data,
            metadata,
        }
    }

    /// The payload bytes for `mime`, when present.
    pub fn get(&self, mime: &str) -> Option<&[u8]> {
        self.data.get(mime).map(Vec::as_slice)
    }
}

pub trait DisplaySink {
    fn publish(&mut self, payload: DisplayPayload) -> Result<()>;
}

/// Collects payloads in memory, for embedders that want the bytes back and
/// for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub payloads: Vec<DisplayPayload>,
}

impl DisplaySink for MemorySink {
    fn publish(&mut self, payload: DisplayPayload) -> Result<()> {
        self.payloads.push(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_table_covers_supported_formats_and_falls_back() {
        assert_eq!(mime_type("png"), "image/png");
        assert_eq!(mime_type("svg"), "image/svg+xml");
        assert_eq!(mime_type("jpg"), "image/jpeg");
        assert_eq!(mime_type("jpeg"), "image/jpeg");
        assert_eq!(mime_type("bmp"), "image/bmp");
    }

    #[test]
    fn text_payloads_are_tagged_plain_text() {
        let payload = DisplayPayload::text("! error");
        assert_eq!(payload.source, DISPLAY_SOURCE);
        assert_eq!(payload.get(PLAIN_TEXT).expect("text entry"), b"! error");
        assert!(payload.metadata.is_none());
    }
}
