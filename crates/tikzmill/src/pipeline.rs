//! The render pipeline: template, compile, convert, publish.

use std::fs;
use std::path::PathBuf;

use crate::compile::{self, CompilationResult};
use crate::convert;
use crate::display::{DisplayMetadata, DisplayPayload, DisplaySink, mime_type};
use crate::error::Result;
use crate::options::RenderRequest;
use crate::svg;
use crate::template;
use crate::toolchain::ToolchainConfig;

/// Drives one render per [`render`](Renderer::render) call.
///
/// Each request gets its own uniquely named scratch directory, removed on
/// every exit path (error propagation included), so concurrent renders never
/// share intermediate files. The external tools block the calling thread and
/// run without a timeout: a hung tool hangs its request.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    toolchain: ToolchainConfig,
    scratch_root: Option<PathBuf>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toolchain(mut self, toolchain: ToolchainConfig) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Creates scratch directories under `root` instead of the system temp
    /// directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn render(&self, request: &RenderRequest, sink: &mut dyn DisplaySink) -> Result<()> {
        let document = template::build_document(request);
        if request.dry_run {
            sink.publish(DisplayPayload::text(document))?;
            return Ok(());
        }

        let scratch = self.create_scratch()?;

        let compiled =
            compile::compile(&self.toolchain, scratch.path(), &document, &request.encoding)?;
        if let CompilationResult::Failure { log } = compiled {
            // A failure without a log still publishes, as an empty sentinel.
            sink.publish(DisplayPayload::text(log.unwrap_or_default()))?;
            return Ok(());
        }

        convert::convert_output(&self.toolchain, scratch.path(), &request.format);

        let image_path = scratch.path().join(format!("tikz.{}", request.format));
        let bytes = match fs::read(&image_path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(path = %image_path.display(), error = %err, "no image generated");
                return Ok(());
            }
        };

        // The save copy is the on-disk file. For SVG that is the unpatched
        // version, not the size-corrected buffer published below.
        if let Some(save_path) = &request.save_path {
            fs::copy(&image_path, save_path)?;
        }

        let mime = mime_type(&request.format);
        let payload = if request.format == "svg" {
            let patched = svg::patch_svg_size(
                &String::from_utf8_lossy(&bytes),
                Some((request.width, request.height)),
            )?;
            DisplayPayload::image(
                mime,
                patched.into_bytes(),
                Some(DisplayMetadata { isolated: true }),
            )
        } else {
            DisplayPayload::image(mime, bytes, None)
        };
        sink.publish(payload)?;
        Ok(())
    }

    fn create_scratch(&self) -> Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tikz-");
        let dir = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}
