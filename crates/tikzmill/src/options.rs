use std::path::PathBuf;

use crate::error::{Error, Result};

/// Everything one render needs, constructed from parsed invocation options
/// and discarded when the render completes.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Raw TikZ markup, wrapped into a `tikzpicture` environment verbatim
    /// (modulo per-line trimming and re-indentation).
    pub code: String,
    /// Passed through into `[scale=...]` untouched, so TeX-level expressions
    /// keep working.
    pub scale: String,
    pub width: u32,
    pub height: u32,
    /// Target format. `png`, `svg`, `jpg` and `jpeg` are supported; other
    /// values flow through name-based file selection and fail downstream as
    /// "no image generated".
    pub format: String,
    /// Encoding label for writing `tikz.tex`, resolved via WHATWG labels.
    pub encoding: String,
    /// Inserted before `\begin{document}` after stripping one quote layer.
    pub preamble: String,
    pub packages: Vec<String>,
    pub libraries: Vec<String>,
    /// Copy the final on-disk image file here.
    pub save_path: Option<PathBuf>,
    /// Stop after building the document and publish it as plain text.
    pub dry_run: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            code: String::new(),
            scale: "1".to_string(),
            width: 400,
            height: 240,
            format: "png".to_string(),
            encoding: "utf-8".to_string(),
            preamble: String::new(),
            packages: Vec::new(),
            libraries: Vec::new(),
            save_path: None,
            dry_run: false,
        }
    }
}

impl RenderRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Formats produced through the compiler's rasterized PNG output.
    pub fn is_raster(&self) -> bool {
        matches!(self.format.as_str(), "png" | "jpg" | "jpeg")
    }
}

/// Splits a comma-separated option list, trimming items and dropping empty
/// ones. Order is preserved and duplicates are kept: package order is
/// significant to LaTeX.
pub fn split_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a `"width,height"` pair of positive integers.
pub fn parse_size(raw: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidSize {
        value: raw.to_string(),
    };
    let mut it = raw.split(',');
    let (Some(w), Some(h), None) = (it.next(), it.next(), it.next()) else {
        return Err(invalid());
    };
    let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}
