use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Names of the external commands the pipeline drives.
///
/// Defaults match a conventional TeX Live + pdf2svg + ImageMagick install;
/// deployments point them at alternates (and tests at stubs).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// LaTeX compiler, invoked as `<latex> --shell-escape tikz.tex`.
    pub latex: String,
    /// PDF-to-SVG converter, invoked as `<pdf_to_svg> tikz.pdf tikz.svg`.
    pub pdf_to_svg: String,
    /// Raster converter, invoked as
    /// `<raster_convert> tikz.png -quality 100 -background white -flatten tikz.<jpg|jpeg>`.
    pub raster_convert: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            latex: "pdflatex".to_string(),
            pdf_to_svg: "pdf2svg".to_string(),
            raster_convert: "convert".to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Loads overrides from a JSON file. Missing fields keep their defaults;
    /// unknown fields are rejected.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| Error::ToolchainConfig {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_name_the_conventional_tools() {
        let config = ToolchainConfig::default();
        assert_eq!(config.latex, "pdflatex");
        assert_eq!(config.pdf_to_svg, "pdf2svg");
        assert_eq!(config.raster_convert, "convert");
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("toolchain.json");
        std::fs::write(&path, r#"{"latex": "lualatex"}"#).expect("write config");

        let config = ToolchainConfig::from_json_file(&path).expect("load config");
        assert_eq!(config.latex, "lualatex");
        assert_eq!(config.pdf_to_svg, "pdf2svg");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("toolchain.json");
        std::fs::write(&path, r#"{"latx": "typo"}"#).expect("write config");

        let err = ToolchainConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::ToolchainConfig { .. }));
    }
}
