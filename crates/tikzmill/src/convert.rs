//! Post-compile format conversion inside the scratch directory.

use std::path::Path;
use std::process::Command;

use crate::toolchain::ToolchainConfig;

pub const PDF_FILE: &str = "tikz.pdf";
pub const PNG_FILE: &str = "tikz.png";
pub const SVG_FILE: &str = "tikz.svg";

/// Ensures the scratch directory holds `tikz.<format>` for formats the
/// compiler does not emit directly.
///
/// Converter failures are logged for the operator and otherwise swallowed:
/// the caller's read step will find the file missing and report "no image
/// generated". Compiler failures, in contrast, are surfaced to the user.
pub fn convert_output(toolchain: &ToolchainConfig, scratch: &Path, format: &str) {
    match format {
        "jpg" | "jpeg" => {
            let target = format!("tikz.{format}");
            run_converter(
                &toolchain.raster_convert,
                &[
                    PNG_FILE,
                    "-quality",
                    "100",
                    "-background",
                    "white",
                    "-flatten",
                    target.as_str(),
                ],
                scratch,
            );
        }
        "svg" => run_converter(&toolchain.pdf_to_svg, &[PDF_FILE, SVG_FILE], scratch),
        // `png` is the compiler's native output; unknown formats fall
        // through and fail at the read step.
        _ => {}
    }
}

fn run_converter(command: &str, args: &[&str], scratch: &Path) {
    match Command::new(command).args(args).current_dir(scratch).status() {
        Ok(status) if status.success() => {}
        Ok(status) => {
            tracing::warn!(%command, %status, "converter terminated abnormally");
        }
        Err(err) => {
            tracing::warn!(%command, error = %err, "converter execution failed");
        }
    }
}
