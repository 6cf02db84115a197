//! Writes the document into the scratch directory and runs the LaTeX
//! compiler there.
//!
//! The compiler runs with the scratch directory as its working directory
//! (passed explicitly per invocation, the process cwd is never touched) and
//! with shell escape enabled: the `convert={...}` document class option
//! relies on it to produce `tikz.png` next to `tikz.pdf`.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::toolchain::ToolchainConfig;

pub const TEX_FILE: &str = "tikz.tex";
pub const LOG_FILE: &str = "tikz.log";

#[cfg(unix)]
const PATH_LIST_SEP: &str = ":";
#[cfg(windows)]
const PATH_LIST_SEP: &str = ";";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationResult {
    Success,
    /// `log: None` means no log file was written, which is distinct from a
    /// log that was read and is empty.
    Failure { log: Option<String> },
}

pub fn compile(
    toolchain: &ToolchainConfig,
    scratch: &Path,
    document: &str,
    encoding: &str,
) -> Result<CompilationResult> {
    write_document(scratch, document, encoding)?;

    let caller_dir = std::env::current_dir()?;
    let texinputs = texinputs_value(&caller_dir, std::env::var_os("TEXINPUTS").as_deref());

    let status = Command::new(&toolchain.latex)
        .args(["--shell-escape", TEX_FILE])
        .current_dir(scratch)
        .env("TEXINPUTS", texinputs)
        .status();

    match status {
        Ok(status) if status.success() => Ok(CompilationResult::Success),
        Ok(status) => {
            tracing::error!(command = %toolchain.latex, %status, "LaTeX terminated abnormally");
            Ok(CompilationResult::Failure {
                log: read_log(scratch),
            })
        }
        Err(err) => {
            tracing::error!(command = %toolchain.latex, error = %err, "LaTeX execution failed");
            Ok(CompilationResult::Failure {
                log: read_log(scratch),
            })
        }
    }
}

fn write_document(scratch: &Path, document: &str, encoding: &str) -> Result<()> {
    let Some(enc) = encoding_rs::Encoding::for_label(encoding.as_bytes()) else {
        return Err(Error::UnknownEncoding {
            label: encoding.to_string(),
        });
    };
    let (bytes, _, _) = enc.encode(document);
    std::fs::write(scratch.join(TEX_FILE), bytes)?;
    Ok(())
}

/// Builds the `TEXINPUTS` value so user code can reference files relative to
/// the invoking process's working directory. When the variable is unset, the
/// trailing empty segment keeps the system default search path reachable.
fn texinputs_value(caller_dir: &Path, existing: Option<&OsStr>) -> OsString {
    let mut value = OsString::new();
    match existing {
        Some(current) => {
            value.push(caller_dir);
            value.push(PATH_LIST_SEP);
            value.push(current);
        }
        None => {
            value.push(".");
            value.push(PATH_LIST_SEP);
            value.push(caller_dir);
            value.push(PATH_LIST_SEP);
            value.push(PATH_LIST_SEP);
        }
    }
    value
}

/// Reads `tikz.log` with the fixed latin-1 fallback; TeX logs are not
/// reliably UTF-8.
fn read_log(scratch: &Path) -> Option<String> {
    match std::fs::read(scratch.join(LOG_FILE)) {
        Ok(bytes) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Some(text.into_owned())
        }
        Err(_) => {
            tracing::error!("no LaTeX log file generated");
            None
        }
    }
}
