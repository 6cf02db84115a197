//! Builds the LaTeX document compiled for one render.
//!
//! The `standalone` document class does the heavy lifting: its
//! `convert={...}` option rasterizes the PDF into `tikz.png` during the
//! compile (which is why the compiler runs with shell escape), so this module
//! is pure string assembly.

use crate::options::RenderRequest;

/// Produces the complete LaTeX source for a request. Deterministic, no I/O.
pub fn build_document(request: &RenderRequest) -> String {
    // Raster targets get a rasterization density hint; vector output does not.
    let density = if request.is_raster() { "density=300," } else { "" };

    let mut doc = String::new();
    doc.push_str(&format!(
        "\\documentclass[convert={{{density}size={}x{},outext=.png}},border=0pt]{{standalone}}\n",
        request.width, request.height
    ));
    doc.push_str("\\usepackage{tikz}\n");

    // One line per package, caller order, no deduplication: later packages may
    // depend on earlier ones.
    for package in &request.packages {
        doc.push_str(&format!("\\usepackage{{{package}}}\n"));
    }

    // Always exactly one library line, even with an empty argument list.
    doc.push_str(&format!(
        "\\usetikzlibrary{{{}}}\n",
        request.libraries.join(",")
    ));

    let preamble = strip_one_quote_layer(&request.preamble);
    if !preamble.is_empty() {
        doc.push_str(preamble);
        doc.push('\n');
    }

    doc.push_str("\\begin{document}\n");
    doc.push_str(&format!(
        "\\begin{{tikzpicture}}[scale={}]\n",
        request.scale
    ));
    for line in request.code.lines() {
        doc.push_str("    ");
        doc.push_str(line.trim());
        doc.push('\n');
    }
    doc.push_str("\\end{tikzpicture}\n\\end{document}\n");
    doc
}

/// Strips at most one leading and one trailing quote character (`'` or `"`),
/// so shell-quoted preambles keep their inner spacing.
fn strip_one_quote_layer(raw: &str) -> &str {
    let raw = raw.strip_prefix(['\'', '"']).unwrap_or(raw);
    raw.strip_suffix(['\'', '"']).unwrap_or(raw)
}
