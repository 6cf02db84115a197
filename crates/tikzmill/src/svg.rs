//! Sizing fixup for SVG output.
//!
//! The PDF-to-SVG converter emits documents without explicit `width`/`height`
//! attributes, so browsers scale them from the `viewBox` alone. The patch
//! pins explicit pixel dimensions on the root element while leaving every
//! other byte of the document untouched.

use crate::error::{Error, Result};

/// Sets explicit pixel `width`/`height` attributes on the document's single
/// `<svg>` element.
///
/// With `size` the requested dimensions win outright; without it the
/// `viewBox` width/height are used. Documents with more or fewer than exactly
/// one `<svg>` element are rejected.
pub fn patch_svg_size(svg: &str, size: Option<(u32, u32)>) -> Result<String> {
    let doc = roxmltree::Document::parse(svg)?;

    let mut elements = doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "svg");
    let Some(node) = elements.next() else {
        return Err(Error::SvgStructure { found: 0 });
    };
    let extra = elements.count();
    if extra != 0 {
        return Err(Error::SvgStructure { found: 1 + extra });
    }

    let (width, height) = match size {
        Some(pair) => pair,
        None => viewbox_size(&node).ok_or(Error::SvgNoSize)?,
    };

    let tag_start = node.range().start;
    let tag_end = tag_start + start_tag_len(&svg[tag_start..]);
    let mut tag = svg[tag_start..tag_end].to_string();
    set_attribute(&mut tag, "width", &format!("{width}px"));
    set_attribute(&mut tag, "height", &format!("{height}px"));

    let mut out = String::with_capacity(svg.len() + 32);
    out.push_str(&svg[..tag_start]);
    out.push_str(&tag);
    out.push_str(&svg[tag_end..]);
    Ok(out)
}

fn viewbox_size(node: &roxmltree::Node<'_, '_>) -> Option<(u32, u32)> {
    let raw = node.attribute("viewBox")?;
    let mut it = raw.split_whitespace().skip(2);
    let width = it.next()?.parse::<f64>().ok()?;
    let height = it.next()?.parse::<f64>().ok()?;
    if width > 0.0 && height > 0.0 {
        Some((width.round() as u32, height.round() as u32))
    } else {
        None
    }
}

/// Byte length of the element's start tag, quote-aware so a `>` inside an
/// attribute value does not end the scan.
fn start_tag_len(tag: &str) -> usize {
    let mut quote: Option<char> = None;
    for (i, ch) in tag.char_indices() {
        match (quote, ch) {
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    tag.len()
}

/// Replaces the value of `name` inside a start tag, or appends the attribute
/// before the closing `>` when it is not present.
fn set_attribute(tag: &mut String, name: &str, value: &str) {
    if let Some(span) = attribute_value_span(tag, name) {
        tag.replace_range(span, value);
        return;
    }
    let insert_at = if tag.ends_with("/>") {
        tag.len() - 2
    } else {
        tag.len() - 1
    };
    tag.insert_str(insert_at, &format!(" {name}=\"{value}\""));
}

/// Byte span of the quoted value of `name` in a start tag, if present.
fn attribute_value_span(tag: &str, name: &str) -> Option<std::ops::Range<usize>> {
    let bytes = tag.as_bytes();

    // Skip "<" and the element name.
    let mut i = 1;
    while i < bytes.len()
        && !bytes[i].is_ascii_whitespace()
        && bytes[i] != b'>'
        && bytes[i] != b'/'
    {
        i += 1;
    }

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] == b'>' || bytes[i] == b'/' {
            return None;
        }

        let name_start = i;
        while i < bytes.len()
            && bytes[i] != b'='
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'>'
        {
            i += 1;
        }
        let attr_name = &tag[name_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || (bytes[i] != b'"' && bytes[i] != b'\'') {
            return None;
        }
        let quote = bytes[i];
        i += 1;
        let value_start = i;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if attr_name == name {
            return Some(value_start..i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patches_width_and_height_from_requested_size() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50"><rect width="10" height="10"/></svg>"#;
        let out = patch_svg_size(svg, Some((400, 240))).expect("patched svg");
        assert!(out.contains(r#"width="400px""#));
        assert!(out.contains(r#"height="240px""#));
        // Everything outside the root start tag is untouched, the nested
        // rect's own dimensions included.
        assert!(out.contains(r#"viewBox="0 0 100 50""#));
        assert!(out.ends_with(r#"<rect width="10" height="10"/></svg>"#));
    }

    #[test]
    fn replaces_existing_size_attributes_in_place() {
        let svg = r#"<svg width="100px" height="50px" viewBox="0 0 100 50"/>"#;
        let out = patch_svg_size(svg, Some((400, 240))).expect("patched svg");
        assert_eq!(
            out,
            r#"<svg width="400px" height="240px" viewBox="0 0 100 50"/>"#
        );
    }

    #[test]
    fn falls_back_to_viewbox_when_no_size_requested() {
        let svg = r#"<?xml version="1.0"?><svg viewBox="0 0 100 50"/>"#;
        let out = patch_svg_size(svg, None).expect("patched svg");
        assert!(out.starts_with(r#"<?xml version="1.0"?>"#));
        assert!(out.contains(r#"width="100px""#));
        assert!(out.contains(r#"height="50px""#));
    }

    #[test]
    fn errors_without_size_or_viewbox() {
        let err = patch_svg_size("<svg/>", None).unwrap_err();
        assert!(matches!(err, Error::SvgNoSize));
    }

    #[test]
    fn rejects_nested_svg_elements() {
        let svg = r#"<svg viewBox="0 0 1 1"><svg viewBox="0 0 2 2"/></svg>"#;
        let err = patch_svg_size(svg, Some((1, 1))).unwrap_err();
        assert!(matches!(err, Error::SvgStructure { found: 2 }));
    }

    #[test]
    fn rejects_documents_without_an_svg_element() {
        let err = patch_svg_size("<html/>", Some((1, 1))).unwrap_err();
        assert!(matches!(err, Error::SvgStructure { found: 0 }));
    }

    #[test]
    fn malformed_xml_propagates_a_parse_error() {
        let err = patch_svg_size("<svg", Some((1, 1))).unwrap_err();
        assert!(matches!(err, Error::SvgParse(_)));
    }
}
