//! Serializes a finished page set to PDF 1.4 bytes: catalog, page tree,
//! the two built-in Type1 fonts with WinAnsi encoding, an optional
//! DCT-encoded logo XObject, and one uncompressed content stream per
//! page, followed by the xref table and trailer.

use std::fmt::Write as _;

use super::layout::PageGeometry;
use super::page::{Color, Font, LogoImage, Op, RenderedPage};

const LOGO_RESOURCE: &str = "Logo";

/// Writes the whole document into one byte vector
pub(crate) fn write_document(
    pages: &[RenderedPage],
    logo: Option<&LogoImage>,
    geo: &PageGeometry,
) -> Vec<u8> {
    let mut doc = Document::new();

    // Object layout: 1 catalog, 2 page tree, 3-4 fonts, optional logo,
    // then a page object and content stream per page.
    let catalog_id = 1;
    let pages_id = 2;
    let font_regular_id = 3;
    let font_bold_id = 4;
    let logo_id = logo.map(|_| 5u32);
    let first_page_id = if logo.is_some() { 6 } else { 5 };

    doc.object(
        catalog_id,
        format!("<< /Type /Catalog /Pages {pages_id} 0 R >>"),
    );

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_id + 2 * i as u32))
        .collect();
    doc.object(
        pages_id,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );

    doc.object(font_regular_id, font_dict(Font::Helvetica));
    doc.object(font_bold_id, font_dict(Font::HelveticaBold));

    if let (Some(id), Some(logo)) = (logo_id, logo) {
        doc.stream(
            id,
            format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
                logo.pixel_width,
                logo.pixel_height,
                logo.data.len()
            ),
            &logo.data,
        );
    }

    let resources = page_resources(font_regular_id, font_bold_id, logo_id);
    for (i, page) in pages.iter().enumerate() {
        let page_id = first_page_id + 2 * i as u32;
        let content_id = page_id + 1;
        doc.object(
            page_id,
            format!(
                "<< /Type /Page /Parent {pages_id} 0 R /MediaBox [0 0 {} {}] \
                 /Resources {resources} /Contents {content_id} 0 R >>",
                fmt_num(geo.width),
                fmt_num(geo.height)
            ),
        );
        let content = content_stream(page);
        doc.stream(
            content_id,
            format!("<< /Length {} >>", content.len()),
            content.as_bytes(),
        );
    }

    doc.finish(catalog_id)
}

fn font_dict(font: Font) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.base_name()
    )
}

fn page_resources(regular: u32, bold: u32, logo: Option<u32>) -> String {
    let mut res = format!("<< /Font << /F1 {regular} 0 R /F2 {bold} 0 R >>");
    if let Some(id) = logo {
        let _ = write!(res, " /XObject << /{LOGO_RESOURCE} {id} 0 R >>");
    }
    res.push_str(" >>");
    res
}

/// Builds one page's content stream from its content and decoration ops
fn content_stream(page: &RenderedPage) -> String {
    let mut s = String::new();
    for op in page.content.iter().chain(page.decoration.iter()) {
        match op {
            Op::Text {
                x,
                y,
                font,
                size,
                color,
                text,
            } => {
                let _ = write!(
                    s,
                    "BT /{} {} Tf {} rg {} {} Td (",
                    font.resource(),
                    fmt_num(*size),
                    fmt_color(color),
                    fmt_num(*x),
                    fmt_num(*y),
                );
                escape_text(text, &mut s);
                s.push_str(") Tj ET\n");
            }
            Op::Line { x1, y1, x2, y2, color } => {
                let _ = writeln!(
                    s,
                    "{} RG 1 w {} {} m {} {} l S",
                    fmt_color(color),
                    fmt_num(*x1),
                    fmt_num(*y1),
                    fmt_num(*x2),
                    fmt_num(*y2),
                );
            }
            Op::Image { x, y, w, h } => {
                let _ = writeln!(
                    s,
                    "q {} 0 0 {} {} {} cm /{LOGO_RESOURCE} Do Q",
                    fmt_num(*w),
                    fmt_num(*h),
                    fmt_num(*x),
                    fmt_num(*y),
                );
            }
        }
    }
    s
}

/// Escapes a string into WinAnsi bytes inside a PDF literal string
fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        let byte = winansi_byte(c);
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
}

/// Maps a char to its WinAnsi code, `?` when unrepresentable
fn winansi_byte(c: char) -> u8 {
    let cp = c as u32;
    match c {
        _ if cp < 0x80 => cp as u8,
        '\u{20ac}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ if (0xa0..=0xff).contains(&cp) => cp as u8,
        _ => b'?',
    }
}

fn fmt_color(color: &Color) -> String {
    format!(
        "{} {} {}",
        fmt_num(color.r),
        fmt_num(color.g),
        fmt_num(color.b)
    )
}

/// Formats a coordinate with trailing zeros trimmed
fn fmt_num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

/// Accumulates numbered objects and tracks their byte offsets
struct Document {
    buf: Vec<u8>,
    offsets: Vec<(u32, usize)>,
}

impl Document {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: u32, body: String) {
        self.offsets.push((id, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: u32, dict: String, data: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{dict}\nstream\n").as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, root_id: u32) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let count = self.offsets.len() + 1;
        let xref_start = self.buf.len();

        let mut xref = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {count} /Root {root_id} 0 R >>\nstartxref\n{xref_start}\n%%EOF\n"
            )
            .as_bytes(),
        );
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> RenderedPage {
        let mut page = RenderedPage::default();
        page.content.push(Op::Text {
            x: 72.0,
            y: 700.0,
            font: Font::Helvetica,
            size: 11.0,
            color: Color::rgb(0x33, 0x33, 0x33),
            text: "Hello (world) \\ \u{2022} bullet".to_string(),
        });
        page.decoration.push(Op::Line {
            x1: 72.0,
            y1: 50.0,
            x2: 540.0,
            y2: 50.0,
            color: Color::rgb(0xcc, 0xcc, 0xcc),
        });
        page
    }

    #[test]
    fn test_document_framing() {
        let geo = PageGeometry::default();
        let bytes = write_document(&[sample_page()], None, &geo);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("startxref"));
    }

    #[test]
    fn test_string_escaping() {
        let mut out = String::new();
        escape_text("a(b)c\\d \u{2022} \u{2014}", &mut out);
        assert_eq!(out, "a\\(b\\)c\\\\d \\225 \\227");
    }

    #[test]
    fn test_xref_offsets_match_objects() {
        let geo = PageGeometry::default();
        let bytes = write_document(&[sample_page(), sample_page()], None, &geo);

        // Every xref entry must point at the start of its object.
        // Offsets are byte offsets, so the table is parsed from bytes.
        // First occurrence: the final "startxref" keyword also ends in
        // the same bytes.
        let xref_at = bytes.windows(5).position(|w| w == b"xref\n").unwrap();
        let tail = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        let entries: Vec<usize> = tail
            .lines()
            .skip(2) // "xref" and the "0 N" line
            .take_while(|l| l.ends_with("n ") || l.ends_with("f "))
            .skip(1) // free-list head
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert!(!entries.is_empty());
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(
                bytes[*offset..].starts_with(expected.as_bytes()),
                "object {} not at offset {offset}",
                i + 1
            );
        }
    }

    #[test]
    fn test_logo_embeds_xobject() {
        let logo = LogoImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            pixel_width: 20,
            pixel_height: 10,
        };
        let geo = PageGeometry::default();
        let mut page = sample_page();
        page.content.push(Op::Image {
            x: 72.0,
            y: 600.0,
            w: 144.0,
            h: 72.0,
        });
        let bytes = write_document(&[page], Some(&logo), &geo);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Subtype /Image"));
        assert!(text.contains("/DCTDecode"));
        assert!(text.contains("/Logo Do"));
    }

    #[test]
    fn test_winansi_fallback() {
        assert_eq!(winansi_byte('A'), b'A');
        assert_eq!(winansi_byte('\u{2022}'), 0x95);
        assert_eq!(winansi_byte('\u{e9}'), 0xe9);
        assert_eq!(winansi_byte('\u{4e2d}'), b'?');
    }
}
