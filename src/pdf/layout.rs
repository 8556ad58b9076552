use chrono::{DateTime, Utc};

use crate::models::{Block, Labels, ReportSpec};
use crate::stages::segment::{blocks, segment};

use super::metrics::text_width;
use super::page::{Color, Font, LogoImage, Op, RenderedPage};
use super::RenderError;

/// US-letter page with one-inch margins
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 72.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Rejects geometry that leaves no room for content
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.content_width() <= 0.0 || self.height - 2.0 * self.margin <= 0.0 {
            return Err(RenderError::InvalidGeometry(format!(
                "content area is empty for {}x{} with margin {}",
                self.width, self.height, self.margin
            )));
        }
        if self.margin < 0.0 {
            return Err(RenderError::InvalidGeometry(format!(
                "negative margin {}",
                self.margin
            )));
        }
        Ok(())
    }
}

/// Text styling for one flowable class
#[derive(Debug, Clone)]
struct TextStyle {
    font: Font,
    size: f32,
    leading: f32,
    color: Color,
}

const INK: Color = Color::rgb(0x33, 0x33, 0x33);
const TITLE_BLUE: Color = Color::rgb(0x1a, 0x23, 0x7e);
const HEADING_BLUE: Color = Color::rgb(0x28, 0x35, 0x93);
const MUTED_GREY: Color = Color::rgb(0x66, 0x66, 0x66);
const RULE_GREY: Color = Color::rgb(0xcc, 0xcc, 0xcc);
const BLACK: Color = Color::rgb(0, 0, 0);

const TITLE: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size: 28.0,
    leading: 34.0,
    color: TITLE_BLUE,
};
const HEADING: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size: 16.0,
    leading: 20.0,
    color: HEADING_BLUE,
};
const BODY: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 11.0,
    leading: 16.0,
    color: INK,
};
const TOC: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 12.0,
    leading: 24.0,
    color: INK,
};
const DATELINE: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 12.0,
    leading: 16.0,
    color: MUTED_GREY,
};

/// First-line indent of body paragraphs
const PARA_INDENT: f32 = 20.0;
/// Left indent of bullet items
const BULLET_INDENT: f32 = 35.0;

/// Pass 1: lays out the fixed section sequence into pages
///
/// The page count is an emergent property of this pass; footer and
/// header decoration is stamped afterwards by [`decorate`].
pub(crate) fn layout(
    spec: &ReportSpec,
    geo: &PageGeometry,
    logo: Option<&LogoImage>,
) -> Vec<RenderedPage> {
    let labels = spec.language.labels();
    let mut b = PageBuilder::new(geo);

    // Cover page
    if logo.is_some() {
        b.image(144.0, 72.0);
    }
    b.space(144.0);
    b.centered(labels.report_title, &TITLE);
    b.space(30.0 + 72.0);
    let date = spec.generated_at.format("%Y-%m-%d");
    b.centered(&format!("{}: {}", labels.generated_on, date), &DATELINE);
    b.centered(
        &format!("{}: {}", labels.generated_for, spec.username),
        &DATELINE,
    );
    b.page_break();

    // Table of contents: two static dot-leader entries
    b.heading(labels.table_of_contents);
    b.space(20.0);
    let leader = ".".repeat(40);
    for (label, page) in [(labels.initial_idea, "1"), (labels.business_strategy, "2")] {
        b.left(&format!("{label}{leader}{page}"), &TOC);
    }
    b.page_break();

    // Initial idea
    b.heading(labels.initial_idea);
    for block in blocks(&spec.idea) {
        b.block(&block);
    }
    b.page_break();

    // Strategy body, with the action tail partitioned off
    let segmented = segment(&spec.outputs.strategy);
    b.heading(labels.business_strategy);
    for block in &segmented.blocks {
        b.block(block);
        b.space(6.0);
    }
    b.page_break();

    // Action items, only when the marker produced any
    if !segmented.action_items.is_empty() {
        b.heading(labels.todo_list);
        for item in &segmented.action_items {
            b.flow(&format!("\u{2022} {item}"), &BODY, BULLET_INDENT, 0.0, false);
            b.space(3.0);
        }
    }

    b.finish()
}

/// Pass 2: stamps page numbers and header/footer decoration
///
/// Runs over the finished page set once the total is known. Writes only
/// to each page's decoration list; content is never altered.
pub(crate) fn decorate(
    pages: &mut [RenderedPage],
    labels: &Labels,
    generated_at: &DateTime<Utc>,
    geo: &PageGeometry,
) {
    let total = pages.len();
    let date = format!(
        "{}: {}",
        labels.generated_on,
        generated_at.format("%Y-%m-%d %H:%M")
    );
    let right = geo.width - geo.margin;

    for (index, page) in pages.iter_mut().enumerate() {
        let footer = format!("{} {} / {}", labels.page, index + 1, total);
        page.decoration.push(Op::Text {
            x: right - text_width(Font::Helvetica, &footer, 9.0),
            y: 28.0,
            font: Font::Helvetica,
            size: 9.0,
            color: BLACK,
            text: footer,
        });
        page.decoration.push(Op::Text {
            x: geo.margin,
            y: geo.height - 30.0,
            font: Font::HelveticaBold,
            size: 8.0,
            color: MUTED_GREY,
            text: labels.confidential.to_string(),
        });
        page.decoration.push(Op::Text {
            x: right - text_width(Font::HelveticaBold, &date, 8.0),
            y: geo.height - 30.0,
            font: Font::HelveticaBold,
            size: 8.0,
            color: MUTED_GREY,
            text: date.clone(),
        });
        page.decoration.push(Op::Line {
            x1: geo.margin,
            y1: geo.height - 40.0,
            x2: right,
            y2: geo.height - 40.0,
            color: RULE_GREY,
        });
        page.decoration.push(Op::Line {
            x1: geo.margin,
            y1: 50.0,
            x2: right,
            y2: 50.0,
            color: RULE_GREY,
        });
    }
}

/// Accumulates pages top-down during layout
///
/// Page breaks are pending until the next element lands, so a trailing
/// break never yields an empty page.
struct PageBuilder<'a> {
    geo: &'a PageGeometry,
    pages: Vec<RenderedPage>,
    current: RenderedPage,
    y: f32,
    pending_break: bool,
}

impl<'a> PageBuilder<'a> {
    fn new(geo: &'a PageGeometry) -> Self {
        Self {
            geo,
            pages: Vec::new(),
            current: RenderedPage::default(),
            y: geo.top(),
            pending_break: true,
        }
    }

    fn page_break(&mut self) {
        self.pending_break = true;
    }

    fn start_page(&mut self) {
        if !self.pending_break {
            return;
        }
        if !self.current.content.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.y = self.geo.top();
        self.pending_break = false;
    }

    /// Breaks the page when fewer than `needed` points remain
    fn ensure(&mut self, needed: f32) {
        self.start_page();
        if self.y - needed < self.geo.margin && !self.current.content.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = self.geo.top();
        }
    }

    fn space(&mut self, pts: f32) {
        self.start_page();
        self.y -= pts;
    }

    fn image(&mut self, w: f32, h: f32) {
        self.ensure(h);
        self.y -= h;
        self.current.content.push(Op::Image {
            x: self.geo.margin,
            y: self.y,
            w,
            h,
        });
    }

    fn heading(&mut self, text: &str) {
        self.space(20.0);
        self.line(self.geo.margin, text, &HEADING);
        self.space(12.0);
    }

    fn centered(&mut self, text: &str, style: &TextStyle) {
        let x = self.geo.margin
            + (self.geo.content_width() - text_width(style.font, text, style.size)) / 2.0;
        self.line(x.max(self.geo.margin), text, style);
    }

    fn left(&mut self, text: &str, style: &TextStyle) {
        self.line(self.geo.margin, text, style);
    }

    /// Emits one already-measured line at the given x position
    fn line(&mut self, x: f32, text: &str, style: &TextStyle) {
        self.ensure(style.leading);
        self.y -= style.leading;
        self.current.content.push(Op::Text {
            x,
            y: self.y,
            font: style.font,
            size: style.size,
            color: style.color,
            text: text.to_string(),
        });
    }

    /// Lays out one block with its flowable class
    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(text) => {
                self.flow(text, &BODY, 0.0, PARA_INDENT, true);
                self.space(12.0);
            }
            Block::Bullet(text) => {
                self.flow(&format!("\u{2022} {text}"), &BODY, BULLET_INDENT, 0.0, false);
                self.space(3.0);
            }
        }
    }

    /// Word-wraps and emits a paragraph, breaking pages as needed
    ///
    /// Justified paragraphs distribute the slack across word gaps on
    /// every line but the last.
    fn flow(&mut self, text: &str, style: &TextStyle, left_indent: f32, first_indent: f32, justify: bool) {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return;
        }
        let width = self.geo.content_width() - left_indent;
        let first_width = width - first_indent;
        let lines = wrap_words(&words, style.font, style.size, first_width, width);
        let last = lines.len() - 1;

        for (i, line) in lines.iter().enumerate() {
            let indent = if i == 0 { first_indent } else { 0.0 };
            let x = self.geo.margin + left_indent + indent;
            let avail = width - indent;
            if justify && i < last && line.len() > 1 {
                self.justified_line(x, avail, line, style);
            } else {
                self.ensure(style.leading);
                self.y -= style.leading;
                self.current.content.push(Op::Text {
                    x,
                    y: self.y,
                    font: style.font,
                    size: style.size,
                    color: style.color,
                    text: line.join(" "),
                });
            }
        }
    }

    /// Emits one line word-by-word with the gap slack spread evenly
    fn justified_line(&mut self, x: f32, avail: f32, words: &[&str], style: &TextStyle) {
        self.ensure(style.leading);
        self.y -= style.leading;

        let words_width: f32 = words
            .iter()
            .map(|w| text_width(style.font, w, style.size))
            .sum();
        let gap = ((avail - words_width) / (words.len() - 1) as f32).max(0.0);

        let mut cursor = x;
        for word in words {
            self.current.content.push(Op::Text {
                x: cursor,
                y: self.y,
                font: style.font,
                size: style.size,
                color: style.color,
                text: (*word).to_string(),
            });
            cursor += text_width(style.font, word, style.size) + gap;
        }
    }

    fn finish(mut self) -> Vec<RenderedPage> {
        if !self.current.content.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Greedy word wrap against font metrics
fn wrap_words<'t>(
    words: &[&'t str],
    font: Font,
    size: f32,
    first_width: f32,
    width: f32,
) -> Vec<Vec<&'t str>> {
    let space = text_width(font, " ", size);
    let mut lines: Vec<Vec<&'t str>> = Vec::new();
    let mut current: Vec<&'t str> = Vec::new();
    let mut current_width = 0.0;

    for word in words {
        let word_width = text_width(font, word, size);
        let avail = if lines.is_empty() { first_width } else { width };
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + space + word_width
        };
        if !current.is_empty() && needed > avail {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        if !current.is_empty() {
            current_width += space;
        }
        current.push(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, StageOutputs};

    fn spec(strategy: &str) -> ReportSpec {
        ReportSpec {
            idea: "A mobile bakery.".to_string(),
            outputs: StageOutputs {
                clarity: "c".into(),
                niche: "n".into(),
                action: "a".into(),
                strategy: strategy.to_string(),
            },
            language: Language::English,
            username: "tester".to_string(),
            generated_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        }
    }

    fn page_text(page: &RenderedPage) -> String {
        page.content
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_fixed_section_order() {
        let geo = PageGeometry::default();
        let pages = layout(&spec("Strategy body.\nTO-DO:\n- do it"), &geo, None);

        // cover, toc, idea, strategy, action items
        assert_eq!(pages.len(), 5);
        assert!(page_text(&pages[0]).contains("Business Strategy Report"));
        assert!(page_text(&pages[1]).contains("Table of Contents"));
        assert!(page_text(&pages[2]).contains("Initial Business Idea"));
        assert!(page_text(&pages[3]).contains("Business Strategy"));
        assert!(page_text(&pages[4]).contains("Action Items"));
        assert!(page_text(&pages[4]).contains("do it"));
    }

    #[test]
    fn test_no_action_page_without_marker() {
        let geo = PageGeometry::default();
        let pages = layout(&spec("Strategy body only."), &geo, None);
        assert_eq!(pages.len(), 4);
        // The marker tail must not leak into the strategy body either
        assert!(!page_text(&pages[3]).contains("TO-DO"));
    }

    #[test]
    fn test_toc_uses_dot_leaders() {
        let geo = PageGeometry::default();
        let pages = layout(&spec("s"), &geo, None);
        let toc = page_text(&pages[1]);
        assert!(toc.contains(&format!("Initial Business Idea{}1", ".".repeat(40))));
        assert!(toc.contains(&format!("Business Strategy{}2", ".".repeat(40))));
    }

    #[test]
    fn test_long_text_flows_over_pages() {
        let geo = PageGeometry::default();
        let long = "An unusually thorough market overview sentence. ".repeat(400);
        let pages = layout(&spec(&long), &geo, None);
        assert!(pages.len() > 4, "expected overflow, got {} pages", pages.len());
    }

    #[test]
    fn test_decorate_stamps_every_page_once() {
        let geo = PageGeometry::default();
        let mut pages = layout(&spec("Some strategy.\nTO-DO:\n- x"), &geo, None);
        let before: Vec<usize> = pages.iter().map(|p| p.content.len()).collect();
        let generated_at = "2024-05-01T10:00:00Z".parse().unwrap();

        decorate(&mut pages, Language::English.labels(), &generated_at, &geo);

        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            // content untouched by the decoration pass
            assert_eq!(page.content.len(), before[i]);
            let footers: Vec<&str> = page
                .decoration
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } if text.starts_with("Page ") => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(footers, vec![format!("Page {} / {}", i + 1, total).as_str()]);
            assert!(page
                .decoration
                .iter()
                .any(|op| matches!(op, Op::Text { text, .. } if text == "CONFIDENTIAL")));
            let rules = page
                .decoration
                .iter()
                .filter(|op| matches!(op, Op::Line { .. }))
                .count();
            assert_eq!(rules, 2);
        }
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let geo = PageGeometry {
            width: 100.0,
            height: 100.0,
            margin: 72.0,
        };
        assert!(geo.validate().is_err());
        assert!(PageGeometry::default().validate().is_ok());
    }

    #[test]
    fn test_wrap_respects_width() {
        let words: Vec<&str> = "the quick brown fox jumps over the lazy dog".split(' ').collect();
        let lines = wrap_words(&words, Font::Helvetica, 11.0, 80.0, 80.0);
        assert!(lines.len() > 1);
        for line in &lines {
            let w = text_width(Font::Helvetica, &line.join(" "), 11.0);
            assert!(w <= 80.0 || line.len() == 1);
        }
        // No word lost or duplicated
        let rejoined: Vec<&str> = lines.concat();
        assert_eq!(rejoined, words);
    }
}
