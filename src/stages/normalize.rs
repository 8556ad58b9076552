use std::sync::OnceLock;

use regex::Regex;

/// Compiled rewrite patterns, built once on first use
struct Rules {
    heading: Regex,
    emphasis: Regex,
    bullet: Regex,
    horizontal_rule: Regex,
    numbered: Regex,
    spaces: Regex,
    blank_runs: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| Rules {
        // 1-6 leading '#' markers at line start, keeping the heading text
        heading: Regex::new(r"(?m)^#{1,6}[ \t]*").unwrap(),
        // *text* or **text** wrapping, keeping the wrapped text
        emphasis: Regex::new(r"\*{1,2}([^*]+)\*{1,2}").unwrap(),
        // '- ' or '•' list markers at line start; a bare '-' without
        // following whitespace is not a marker, so '---' rules survive
        // to the horizontal_rule pattern below
        bullet: Regex::new(r"(?m)^[ \t]*(?:-[ \t]+|•[ \t]*)").unwrap(),
        horizontal_rule: Regex::new(r"-{3,}").unwrap(),
        // '<digits>.' at line start opens a fresh paragraph
        numbered: Regex::new(r"(?m)^(\d+\.)").unwrap(),
        spaces: Regex::new(r"[ \t]+").unwrap(),
        blank_runs: Regex::new(r"\n{3,}").unwrap(),
    })
}

/// Rewrites raw generated text into clean paragraph units
///
/// Strips markdown markup, canonicalizes bullet markers to `• `,
/// removes horizontal rules, and re-segments the text into paragraphs
/// joined by a blank line. Pure and deterministic; running it on its
/// own output is a no-op.
pub fn normalize(raw: &str) -> String {
    let rules = rules();

    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = rules.heading.replace_all(&text, "");
    let text = rules.emphasis.replace_all(&text, "$1");
    let text = rules.bullet.replace_all(&text, "\n• ");
    let text = rules.horizontal_rule.replace_all(&text, "\n");
    let text = rules.numbered.replace_all(&text, "\n$1");
    let text = rules.spaces.replace_all(&text, " ");
    let text = rules.blank_runs.replace_all(&text, "\n\n");

    reflow_paragraphs(&text)
}

/// Re-segments cleaned text into paragraphs
///
/// Bullet-marked and numbered lines always open a new paragraph even
/// when the previous line was non-blank; consecutive plain lines join
/// with a single space; a blank line closes the current paragraph.
fn reflow_paragraphs(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush(&mut paragraphs, &mut current);
            continue;
        }
        if line.starts_with('•') || starts_numbered(line) {
            flush(&mut paragraphs, &mut current);
        }
        current.push(line);
    }
    flush(&mut paragraphs, &mut current);

    paragraphs.join("\n\n")
}

fn flush(paragraphs: &mut Vec<String>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
        current.clear();
    }
}

/// True when the line starts with `<digits>.`
pub(crate) fn starts_numbered(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}
