//! Message formatting
//!
//! Splits model output into prose and fenced code blocks so the view can render
//! them differently. Parsing never touches the stored message text.

const FENCE: &str = "```";

/// An inline run of prose text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain text
    Text(String),
    /// Text wrapped in `**`
    Bold(String),
}

/// One line of a prose segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProseLine {
    /// A `# ` heading, marker stripped
    Heading(String),
    /// Any other line; empty for blank lines
    Paragraph(Vec<Span>),
}

/// A block of rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text outside code fences
    Prose(Vec<ProseLine>),
    /// A fenced code block
    Code {
        /// Language tag from the opening fence line, if any
        language: Option<String>,
        /// Literal code body
        body: String,
    },
}

impl Segment {
    /// Markup-free text of this segment
    pub fn plain_text(&self) -> String {
        match self {
            Segment::Prose(lines) => lines
                .iter()
                .map(ProseLine::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Segment::Code { language, body } => match language {
                Some(lang) if body.is_empty() => lang.clone(),
                Some(lang) => format!("{}\n{}", lang, body),
                None => body.clone(),
            },
        }
    }
}

impl ProseLine {
    /// Markup-free text of this line
    pub fn plain_text(&self) -> String {
        match self {
            ProseLine::Heading(text) => text.clone(),
            ProseLine::Paragraph(spans) => spans
                .iter()
                .map(|span| match span {
                    Span::Text(t) | Span::Bold(t) => t.as_str(),
                })
                .collect(),
        }
    }
}

/// Markup-free text of a parsed message, segments joined by newlines
pub fn plain_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a message into prose and code segments
///
/// A fence left open at the end of the text (a reply still streaming) is
/// treated as a code block running to the end.
pub fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = content;

    while let Some(open) = rest.find(FENCE) {
        push_prose(&mut segments, &rest[..open]);
        let after_open = &rest[open + FENCE.len()..];
        match after_open.find(FENCE) {
            Some(close) => {
                segments.push(parse_code(&after_open[..close]));
                rest = &after_open[close + FENCE.len()..];
            }
            None => {
                segments.push(parse_code(after_open));
                rest = "";
            }
        }
    }
    push_prose(&mut segments, rest);

    segments
}

fn push_prose(segments: &mut Vec<Segment>, text: &str) {
    let text = text.strip_prefix('\n').unwrap_or(text);
    let text = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        return;
    }
    segments.push(Segment::Prose(text.split('\n').map(parse_line).collect()));
}

fn parse_code(inner: &str) -> Segment {
    let (first, body) = match inner.find('\n') {
        Some(pos) => (&inner[..pos], &inner[pos + 1..]),
        None => (inner, ""),
    };
    let language = first.trim();
    let body = body.strip_suffix('\n').unwrap_or(body);

    Segment::Code {
        language: (!language.is_empty()).then(|| language.to_string()),
        body: body.trim_end_matches('\r').to_string(),
    }
}

fn parse_line(line: &str) -> ProseLine {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if let Some(heading) = line.trim_start().strip_prefix("# ") {
        return ProseLine::Heading(heading.to_string());
    }
    ProseLine::Paragraph(parse_spans(line))
}

fn parse_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if open > 0 {
            spans.push(Span::Text(rest[..open].to_string()));
        }
        spans.push(Span::Bold(after_open[..close].to_string()));
        rest = &after_open[close + 2..];
    }
    if !rest.is_empty() {
        spans.push(Span::Text(rest.to_string()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    fn para(spans: Vec<Span>) -> ProseLine {
        ProseLine::Paragraph(spans)
    }

    #[test]
    fn test_prose_code_prose() {
        let input = "A\n```py\nprint(1)\n```\nB";
        let segments = parse(input);

        assert_eq!(
            segments,
            vec![
                Segment::Prose(vec![para(vec![text("A")])]),
                Segment::Code {
                    language: Some("py".to_string()),
                    body: "print(1)".to_string(),
                },
                Segment::Prose(vec![para(vec![text("B")])]),
            ]
        );
    }

    #[test]
    fn test_plain_text_recovers_content() {
        let input = "A\n```py\nprint(1)\n```\nB";
        let recovered = plain_text(&parse(input));

        let original: Vec<&str> = input
            .split('\n')
            .map(|l| l.trim_start_matches(FENCE))
            .filter(|l| !l.is_empty())
            .collect();
        let rendered: Vec<&str> = recovered.split('\n').filter(|l| !l.is_empty()).collect();
        assert_eq!(rendered, original);
    }

    #[test]
    fn test_code_without_language() {
        let segments = parse("```\nlet x = 1;\nlet y = 2;\n```");
        assert_eq!(
            segments,
            vec![Segment::Code {
                language: None,
                body: "let x = 1;\nlet y = 2;".to_string(),
            }]
        );
    }

    #[test]
    fn test_unclosed_fence_is_open_code_block() {
        let segments = parse("Here:\n```rust\nfn main() {");
        assert_eq!(
            segments,
            vec![
                Segment::Prose(vec![para(vec![text("Here:")])]),
                Segment::Code {
                    language: Some("rust".to_string()),
                    body: "fn main() {".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_heading_and_bold() {
        let segments = parse("# Title\nSome **bold** and **more** text\n  # Indented");
        assert_eq!(
            segments,
            vec![Segment::Prose(vec![
                ProseLine::Heading("Title".to_string()),
                para(vec![
                    text("Some "),
                    Span::Bold("bold".to_string()),
                    text(" and "),
                    Span::Bold("more".to_string()),
                    text(" text"),
                ]),
                ProseLine::Heading("Indented".to_string()),
            ])]
        );
    }

    #[test]
    fn test_hash_without_space_is_not_heading() {
        let segments = parse("#hashtag");
        assert_eq!(
            segments,
            vec![Segment::Prose(vec![para(vec![text("#hashtag")])])]
        );
    }

    #[test]
    fn test_unmatched_bold_marker_stays_literal() {
        let segments = parse("**a** and **dangling");
        assert_eq!(
            segments,
            vec![Segment::Prose(vec![para(vec![
                Span::Bold("a".to_string()),
                text(" and **dangling"),
            ])])]
        );
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let segments = parse("one\n\ntwo");
        assert_eq!(
            segments,
            vec![Segment::Prose(vec![
                para(vec![text("one")]),
                para(vec![]),
                para(vec![text("two")]),
            ])]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_multiple_code_blocks() {
        let segments = parse("```js\na()\n```\n```go\nb()\n```");
        assert_eq!(segments.len(), 2);
        assert!(matches!(&segments[0], Segment::Code { language: Some(l), .. } if l == "js"));
        assert!(matches!(&segments[1], Segment::Code { language: Some(l), .. } if l == "go"));
    }
}
