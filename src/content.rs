//! Blog content model: a raw text blob becomes heading / bullet-list /
//! paragraph blocks, and each block's text becomes plain, bold, and
//! italic runs via a single left-to-right scan.

/// Doubled marker opening or closing a bold span.
const BOLD_MARK: &str = "**";
/// Single marker opening or closing an italic span.
const ITALIC_MARK: char = '*';

/// The smallest styled unit of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Plain(String),
    Bold(String),
    Italic(String),
}

impl Run {
    /// The text carried by this run, delimiters excluded.
    pub fn text(&self) -> &str {
        match self {
            Run::Plain(t) | Run::Bold(t) | Run::Italic(t) => t,
        }
    }
}

/// One paragraph-sized unit of content, separated from its neighbors by
/// a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `# ` / `## ` / `### ` heading, level 1-3.
    Heading(u8, Vec<Run>),
    /// `- ` list, one run sequence per item.
    Bullets(Vec<Vec<Run>>),
    Paragraph(Vec<Run>),
}

/// Split a content blob on blank lines and classify each block by its
/// leading marker. Classification looks at the first line only; the
/// parser is not recursive and marker characters cannot be escaped.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    content.split("\n\n").map(parse_block).collect()
}

fn parse_block(block: &str) -> Block {
    if let Some(rest) = block.strip_prefix("# ") {
        Block::Heading(1, format_inline(rest))
    } else if let Some(rest) = block.strip_prefix("## ") {
        Block::Heading(2, format_inline(rest))
    } else if let Some(rest) = block.strip_prefix("### ") {
        Block::Heading(3, format_inline(rest))
    } else if block.starts_with("- ") {
        let items = block
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| format_inline(line.strip_prefix("- ").unwrap_or(line)))
            .collect();
        Block::Bullets(items)
    } else {
        Block::Paragraph(format_inline(block))
    }
}

/// Scan one block's text into runs, left to right in a single pass.
///
/// Bold is checked before italic at each marker position, so `**` that
/// can be closed is never read as two adjacent italics. A `**` with no
/// closer degrades one character at a time: the first `*` is emitted
/// literally and the scan resumes at the second, which may still open
/// an italic span of its own. Unterminated markers never raise an
/// error; they stay in the output as literal characters.
pub fn format_inline(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let bold = rest.find(BOLD_MARK);
        let italic = rest.find(ITALIC_MARK);

        let next = match (bold, italic) {
            (Some(b), Some(i)) => b.min(i),
            (Some(b), None) => b,
            (None, Some(i)) => i,
            (None, None) => {
                runs.push(Run::Plain(rest.to_string()));
                break;
            }
        };

        // Text ahead of the earliest marker is plain; skip to the marker
        // without re-scanning what came before it.
        if next > 0 {
            runs.push(Run::Plain(rest[..next].to_string()));
            rest = &rest[next..];
            continue;
        }

        if rest.starts_with(BOLD_MARK) {
            if let Some(close) = rest[2..].find(BOLD_MARK) {
                runs.push(Run::Bold(rest[2..2 + close].to_string()));
                rest = &rest[2 + close + 2..];
                continue;
            }
        } else if let Some(close) = rest[1..].find(ITALIC_MARK) {
            runs.push(Run::Italic(rest[1..1 + close].to_string()));
            rest = &rest[1 + close + 1..];
            continue;
        }

        // Unclosed marker: emit it literally and rescan from the next
        // character.
        runs.push(Run::Plain(ITALIC_MARK.to_string()));
        rest = &rest[1..];
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Run {
        Run::Plain(s.to_string())
    }

    fn flat(runs: &[Run]) -> String {
        runs.iter().map(Run::text).collect()
    }

    fn flat_blocks(blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| match block {
                Block::Heading(_, runs) | Block::Paragraph(runs) => flat(runs),
                Block::Bullets(items) => items.iter().map(|item| flat(item)).collect(),
            })
            .collect()
    }

    #[test]
    fn text_without_markers_is_one_plain_run() {
        let runs = format_inline("just some ordinary text.");
        assert_eq!(runs, vec![plain("just some ordinary text.")]);
    }

    #[test]
    fn empty_input_produces_no_runs() {
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn paired_double_markers_produce_a_bold_run() {
        let runs = format_inline("**bold**");
        assert_eq!(runs, vec![Run::Bold("bold".to_string())]);
    }

    #[test]
    fn mixed_emphasis_keeps_scan_order() {
        let runs = format_inline("*a* and **b**");
        assert_eq!(
            runs,
            vec![
                Run::Italic("a".to_string()),
                plain(" and "),
                Run::Bold("b".to_string()),
            ]
        );
    }

    #[test]
    fn scan_resumes_after_a_closed_bold_span() {
        let runs = format_inline("lead **mid** tail");
        assert_eq!(
            runs,
            vec![plain("lead "), Run::Bold("mid".to_string()), plain(" tail")]
        );
    }

    #[test]
    fn unterminated_bold_degrades_to_literal_characters() {
        let runs = format_inline("**oops");
        assert!(!runs.iter().any(|r| matches!(r, Run::Bold(_))));
        assert_eq!(runs, vec![plain("*"), plain("*"), plain("oops")]);
    }

    #[test]
    fn half_of_a_broken_bold_can_still_open_an_italic() {
        let runs = format_inline("**a*b");
        assert_eq!(
            runs,
            vec![plain("*"), Run::Italic("a".to_string()), plain("b")]
        );
    }

    #[test]
    fn unterminated_italic_stays_literal() {
        let runs = format_inline("*oops");
        assert_eq!(runs, vec![plain("*"), plain("oops")]);
    }

    #[test]
    fn lone_markers_survive_as_text() {
        assert_eq!(format_inline("*"), vec![plain("*")]);
        assert_eq!(format_inline("**"), vec![plain("*"), plain("*")]);
    }

    #[test]
    fn heading_then_paragraph() {
        let blocks = parse_blocks("# Title\n\nBody text");
        assert_eq!(
            blocks,
            vec![
                Block::Heading(1, vec![plain("Title")]),
                Block::Paragraph(vec![plain("Body text")]),
            ]
        );
    }

    #[test]
    fn heading_level_follows_marker_depth() {
        assert_eq!(
            parse_blocks("## Sub"),
            vec![Block::Heading(2, vec![plain("Sub")])]
        );
        assert_eq!(
            parse_blocks("### Deep"),
            vec![Block::Heading(3, vec![plain("Deep")])]
        );
    }

    #[test]
    fn list_block_collects_items() {
        let blocks = parse_blocks("- a\n- b");
        assert_eq!(
            blocks,
            vec![Block::Bullets(vec![vec![plain("a")], vec![plain("b")]])]
        );
    }

    #[test]
    fn blank_list_lines_are_dropped() {
        let blocks = parse_blocks("- a\n \n- b\n");
        assert_eq!(
            blocks,
            vec![Block::Bullets(vec![vec![plain("a")], vec![plain("b")]])]
        );
    }

    #[test]
    fn list_detection_checks_only_the_first_line() {
        let blocks = parse_blocks("intro line\n- looks like an item");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![plain(
                "intro line\n- looks like an item"
            )])]
        );
    }

    #[test]
    fn emphasis_inside_list_items_is_formatted() {
        let blocks = parse_blocks("- plain\n- **strong** end");
        assert_eq!(
            blocks,
            vec![Block::Bullets(vec![
                vec![plain("plain")],
                vec![Run::Bold("strong".to_string()), plain(" end")],
            ])]
        );
    }

    #[test]
    fn delimiters_are_the_only_characters_removed() {
        // Closed spans lose their delimiters, nothing else.
        let input = "# Head\n\n**a** *b*\n\n- x\n- **y**";
        assert_eq!(flat_blocks(&parse_blocks(input)), "Heada bxy");

        // Unterminated markers are not delimiters and stay put.
        let input = "**oops\n\n*still here";
        assert_eq!(flat_blocks(&parse_blocks(input)), "**oops*still here");
    }
}
