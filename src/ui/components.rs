//! Helpers that turn parsed article content into styled terminal text.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::content::{Block, Run};

/// One inline run as a span. Bold and italic runs keep the base style
/// and add the matching modifier.
pub fn run_span(run: &Run, base: Style) -> Span<'_> {
    match run {
        Run::Plain(text) => Span::styled(text.as_str(), base),
        Run::Bold(text) => Span::styled(text.as_str(), base.add_modifier(Modifier::BOLD)),
        Run::Italic(text) => Span::styled(text.as_str(), base.add_modifier(Modifier::ITALIC)),
    }
}

/// One formatted stretch as a single display line.
pub fn runs_line(runs: &[Run], base: Style) -> Line<'_> {
    Line::from(runs.iter().map(|run| run_span(run, base)).collect::<Vec<_>>())
}

/// Parsed blocks as display lines, one blank line between blocks.
/// Headings take the heading style (top-level ones bold), bullet items
/// get an indent and a marker glyph.
pub fn content_lines<'a>(blocks: &'a [Block], body: Style, heading: Style) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        match block {
            Block::Heading(level, runs) => {
                let style = if *level == 1 {
                    heading.add_modifier(Modifier::BOLD)
                } else {
                    heading
                };
                lines.push(runs_line(runs, style));
            }
            Block::Bullets(items) => {
                for item in items {
                    let mut spans = vec![Span::styled("  • ", body)];
                    spans.extend(item.iter().map(|run| run_span(run, body)));
                    lines.push(Line::from(spans));
                }
            }
            Block::Paragraph(runs) => lines.push(runs_line(runs, body)),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_blocks;

    #[test]
    fn blocks_render_with_separating_blank_lines() {
        let blocks = parse_blocks("# Title\n\nBody text\n\n- one\n- two");
        let lines = content_lines(&blocks, Style::default(), Style::default());

        let rendered: Vec<String> = lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Title".to_string(),
                String::new(),
                "Body text".to_string(),
                String::new(),
                "  • one".to_string(),
                "  • two".to_string(),
            ]
        );
    }

    #[test]
    fn bold_runs_carry_the_bold_modifier() {
        let blocks = parse_blocks("plain **strong** more");
        let lines = content_lines(&blocks, Style::default(), Style::default());

        assert_eq!(lines.len(), 1);
        let strong = &lines[0].spans[1];
        assert_eq!(strong.content.as_ref(), "strong");
        assert!(strong.style.add_modifier.contains(Modifier::BOLD));
    }
}
