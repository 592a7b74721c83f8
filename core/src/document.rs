//! Segmentation of the analyze service's answer text.
//!
//! The service returns a markdown-like blob: `##` opens a section, the first
//! line of a section is its title, triple-backtick fences delimit code, and
//! everything else is one paragraph per line. This module turns that blob
//! into a typed [`Document`] with a deterministic two-pass grammar: split on
//! the section delimiter first, then line-scan each fragment for fences.
//! Segmentation is total; malformed input degrades instead of failing.
//! Trailing backticks glued onto the last code line count as fence text,
//! not code, even when a closing fence follows on its own line.

/// Marker opening and closing a fenced code block.
const FENCE: &str = "```";

/// Delimiter starting a new section.
const SECTION_DELIMITER: &str = "##";

/// One rendered answer: an ordered list of sections. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub sections: Vec<Section>,
}

/// A titled group of blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// A paragraph or code unit within a section, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// One source line with emphasis markers (`**`, `*`) stripped.
    Paragraph(String),
    /// A fenced code run. `language` is whatever followed the opening fence
    /// (possibly empty); `body` is the interior lines verbatim,
    /// newline-joined.
    Code { language: String, body: String },
}

impl Document {
    /// Segment raw answer text. Never fails: input with no delimiter becomes
    /// a single section, and empty or delimiter-only input becomes a single
    /// section with an empty title and no blocks.
    pub fn segment(raw: &str) -> Self {
        let mut sections: Vec<Section> = raw
            .split(SECTION_DELIMITER)
            .filter(|fragment| !fragment.is_empty())
            .map(segment_fragment)
            .collect();
        if sections.is_empty() {
            sections.push(Section::default());
        }
        Self { sections }
    }
}

/// Build one [`Section`] from the text between two delimiters. Blank lines
/// are dropped up front (also inside fences, matching how the service
/// formats its answers); the first surviving line is the title.
fn segment_fragment(fragment: &str) -> Section {
    let mut lines = fragment.split('\n').filter(|line| !line.is_empty());

    let title = match lines.next() {
        Some(first) => first.trim().to_string(),
        None => String::new(),
    };

    let mut blocks = Vec::new();
    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix(FENCE) {
            let language = rest.trim().to_string();
            let mut interior: Vec<&str> = Vec::new();
            for candidate in lines.by_ref() {
                if candidate.trim() == FENCE {
                    break;
                }
                interior.push(candidate);
            }
            // A closing fence glued onto the last code line (`print(1)```` ``)
            // is part of the fence, not the code, even when an own-line fence
            // closed the block. An unterminated fence has already absorbed the
            // rest of the fragment at this point.
            if let Some(last) = interior.last_mut()
                && let Some(stripped) = last.strip_suffix(FENCE)
            {
                *last = stripped;
            }
            blocks.push(Block::Code {
                language,
                body: interior.join("\n"),
            });
        } else {
            blocks.push(Block::Paragraph(strip_emphasis(line)));
        }
    }

    Section { title, blocks }
}

/// Remove `**` and `*` outright; the renderer shows plain text, not styling.
fn strip_emphasis(line: &str) -> String {
    line.replace("**", "").replace('*', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(text.to_string())
    }

    fn code(language: &str, body: &str) -> Block {
        Block::Code {
            language: language.to_string(),
            body: body.to_string(),
        }
    }

    fn section(title: &str, blocks: Vec<Block>) -> Section {
        Section {
            title: title.to_string(),
            blocks,
        }
    }

    #[test]
    fn input_without_delimiter_is_a_single_section() {
        let doc = Document::segment("Hello there");
        assert_eq!(doc.sections, vec![section("Hello there", Vec::new())]);

        let doc = Document::segment("Hello\nWorld");
        assert_eq!(
            doc.sections,
            vec![section("Hello", vec![paragraph("World")])]
        );
    }

    #[test]
    fn empty_and_delimiter_only_input_degrade_to_one_empty_section() {
        for raw in ["", "##", "####", "##\n##", "## "] {
            let doc = Document::segment(raw);
            assert_eq!(doc.sections, vec![Section::default()], "input {raw:?}");
        }
    }

    #[test]
    fn fenced_block_preserves_body_exactly() {
        let doc = Document::segment("## T\n```lang\nBODY\n```\nafter");
        assert_eq!(
            doc.sections,
            vec![section(
                "T",
                vec![code("lang", "BODY"), paragraph("after")]
            )]
        );
    }

    #[test]
    fn fenced_block_keeps_interior_indentation() {
        let doc = Document::segment("## T\n```r\n  x <- 1\n    y <- 2\n```");
        assert_eq!(
            doc.sections,
            vec![section("T", vec![code("r", "  x <- 1\n    y <- 2")])]
        );
    }

    #[test]
    fn emphasis_is_stripped_in_paragraphs_but_never_in_code() {
        let doc = Document::segment("## T\nkeep **bold** and *em*\n```\nlet x = 2 * 3; // **kept**\n```");
        assert_eq!(
            doc.sections,
            vec![section(
                "T",
                vec![
                    paragraph("keep bold and em"),
                    code("", "let x = 2 * 3; // **kept**"),
                ]
            )]
        );
    }

    #[test]
    fn two_section_example_with_code_and_emphasis() {
        let doc =
            Document::segment("## Title\nHello **world**\n```python\nprint(1)\n```\n## Next\nBye");
        assert_eq!(
            doc.sections,
            vec![
                section(
                    "Title",
                    vec![paragraph("Hello world"), code("python", "print(1)")]
                ),
                section("Next", vec![paragraph("Bye")]),
            ]
        );
    }

    #[test]
    fn glued_closing_fence_is_stripped_from_the_last_line() {
        let doc = Document::segment("## T\n```python\nprint(1)```");
        assert_eq!(
            doc.sections,
            vec![section("T", vec![code("python", "print(1)")])]
        );
    }

    #[test]
    fn glued_backticks_are_stripped_even_when_the_block_is_terminated() {
        let doc = Document::segment("## T\n```python\nprint(1)```\n```");
        assert_eq!(
            doc.sections,
            vec![section("T", vec![code("python", "print(1)")])]
        );
    }

    #[test]
    fn unterminated_fence_absorbs_the_rest_of_its_section() {
        let doc = Document::segment("## T\nintro\n```sql\nSELECT 1\nSELECT 2\n## Next\nBye");
        assert_eq!(
            doc.sections,
            vec![
                section(
                    "T",
                    vec![paragraph("intro"), code("sql", "SELECT 1\nSELECT 2")]
                ),
                section("Next", vec![paragraph("Bye")]),
            ]
        );
    }

    #[test]
    fn title_only_fragment_yields_no_blocks() {
        let doc = Document::segment("## Just a title");
        assert_eq!(doc.sections, vec![section("Just a title", Vec::new())]);
    }

    #[test]
    fn titles_are_trimmed() {
        let doc = Document::segment("##   Spaced   \nx");
        assert_eq!(doc.sections, vec![section("Spaced", vec![paragraph("x")])]);
    }

    #[test]
    fn blank_lines_are_dropped_not_joined() {
        let doc = Document::segment("## T\nfirst\n\n\nsecond");
        assert_eq!(
            doc.sections,
            vec![section("T", vec![paragraph("first"), paragraph("second")])]
        );
    }

    #[test]
    fn blank_lines_inside_fences_are_dropped_too() {
        let doc = Document::segment("## T\n```py\na = 1\n\nb = 2\n```");
        assert_eq!(
            doc.sections,
            vec![section("T", vec![code("py", "a = 1\nb = 2")])]
        );
    }

    #[test]
    fn text_before_the_first_delimiter_is_its_own_section() {
        let doc = Document::segment("intro line\n## A\nbody");
        assert_eq!(
            doc.sections,
            vec![
                section("intro line", Vec::new()),
                section("A", vec![paragraph("body")]),
            ]
        );
    }

    #[test]
    fn fence_language_may_be_empty_or_padded() {
        let doc = Document::segment("## T\n```\ncode\n```\n```  python  \npass\n```");
        assert_eq!(
            doc.sections,
            vec![section(
                "T",
                vec![code("", "code"), code("python", "pass")]
            )]
        );
    }
}
