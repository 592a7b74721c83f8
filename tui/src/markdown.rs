use quarry_analyze_client::PageRef;
use quarry_core::Block;
use quarry_core::ConversationSession;
use quarry_core::Document;
use quarry_core::MessageContent;
use ratatui::style::Stylize;
use ratatui::text::Line;

/// Flattens a segmented answer into styled lines: section titles in magenta
/// (the first one bold), code blocks in cyan with a dim language tag, plain
/// paragraphs untouched.
pub fn document_lines(document: &Document) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, section) in document.sections.iter().enumerate() {
        if !section.title.is_empty() {
            let title = section.title.clone();
            if idx == 0 {
                lines.push(Line::from(title.magenta().bold()));
            } else {
                lines.push(Line::from(title.magenta()));
            }
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => lines.push(Line::from(text.clone())),
                Block::Code { language, body } => {
                    if !language.is_empty() {
                        lines.push(Line::from(language.clone().dim()));
                    }
                    for code_line in body.lines() {
                        lines.push(Line::from(code_line.to_string().cyan()));
                    }
                }
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

pub fn central_pages_lines(pages: &[PageRef]) -> Vec<Line<'static>> {
    if pages.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![Line::from("Most Central Pages:".bold())];
    for page in pages {
        lines.push(Line::from(vec![
            "  • ".into(),
            page.title.clone().cyan(),
            "  ".into(),
            page.url.clone().dim(),
        ]));
    }
    lines
}

/// The whole conversation, oldest first, with a speaker label per message and
/// a blank separator line after each one.
pub fn transcript_lines(session: &ConversationSession) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in session.messages() {
        match &message.content {
            MessageContent::UserText(text) => {
                lines.push(Line::from("You:".cyan().bold()));
                for text_line in text.lines() {
                    lines.push(Line::from(text_line.to_string()));
                }
            }
            MessageContent::AssistantAnswer {
                document,
                central_pages,
            } => {
                lines.push(Line::from("LLM:".magenta().bold()));
                lines.extend(document_lines(document));
                lines.extend(central_pages_lines(central_pages));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;
    use quarry_analyze_client::AnalyzeResponse;
    use quarry_core::Section;

    #[test]
    fn titles_paragraphs_and_code_each_get_their_style() {
        let document = Document {
            sections: vec![
                Section {
                    title: "Answer".to_string(),
                    blocks: vec![Block::Paragraph("plain text".to_string())],
                },
                Section {
                    title: "Example".to_string(),
                    blocks: vec![Block::Code {
                        language: "python".to_string(),
                        body: "print(1)\nprint(2)".to_string(),
                    }],
                },
            ],
        };

        let expected = vec![
            Line::from("Answer".to_string().magenta().bold()),
            Line::from("plain text"),
            Line::from(""),
            Line::from("Example".to_string().magenta()),
            Line::from("python".to_string().dim()),
            Line::from("print(1)".to_string().cyan()),
            Line::from("print(2)".to_string().cyan()),
            Line::from(""),
        ];
        assert_eq!(document_lines(&document), expected);
    }

    #[test]
    fn untitled_sections_and_untagged_code_render_without_extra_lines() {
        let document = Document {
            sections: vec![Section {
                title: String::new(),
                blocks: vec![Block::Code {
                    language: String::new(),
                    body: "x = 1".to_string(),
                }],
            }],
        };

        let expected = vec![Line::from("x = 1".to_string().cyan()), Line::from("")];
        assert_eq!(document_lines(&document), expected);
    }

    #[test]
    fn central_pages_render_as_a_bulleted_list() {
        assert_eq!(central_pages_lines(&[]), Vec::<Line>::new());

        let pages = vec![PageRef {
            title: "Rust".to_string(),
            url: "https://en.wikipedia.org/wiki/Rust".to_string(),
        }];
        let expected = vec![
            Line::from("Most Central Pages:".bold()),
            Line::from(vec![
                "  • ".into(),
                "Rust".to_string().cyan(),
                "  ".into(),
                "https://en.wikipedia.org/wiki/Rust".to_string().dim(),
            ]),
        ];
        assert_eq!(central_pages_lines(&pages), expected);
    }

    #[test]
    fn transcript_labels_each_speaker() {
        let mut session = ConversationSession::new();
        let pending = session.begin("why is the sky blue?").unwrap();
        session.resolve(
            pending,
            Ok(AnalyzeResponse {
                summary: "## Scattering\nShort wavelengths scatter more.".to_string(),
                central_pages: Vec::new(),
            }),
        );

        let lines = transcript_lines(&session);
        assert_eq!(lines[0], Line::from("You:".cyan().bold()));
        assert_eq!(lines[1], Line::from("why is the sky blue?"));
        assert_eq!(lines[2], Line::from(""));
        assert_eq!(lines[3], Line::from("LLM:".magenta().bold()));
        assert_eq!(
            lines[4],
            Line::from("Scattering".to_string().magenta().bold())
        );
        assert_eq!(lines[5], Line::from("Short wavelengths scatter more."));
    }
}
