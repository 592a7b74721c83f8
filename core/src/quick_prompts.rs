use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The four fixed prompts offered as cards while the transcript is empty.
/// Submitting one goes through the ordinary session contract; the only
/// difference is where the question text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum QuickPrompt {
    // Enum order is presentation order in the card grid.
    Illustration,
    Summarize,
    Gratitude,
    Explain,
}

impl QuickPrompt {
    /// The canned question submitted when this card is chosen.
    pub fn prompt_text(self) -> &'static str {
        match self {
            QuickPrompt::Illustration => "Create an illustration for a bakery",
            QuickPrompt::Summarize => "Summarize a long document",
            QuickPrompt::Gratitude => "Thank my interviewer",
            QuickPrompt::Explain => "Explain nostalgia to a kindergartener",
        }
    }

    /// Key the renderer maps to a card glyph. Kept as plain data so this
    /// crate stays presentation-free.
    pub fn icon_key(self) -> &'static str {
        match self {
            QuickPrompt::Illustration => "image",
            QuickPrompt::Summarize => "document",
            QuickPrompt::Gratitude => "pen",
            QuickPrompt::Explain => "school",
        }
    }
}

/// All prompts in presentation order.
pub fn all_quick_prompts() -> Vec<QuickPrompt> {
    QuickPrompt::iter().collect()
}
