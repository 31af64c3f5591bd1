//! Script detection for choosing prompt templates

/// Language of the instruction templates used for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Japanese,
    English,
}

impl Language {
    /// Japanese when the text contains any kana or CJK ideograph, else English
    pub fn detect(text: &str) -> Self {
        if contains_japanese(text) {
            Language::Japanese
        } else {
            Language::English
        }
    }
}

/// True if any character is Hiragana, Katakana, CJK Unified or CJK Extension A
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x3040..=0x309F   // Hiragana
            | 0x30A0..=0x30FF // Katakana
            | 0x4E00..=0x9FAF // CJK Unified Ideographs
            | 0x3400..=0x4DBF // CJK Extension A
        )
    })
}
