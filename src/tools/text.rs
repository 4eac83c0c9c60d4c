use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCount {
    pub characters: usize,
    pub characters_without_spaces: usize,
    pub words: usize,
    pub lines: usize,
    pub bytes: usize,
}

pub fn count(text: &str) -> TextCount {
    TextCount {
        characters: text.chars().count(),
        characters_without_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        words: text.split_whitespace().count(),
        lines: text.lines().count(),
        bytes: text.len(),
    }
}
