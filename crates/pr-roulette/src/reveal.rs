//! Special reveal media for particular selections.

use std::collections::HashMap;

use pr_core::CharacterId;

use crate::engine::SelectionResult;

/// Maps a character and persona name to a media asset played on reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealTable {
    entries: HashMap<(CharacterId, String), String>,
}

impl RevealTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reveals shipped with the built-in roster.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (id, persona, asset) in [
            (
                2,
                "黑兽-卯魁首",
                "assets/videos/faust_mao_kui_shou.mp4",
            ),
            (
                5,
                "拇指东部指挥官IIII",
                "assets/videos/meursault_thumbs.mp4",
            ),
            (
                6,
                "鸿园的君主",
                "assets/videos/Hong_Lu_Hong_Yuan_The_King.mp4",
            ),
            (
                9,
                "脑叶公司E.G.O:泪锋之剑",
                "assets/videos/rodion_tear_sword.mp4",
            ),
        ] {
            table.insert(CharacterId(id), persona, asset);
        }
        table
    }

    /// Add or replace a reveal.
    pub fn insert(
        &mut self,
        character: CharacterId,
        persona: impl Into<String>,
        asset: impl Into<String>,
    ) {
        self.entries
            .insert((character, persona.into()), asset.into());
    }

    /// The asset for a selection, if it has one.
    pub fn lookup(&self, selection: &SelectionResult) -> Option<&str> {
        self.entries
            .get(&(selection.character_id, selection.persona.name.clone()))
            .map(String::as_str)
    }

    /// Number of reveals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
