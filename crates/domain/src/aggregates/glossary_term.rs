//! Glossary term - a keyword definition kept on a character sheet

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, GlossaryTermId};
use crate::value_objects::{Definition, Keyword};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    id: GlossaryTermId,
    character_id: CharacterId,
    keyword: Keyword,
    definition: Definition,
}

impl GlossaryTerm {
    pub fn new(character_id: CharacterId, keyword: Keyword, definition: Definition) -> Self {
        Self {
            id: GlossaryTermId::new(),
            character_id,
            keyword,
            definition,
        }
    }

    pub fn id(&self) -> GlossaryTermId {
        self.id
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn with_id(mut self, id: GlossaryTermId) -> Self {
        self.id = id;
        self
    }

    pub fn set_keyword(&mut self, keyword: Keyword) {
        self.keyword = keyword;
    }

    pub fn set_definition(&mut self, definition: Definition) {
        self.definition = definition;
    }

    /// Case-insensitive keyword comparison, used for duplicate detection.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.keyword.as_str().eq_ignore_ascii_case(keyword.trim())
    }
}
