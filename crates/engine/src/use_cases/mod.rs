//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate repositories and the domain to fulfill user stories.

pub mod active_effects;
pub mod characters;
pub mod glossary;
pub mod portraits;
pub mod seed;
pub mod spirit_dice;
pub mod techniques;

pub use active_effects::{ActiveEffectError, ActiveEffectOps, CreateActiveEffectInput};
pub use characters::{CharacterError, CharacterOps, CreateCharacterInput, UpdateCharacterInput};
pub use glossary::{GlossaryError, GlossaryOps, UpdateGlossaryTermInput};
pub use portraits::{PortraitError, PortraitOps};
pub use seed::{seed_default_character, SeedError};
pub use spirit_dice::{SpiritDiceError, SpiritDiceUseCases};
pub use techniques::{CreateTechniqueInput, TechniqueError, TechniqueOps, UpdateTechniqueInput};
