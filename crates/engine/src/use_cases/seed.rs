//! Default character seeding.
//!
//! On an empty store the sheet starts with R'aan Fames and the four Path of
//! Gluttony techniques.

use std::collections::BTreeMap;

use spiritdice_domain::{ActionType, Character, SpEffectTier};

use crate::use_cases::characters::{CharacterError, CharacterOps, CreateCharacterInput};
use crate::use_cases::techniques::{CreateTechniqueInput, TechniqueError, TechniqueOps};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to seed character: {0}")]
    Character(#[from] CharacterError),
    #[error("Failed to seed technique: {0}")]
    Technique(#[from] TechniqueError),
}

const DEFAULT_NAME: &str = "R'aan Fames";
const DEFAULT_PATH: &str = "Path of Gluttony";
const DEFAULT_LEVEL: i64 = 8;

/// Seed the default character unless any character already exists.
///
/// Returns the seeded character, or `None` when nothing was done.
pub async fn seed_default_character(
    characters: &CharacterOps,
    techniques: &TechniqueOps,
) -> Result<Option<Character>, SeedError> {
    if !characters.list().await?.is_empty() {
        tracing::debug!("Characters present, skipping default seed");
        return Ok(None);
    }

    let character = characters
        .create(CreateCharacterInput {
            name: DEFAULT_NAME.to_string(),
            path: DEFAULT_PATH.to_string(),
            level: Some(DEFAULT_LEVEL),
        })
        .await?;

    for technique in default_techniques() {
        techniques.create(character.id(), technique).await?;
    }

    tracing::info!(
        character_id = %character.id(),
        name = DEFAULT_NAME,
        "Seeded default character"
    );
    Ok(Some(character))
}

fn technique(
    name: &str,
    trigger: &str,
    action_type: ActionType,
    tiers: &[(u32, &str)],
) -> CreateTechniqueInput {
    CreateTechniqueInput {
        name: name.to_string(),
        trigger_type: Some(action_type),
        trigger_description: trigger.to_string(),
        sp_effects: tiers
            .iter()
            .map(|(sp, effect)| (*sp, SpEffectTier::new(*effect, action_type)))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn default_techniques() -> Vec<CreateTechniqueInput> {
    vec![
        technique(
            "Omnivore",
            "You activate this technique as a reaction when you reduce a creature to 0HP.",
            ActionType::Reaction,
            &[
                (1, "You gain 5 temporary hit points."),
                (3, "You grow in size by one stage. Melee attacks now deal 1d4 extra damage, and you have advantage on strength checks and saving throws."),
                (4, "You regain HP equal to 3d8 + your Spiritual Arts modifier"),
                (6, "You gain the ability to absorb one technique from the target - stealing for yourself, temporarily. See Technique Drain for full details. At 6SP, the stolen Technique lasts for one hour, or until you use it."),
            ],
        ),
        technique(
            "Tongue Lash",
            "You activate this technique as a Bonus Action.",
            ActionType::Bonus,
            &[
                (2, "Your tongue has a 15ft range. The target gains one level of Grung Toxin. Make an attack roll with your Spiritual Arts modifier against a creature within range. You only expend a Spirit Die if the attack makes contact."),
                (3, "Your tongue deals 2d6 poison damage"),
                (4, "Your tongue now has a range of 25ft. You inflict two levels of Grung Toxin."),
                (6, "Your tongue now deals 5d6 poison damage. The target must make a Strength saving throw - on a fail, you may choose to either grapple the target (with your tongue) or knock them prone."),
            ],
        ),
        technique(
            "The Thrill of the Hunt",
            "You activate this technique as a reaction, when you cause damage to a target.",
            ActionType::Reaction,
            &[
                (4, "Your speed increases by 10ft. You have an additional +1 to hit with melee attacks. Your extra bite attack deals 1d8+Wis poison damage. When you activate this technique, you target a creature within 30ft - this creature becomes the target of your hunger."),
                (6, "All hits with a melee weapon deal 1d8 extra damage. If you are within 20ft of the target of your hunt, attack rolls are made against you with disadvantage. You are invisible to the target of your hunt outside of this range."),
            ],
        ),
        technique(
            "Bear's Ferocity",
            "Once you activate this technique, you must make a melee attack against a creature on each of your turns.",
            ActionType::Action,
            &[
                (2, "You grow sharp and your fangs increase in length, becoming natural weapons which deal 1d8 damage. If you make a second attack with your bonus action as part of two weapon fighting, add your full modifier."),
                (4, "Your natural weapons receive a +2 bonus to attack and damage. You gain the Extra Attack feature. Once per turn, when you hit with one of these attacks, you can force the target to make a Con saving throw. On a fail, you inflict one level of Grung Toxin."),
                (6, "Your natural weapons now inflict 1d12 damage, and their modifier increases to +3. Your size increases by one stage, and your range increases by 5ft. You are immune to the effects of Mind Control"),
            ],
        ),
    ]
}
