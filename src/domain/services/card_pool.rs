//! Static card and scenario pools.
//!
//! Pure data. Dealing and scenario selection consume these through the
//! seeded RNG in `seed`/`dealer`.

use crate::domain::value_objects::CardCategory;

/// An apocalypse/bunker scenario pair.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioPair {
    pub apocalypse: &'static str,
    pub bunker: &'static str,
}

pub const SCENARIO_POOL: &[ScenarioPair] = &[
    ScenarioPair {
        apocalypse: "Asteroid Impact",
        bunker: "Mountain Shelter",
    },
    ScenarioPair {
        apocalypse: "Global Pandemic",
        bunker: "Underground Labs",
    },
    ScenarioPair {
        apocalypse: "Solar Flare Catastrophe",
        bunker: "Polar Research Vault",
    },
    ScenarioPair {
        apocalypse: "Alien Invasion",
        bunker: "Desert Command Center",
    },
    ScenarioPair {
        apocalypse: "Global Flood",
        bunker: "Floating Ark",
    },
    ScenarioPair {
        apocalypse: "Nuclear Winter",
        bunker: "Subterranean Metro Complex",
    },
    ScenarioPair {
        apocalypse: "Rogue AI Takeover",
        bunker: "Faraday-Caged Server Farm",
    },
    ScenarioPair {
        apocalypse: "Supervolcano Eruption",
        bunker: "Abandoned Salt Mine",
    },
];

/// Ending texts drawn once per game.
pub const ENDING_POOL: &[&str] = &[
    "The bunker doors open to a world reborn; the survivors rebuild together.",
    "Supplies ran out early, but an old radio led the group to another colony.",
    "The shelter held, barely. Years later its residents found the surface green again.",
    "A hidden exit tunnel saved everyone when the main gate finally failed.",
    "The survivors split over rationing; only the patient half saw the sunrise.",
    "An unexpected thaw came in the third year, and the bunker emptied overnight.",
    "The group's improvised greenhouse outlasted the catastrophe itself.",
    "Rescue never came, so the survivors became the rescue for everyone else.",
];

/// Default flavor-text pool per category.
pub fn category_pool(category: CardCategory) -> &'static [&'static str] {
    match category {
        CardCategory::Profession => &["Biologist", "Engineer", "Artist"],
        CardCategory::Bio => &["Age 25", "Age 35", "Age 42"],
        CardCategory::Health => &["Perfect health", "Asthma", "Diabetic"],
        CardCategory::Hobby => &["Gardening", "Chess", "Rock climbing"],
        CardCategory::Phobia => &["Fear of heights", "Claustrophobic", "Fear of spiders"],
        CardCategory::Personality => &["Optimistic", "Pessimistic", "Leader"],
        CardCategory::ExtraInfo => &["Knows first aid", "Won a lottery", "Is a twin"],
        CardCategory::Knowledge => &["Survival skills", "Medical training", "Mechanical skills"],
        CardCategory::Luggage => &["Backpack of tools", "Suitcase of clothes", "Box of canned food"],
        CardCategory::ActionCard => &["Swap a card", "Peek at a card", "Trade information"],
        CardCategory::ConditionCard => &["Lose a turn", "Share a secret", "Reveal a card"],
    }
}
