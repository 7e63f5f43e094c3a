use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The eleven card categories dealt to every player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Profession,
    Bio,
    Health,
    Hobby,
    Phobia,
    Personality,
    ExtraInfo,
    Knowledge,
    Luggage,
    ActionCard,
    ConditionCard,
}

/// Canonical dealing order. Players receive cards category by category in
/// this order, which keeps a seeded deal byte-for-byte reproducible.
pub const CARD_CATEGORY_ORDER: [CardCategory; 11] = [
    CardCategory::Profession,
    CardCategory::Bio,
    CardCategory::Health,
    CardCategory::Hobby,
    CardCategory::Phobia,
    CardCategory::Personality,
    CardCategory::ExtraInfo,
    CardCategory::Knowledge,
    CardCategory::Luggage,
    CardCategory::ActionCard,
    CardCategory::ConditionCard,
];

impl CardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardCategory::Profession => "Profession",
            CardCategory::Bio => "Bio",
            CardCategory::Health => "Health",
            CardCategory::Hobby => "Hobby",
            CardCategory::Phobia => "Phobia",
            CardCategory::Personality => "Personality",
            CardCategory::ExtraInfo => "ExtraInfo",
            CardCategory::Knowledge => "Knowledge",
            CardCategory::Luggage => "Luggage",
            CardCategory::ActionCard => "ActionCard",
            CardCategory::ConditionCard => "ConditionCard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Profession" => Some(CardCategory::Profession),
            "Bio" => Some(CardCategory::Bio),
            "Health" => Some(CardCategory::Health),
            "Hobby" => Some(CardCategory::Hobby),
            "Phobia" => Some(CardCategory::Phobia),
            "Personality" => Some(CardCategory::Personality),
            "ExtraInfo" => Some(CardCategory::ExtraInfo),
            "Knowledge" => Some(CardCategory::Knowledge),
            "Luggage" => Some(CardCategory::Luggage),
            "ActionCard" => Some(CardCategory::ActionCard),
            "ConditionCard" => Some(CardCategory::ConditionCard),
            _ => None,
        }
    }

    /// Action and condition cards draw with replacement; every other
    /// category is dealt without replacement across the whole game.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, CardCategory::ActionCard | CardCategory::ConditionCard)
    }
}

/// Per-lobby enabled-category map. Always carries all eleven categories;
/// missing entries in client input default to enabled. Serializes as a
/// JSON object keyed by category name, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryToggles(Vec<(CardCategory, bool)>);

impl Serialize for CategoryToggles {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, enabled) in &self.0 {
            map.serialize_entry(category.as_str(), enabled)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryToggles {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let partial = HashMap::<CardCategory, bool>::deserialize(deserializer)?;
        Ok(Self::normalize(Some(&partial)))
    }
}

impl CategoryToggles {
    /// Build a full map from a partial client-provided one.
    pub fn normalize(partial: Option<&HashMap<CardCategory, bool>>) -> Self {
        let entries = CARD_CATEGORY_ORDER
            .iter()
            .map(|category| {
                let enabled = partial
                    .and_then(|map| map.get(category).copied())
                    .unwrap_or(true);
                (*category, enabled)
            })
            .collect();
        Self(entries)
    }

    pub fn is_enabled(&self, category: CardCategory) -> bool {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, enabled)| *enabled)
            .unwrap_or(true)
    }

    /// Enabled categories in canonical order.
    pub fn enabled(&self) -> Vec<CardCategory> {
        CARD_CATEGORY_ORDER
            .iter()
            .copied()
            .filter(|category| self.is_enabled(*category))
            .collect()
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().len()
    }

    /// Stable JSON rendering used as RNG seed material. Entries are kept in
    /// canonical category order so the same toggles always serialize the
    /// same way.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self::normalize(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_missing_categories_to_enabled() {
        let mut partial = HashMap::new();
        partial.insert(CardCategory::Hobby, false);

        let toggles = CategoryToggles::normalize(Some(&partial));

        assert!(!toggles.is_enabled(CardCategory::Hobby));
        assert!(toggles.is_enabled(CardCategory::Profession));
        assert_eq!(toggles.enabled_count(), 10);
    }

    #[test]
    fn canonical_json_is_stable_across_input_order() {
        let mut a = HashMap::new();
        a.insert(CardCategory::Luggage, false);
        a.insert(CardCategory::Bio, true);
        let mut b = HashMap::new();
        b.insert(CardCategory::Bio, true);
        b.insert(CardCategory::Luggage, false);

        let left = CategoryToggles::normalize(Some(&a)).canonical_json();
        let right = CategoryToggles::normalize(Some(&b)).canonical_json();

        assert_eq!(left, right);
    }

    #[test]
    fn repeatable_categories_are_action_and_condition() {
        let repeatable: Vec<_> = CARD_CATEGORY_ORDER
            .iter()
            .filter(|c| c.is_repeatable())
            .collect();
        assert_eq!(
            repeatable,
            vec![&CardCategory::ActionCard, &CardCategory::ConditionCard]
        );
    }
}
