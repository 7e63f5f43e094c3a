//! Card dealer.
//!
//! Consumes the category pools and a seeded RNG to assign one card per
//! enabled category per player. Non-repeatable categories draw without
//! replacement across the whole deal; exhausted pools fall back to
//! generated placeholder values so dealing never fails.

use std::collections::{HashMap, HashSet};

use rand_chacha::ChaCha8Rng;

use crate::domain::services::card_pool::category_pool;
use crate::domain::services::seed::draw_index;
use crate::domain::entities::LobbyPlayer;
use crate::domain::value_objects::{CardCategory, CategoryToggles, CARD_CATEGORY_ORDER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealtCard {
    pub category: CardCategory,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealtPlayer {
    pub number: i64,
    pub nickname: String,
    pub discord_id: Option<String>,
    pub cards: Vec<DealtCard>,
}

/// Deal one card per enabled category to every roster entry. Players are
/// processed in ascending seat order and categories in canonical order,
/// so output depends only on the RNG state.
pub fn deal_cards(
    roster: &[LobbyPlayer],
    enabled: &CategoryToggles,
    rng: &mut ChaCha8Rng,
) -> Vec<DealtPlayer> {
    let mut used: HashMap<CardCategory, HashSet<String>> = HashMap::new();
    let mut fallback_counters: HashMap<CardCategory, u32> = HashMap::new();
    for category in CARD_CATEGORY_ORDER {
        if enabled.is_enabled(category) {
            used.insert(category, HashSet::new());
            fallback_counters.insert(category, 0);
        }
    }

    let mut ordered: Vec<&LobbyPlayer> = roster.iter().collect();
    ordered.sort_by_key(|player| player.number);

    ordered
        .into_iter()
        .map(|player| {
            let cards = CARD_CATEGORY_ORDER
                .iter()
                .filter(|category| enabled.is_enabled(**category))
                .map(|category| draw_card(*category, &mut used, &mut fallback_counters, rng))
                .collect();

            DealtPlayer {
                number: player.number,
                nickname: player.nickname.clone(),
                discord_id: player.discord_id.clone(),
                cards,
            }
        })
        .collect()
}

fn draw_card(
    category: CardCategory,
    used: &mut HashMap<CardCategory, HashSet<String>>,
    fallback_counters: &mut HashMap<CardCategory, u32>,
    rng: &mut ChaCha8Rng,
) -> DealtCard {
    let pool = category_pool(category);
    let mut value: Option<String> = None;

    if category.is_repeatable() {
        if !pool.is_empty() {
            let index = draw_index(rng, pool.len());
            value = Some(pool[index].to_string());
        }
    } else {
        let taken = used.entry(category).or_default();
        let available: Vec<&&str> = pool.iter().filter(|item| !taken.contains(**item)).collect();
        if !available.is_empty() {
            let index = draw_index(rng, available.len());
            value = Some(available[index].to_string());
        }
    }

    let value = value.unwrap_or_else(|| {
        let counter = fallback_counters.entry(category).or_insert(0);
        *counter += 1;
        format!("{} - Generated {}", category.as_str(), counter)
    });

    if !category.is_repeatable() {
        used.entry(category).or_default().insert(value.clone());
    }

    DealtCard { category, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::seed::seeded_rng;
    use std::collections::HashMap as StdHashMap;

    fn roster(count: usize) -> Vec<LobbyPlayer> {
        (1..=count)
            .map(|n| LobbyPlayer {
                id: format!("lp-{n}"),
                lobby_id: "lobby-1".into(),
                number: n as i64,
                nickname: format!("Player {n}"),
                discord_id: None,
            })
            .collect()
    }

    #[test]
    fn deal_is_reproducible_for_a_fixed_seed() {
        let players = roster(4);
        let enabled = CategoryToggles::default();

        let first = deal_cards(&players, &enabled, &mut seeded_rng("deal-test"));
        let second = deal_cards(&players, &enabled, &mut seeded_rng("deal-test"));

        assert_eq!(first, second);
    }

    #[test]
    fn every_player_gets_one_card_per_enabled_category() {
        let mut partial = StdHashMap::new();
        partial.insert(CardCategory::Luggage, false);
        let enabled = CategoryToggles::normalize(Some(&partial));

        let dealt = deal_cards(&roster(3), &enabled, &mut seeded_rng("coverage"));

        for player in &dealt {
            assert_eq!(player.cards.len(), enabled.enabled_count());
            assert!(player
                .cards
                .iter()
                .all(|card| card.category != CardCategory::Luggage));
        }
    }

    #[test]
    fn non_repeatable_values_are_distinct_up_to_pool_size() {
        // Profession pool has 3 entries; with 3 players all values differ.
        let dealt = deal_cards(&roster(3), &CategoryToggles::default(), &mut seeded_rng("distinct"));

        let professions: Vec<&str> = dealt
            .iter()
            .flat_map(|p| &p.cards)
            .filter(|c| c.category == CardCategory::Profession)
            .map(|c| c.value.as_str())
            .collect();

        let unique: HashSet<&str> = professions.iter().copied().collect();
        assert_eq!(unique.len(), professions.len());
    }

    #[test]
    fn exhausted_pool_falls_back_to_generated_values() {
        // 5 players against a 3-entry profession pool: the last two draws
        // must be generated, with strictly increasing counters.
        let dealt = deal_cards(&roster(5), &CategoryToggles::default(), &mut seeded_rng("fallback"));

        let professions: Vec<&str> = dealt
            .iter()
            .flat_map(|p| &p.cards)
            .filter(|c| c.category == CardCategory::Profession)
            .map(|c| c.value.as_str())
            .collect();

        assert_eq!(professions.len(), 5);
        let generated: Vec<&str> = professions
            .iter()
            .copied()
            .filter(|v| v.starts_with("Profession - Generated "))
            .collect();
        assert_eq!(generated, vec!["Profession - Generated 1", "Profession - Generated 2"]);

        let from_pool: HashSet<&str> = professions
            .iter()
            .copied()
            .filter(|v| !v.starts_with("Profession - Generated "))
            .collect();
        assert_eq!(from_pool.len(), 3);
    }

    #[test]
    fn players_are_dealt_in_seat_order_regardless_of_input_order() {
        let mut players = roster(4);
        players.reverse();

        let shuffled = deal_cards(&players, &CategoryToggles::default(), &mut seeded_rng("order"));
        let ordered = deal_cards(&roster(4), &CategoryToggles::default(), &mut seeded_rng("order"));

        assert_eq!(shuffled, ordered);
        assert_eq!(
            shuffled.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }
}
