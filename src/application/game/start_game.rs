use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{
    event_types, Card, CardPayload, Game, GameAdmin, GameAdminRole, GameEvent, Lobby, Player,
    PlayerRole, PlayerStatus,
};
use crate::domain::repositories::{GameRepository, LobbyRepository, RepositoryError};
use crate::domain::services::card_pool::SCENARIO_POOL;
use crate::domain::services::dealer::{deal_cards, DealtPlayer};
use crate::domain::services::seed::{draw_index, lobby_seed_material, seeded_rng};
use crate::application::game::get_game::{GameDetails, PlayerWithCards};
use crate::infrastructure::discord::DiscordClient;

/// Start game input
pub struct StartGameInput {
    pub lobby_id: String,
    /// Identity of the host starting the game; recorded as the initial
    /// HOST admin when present.
    pub host_user_id: Option<String>,
}

/// Start game use case. Creates the game, its players, their cards and the
/// host admin record in one transaction, then notifies Discord best-effort.
pub struct StartGame<L: LobbyRepository, G: GameRepository> {
    lobby_repo: Arc<L>,
    game_repo: Arc<G>,
    discord: Arc<DiscordClient>,
}

impl<L: LobbyRepository, G: GameRepository> StartGame<L, G> {
    pub fn new(lobby_repo: Arc<L>, game_repo: Arc<G>, discord: Arc<DiscordClient>) -> Self {
        Self {
            lobby_repo,
            game_repo,
            discord,
        }
    }

    pub async fn execute(&self, input: StartGameInput) -> Result<GameDetails, StartGameError> {
        let lobby = self
            .lobby_repo
            .find_by_id(&input.lobby_id)
            .await?
            .ok_or(StartGameError::LobbyNotFound)?;

        let roster = self.lobby_repo.get_players(&input.lobby_id).await?;
        if roster.is_empty() {
            return Err(StartGameError::Validation(
                "Cannot start game without players".into(),
            ));
        }

        if self.lobby_repo.find_game_id(&input.lobby_id).await?.is_some() {
            return Err(StartGameError::Validation("Game already started".into()));
        }

        let material = lobby_seed_material(&lobby);
        let mut rng = seeded_rng(&material);

        // Apocalypse and bunker are two independent draws over the pool's
        // columns, so a game can mix columns of different pairs.
        let apocalypse =
            SCENARIO_POOL[draw_index(&mut rng, SCENARIO_POOL.len())].apocalypse.to_string();
        let bunker = SCENARIO_POOL[draw_index(&mut rng, SCENARIO_POOL.len())].bunker.to_string();
        let seats = (roster.len() / 2) as u32;

        let dealt = deal_cards(&roster, &lobby.enabled_categories, &mut rng);

        let game = Game::new(
            Uuid::new_v4().to_string(),
            lobby.id.clone(),
            apocalypse,
            bunker,
            seats,
        );

        let players: Vec<(Player, Vec<Card>)> = dealt
            .iter()
            .map(|dealt_player| build_player(&game.id, dealt_player))
            .collect();

        let host_admin = input.host_user_id.as_ref().map(|user_id| {
            GameAdmin::new(
                Uuid::new_v4().to_string(),
                game.id.clone(),
                user_id.clone(),
                GameAdminRole::Host,
            )
        });

        let started_event = GameEvent::new(
            &game.id,
            event_types::GAME_STARTED,
            serde_json::json!({
                "apocalypse": game.apocalypse,
                "bunker": game.bunker,
                "seats": game.seats,
                "players": roster.len(),
            }),
        );

        let created = self
            .game_repo
            .create_game(&game, &players, host_admin.as_ref(), &started_event)
            .await;

        match created {
            Ok(()) => {}
            // Another caller won the race past our existence check; the
            // storage constraint is the authoritative rejection.
            Err(RepositoryError::AlreadyExists(_)) => {
                return Err(StartGameError::Validation("Game already started".into()));
            }
            Err(e) => return Err(e.into()),
        }

        // Notification failures must never roll back the persisted game.
        if let Err(error) = self.send_discord_notifications(&game, &players, &lobby).await {
            tracing::warn!(%error, game_id = %game.id, "failed to send game start notifications");
        }

        Ok(GameDetails {
            game,
            players: players
                .into_iter()
                .map(|(player, cards)| PlayerWithCards { player, cards })
                .collect(),
        })
    }

    async fn send_discord_notifications(
        &self,
        game: &Game,
        players: &[(Player, Vec<Card>)],
        lobby: &Lobby,
    ) -> Result<(), crate::infrastructure::discord::DiscordError> {
        if let Some(text_channel_id) = lobby.channels_config.text_channel_id.as_deref() {
            self.discord
                .post_to_channel(
                    text_channel_id,
                    &format!(
                        "**Apocalypse**: {}\n**Bunker**: {}",
                        game.apocalypse, game.bunker
                    ),
                )
                .await?;

            // Post the roster in chunks so long games stay within message
            // limits; card contents remain hidden here.
            for chunk in players.chunks(4) {
                let content = chunk
                    .iter()
                    .map(|(player, cards)| {
                        let lines: Vec<String> = cards
                            .iter()
                            .map(|card| format!("- {}: _hidden_", card.category.as_str()))
                            .collect();
                        format!("**{}. {}**\n{}", player.number, player.nickname, lines.join("\n"))
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n");
                self.discord.post_to_channel(text_channel_id, &content).await?;
            }
        }

        for (player, cards) in players {
            let Some(discord_id) = player.discord_id.as_deref() else {
                continue;
            };

            let mut lines = vec![
                format!("Apocalypse: {}", game.apocalypse),
                format!("Bunker: {}", game.bunker),
                "Your cards:".to_string(),
            ];
            lines.extend(
                cards
                    .iter()
                    .map(|card| format!("{}: {}", card.category.as_str(), card.payload.title)),
            );

            self.discord
                .send_direct_message(discord_id, &lines.join("\n"))
                .await?;
        }

        Ok(())
    }
}

fn build_player(game_id: &str, dealt: &DealtPlayer) -> (Player, Vec<Card>) {
    let player = Player {
        id: Uuid::new_v4().to_string(),
        game_id: game_id.to_string(),
        number: dealt.number,
        nickname: dealt.nickname.clone(),
        discord_id: dealt.discord_id.clone(),
        status: PlayerStatus::Alive,
        role: PlayerRole::Player,
    };

    let cards = dealt
        .cards
        .iter()
        .map(|card| Card {
            id: Uuid::new_v4().to_string(),
            player_id: player.id.clone(),
            category: card.category,
            payload: CardPayload::titled(card.value.clone()),
            is_open: false,
            opened_at: None,
            opened_round: None,
        })
        .collect();

    (player, cards)
}

#[derive(Debug, thiserror::Error)]
pub enum StartGameError {
    #[error("Lobby not found")]
    LobbyNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
