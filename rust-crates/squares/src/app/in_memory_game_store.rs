use crate::{
    Game,
    GameId,
    Mutation,
    app::game_store::{
        GameStore,
        SnapshotNotifier,
        WatchSubscription,
        WriteOutcome,
        check_replace,
        next_revision,
    },
};
use anyhow::anyhow;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
    },
};

/// Shared in-process store. Clones see the same games.
#[derive(Clone, Default)]
pub struct InMemoryGameStore {
    games: Arc<Mutex<HashMap<GameId, Game>>>,
    notifier: SnapshotNotifier,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_game(game_id: GameId, game: Game) -> Self {
        let store = Self::new();
        if let Ok(mut games) = store.games.lock() {
            games.insert(game_id, game);
        }
        store
    }

    fn lock(&self) -> crate::Result<MutexGuard<'_, HashMap<GameId, Game>>> {
        self.games
            .lock()
            .map_err(|_| anyhow!("in-memory game store lock poisoned"))
    }
}

impl GameStore for InMemoryGameStore {
    type Subscription = WatchSubscription;

    fn load_game(&self, game_id: &GameId) -> crate::Result<Option<Game>> {
        Ok(self.lock()?.get(game_id).cloned())
    }

    fn create_document(&mut self, game_id: &GameId, game: &Game) -> crate::Result<Option<Game>> {
        let mut games = self.lock()?;
        if games.contains_key(game_id) {
            return Ok(None);
        }
        let stored = Game {
            revision: next_revision(None, game),
            ..game.clone()
        };
        games.insert(game_id.clone(), stored.clone());
        self.notifier.publish(game_id, &stored)?;
        Ok(Some(stored))
    }

    fn write_document(&mut self, game_id: &GameId, game: &Game) -> crate::Result<WriteOutcome> {
        let mut games = self.lock()?;
        let existing = games.get(game_id);
        if let Err(reason) = check_replace(existing, game) {
            let current = existing.cloned().unwrap_or_else(|| game.clone());
            return Ok(WriteOutcome::Rejected { current, reason });
        }
        let stored = Game {
            revision: next_revision(existing, game),
            ..game.clone()
        };
        games.insert(game_id.clone(), stored.clone());
        self.notifier.publish(game_id, &stored)?;
        Ok(WriteOutcome::Applied(stored))
    }

    fn apply(
        &mut self,
        game_id: &GameId,
        mutation: &Mutation,
    ) -> crate::Result<WriteOutcome> {
        let mut games = self.lock()?;
        let Some(current) = games.get(game_id) else {
            return Ok(WriteOutcome::Missing);
        };
        let mut next = current.clone();
        if let Err(reason) = mutation.apply_to(&mut next) {
            return Ok(WriteOutcome::Rejected {
                current: current.clone(),
                reason,
            });
        }
        next.revision = current.revision + 1;
        games.insert(game_id.clone(), next.clone());
        self.notifier.publish(game_id, &next)?;
        Ok(WriteOutcome::Applied(next))
    }

    fn subscribe(&self, game_id: &GameId) -> crate::Result<WatchSubscription> {
        let current = self.load_game(game_id)?;
        self.notifier.subscribe(game_id, current)
    }
}
