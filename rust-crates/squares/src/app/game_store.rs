use crate::{
    BoardError,
    FieldUpdate,
    Game,
    GameId,
    Mutation,
    board::Digits,
    claim::ClaimChange,
};
use anyhow::anyhow;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The committed game, revision already bumped.
    Applied(Game),
    /// The precondition failed against `current`; nothing was written.
    Rejected { current: Game, reason: BoardError },
    Missing,
}

pub trait GameStore {
    type Subscription: GameSubscription;

    /// retrieve the latest committed copy of a game
    fn load_game(&self, game_id: &GameId) -> crate::Result<Option<Game>>;

    /// store a new game under an unused id; `None` when the id is taken
    fn create_document(&mut self, game_id: &GameId, game: &Game) -> crate::Result<Option<Game>>;

    /// replace the whole game document. A committed randomization is never
    /// undone or changed by a replace.
    fn write_document(&mut self, game_id: &GameId, game: &Game) -> crate::Result<WriteOutcome>;

    /// apply `mutation` atomically against the latest copy of the game
    fn apply(
        &mut self,
        game_id: &GameId,
        mutation: &Mutation,
    ) -> crate::Result<WriteOutcome>;

    /// snapshots of the game, starting with the current one
    fn subscribe(&self, game_id: &GameId) -> crate::Result<Self::Subscription>;

    fn write_field(
        &mut self,
        game_id: &GameId,
        update: FieldUpdate,
    ) -> crate::Result<WriteOutcome> {
        self.apply(game_id, &Mutation::Field(update))
    }

    fn compare_and_set_cell(
        &mut self,
        game_id: &GameId,
        change: ClaimChange,
    ) -> crate::Result<WriteOutcome> {
        self.apply(game_id, &Mutation::Cell(change))
    }

    fn commit_randomization(
        &mut self,
        game_id: &GameId,
        digits: Digits,
    ) -> crate::Result<WriteOutcome> {
        self.apply(game_id, &Mutation::Randomize(digits))
    }
}

pub trait GameSubscription {
    fn next_snapshot(&mut self) -> impl Future<Output = crate::Result<Game>>;
}

/// Revision a whole-document write lands at.
pub(crate) fn next_revision(existing: Option<&Game>, incoming: &Game) -> u64 {
    existing
        .map_or(incoming.revision, |game| game.revision.max(incoming.revision))
        + 1
}

/// A full replace must carry the stored digits once they are assigned.
pub(crate) fn check_replace(existing: Option<&Game>, incoming: &Game) -> Result<(), BoardError> {
    match existing.and_then(|game| game.digits) {
        Some(digits) if incoming.digits != Some(digits) => Err(BoardError::AlreadyRandomized),
        _ => Ok(()),
    }
}

/// Fans committed games out to subscribers. Only newer revisions are published.
#[derive(Clone, Default)]
pub struct SnapshotNotifier {
    channels: Arc<Mutex<HashMap<GameId, watch::Sender<Option<Game>>>>>,
}

impl SnapshotNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, game_id: &GameId, game: &Game) -> crate::Result<()> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|_| anyhow!("snapshot channels lock poisoned"))?;
        let sender = channels
            .entry(game_id.clone())
            .or_insert_with(|| watch::channel(None).0);
        let published = sender.send_if_modified(|latest| offer(latest, game));
        if published {
            tracing::debug!("published game {game_id} at revision {}", game.revision);
        }
        Ok(())
    }

    pub fn subscribe(
        &self,
        game_id: &GameId,
        current: Option<Game>,
    ) -> crate::Result<WatchSubscription> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|_| anyhow!("snapshot channels lock poisoned"))?;
        let sender = channels
            .entry(game_id.clone())
            .or_insert_with(|| watch::channel(None).0);
        if let Some(game) = current {
            sender.send_if_modified(|latest| offer(latest, &game));
        }
        let mut receiver = sender.subscribe();
        receiver.mark_changed();
        Ok(WatchSubscription {
            game_id: game_id.clone(),
            receiver,
        })
    }
}

fn offer(latest: &mut Option<Game>, game: &Game) -> bool {
    let newer = latest
        .as_ref()
        .is_none_or(|seen| seen.revision < game.revision);
    if newer {
        *latest = Some(game.clone());
    }
    newer
}

pub struct WatchSubscription {
    game_id: GameId,
    receiver: watch::Receiver<Option<Game>>,
}

impl GameSubscription for WatchSubscription {
    async fn next_snapshot(&mut self) -> crate::Result<Game> {
        loop {
            self.receiver.changed().await.map_err(|_| {
                anyhow!("snapshot channel for game {} closed", self.game_id)
            })?;
            if let Some(game) = self.receiver.borrow_and_update().clone() {
                return Ok(game);
            }
        }
    }
}
