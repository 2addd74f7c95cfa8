// Sled-backed game store. Every write is a compare-and-swap on the game's key.
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
    document::{
        decode_game,
        encode_game,
    },
};
use anyhow::Context;
use sled::{
    Config,
    Db,
    Tree,
};
use std::path::Path;

const GAMES_TREE: &str = "games";

#[derive(Clone)]
pub struct SledGameStore {
    tree: Tree,
    notifier: SnapshotNotifier,
}

impl SledGameStore {
    pub fn new(db: &Db) -> crate::Result<Self> {
        let tree = db.open_tree(GAMES_TREE).context("open games tree")?;
        Ok(Self {
            tree,
            notifier: SnapshotNotifier::new(),
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let config = Config::default().path(path);
        let db = config.open().context("open sled database")?;
        Self::new(&db)
    }

    fn raw_game(&self, game_id: &GameId) -> crate::Result<Option<sled::IVec>> {
        self.tree
            .get(game_id.as_str())
            .with_context(|| format!("read game {game_id}"))
    }

    /// Swaps `expected` for `game`. `false` means another writer got there first.
    fn swap(
        &self,
        game_id: &GameId,
        expected: Option<&sled::IVec>,
        game: &Game,
    ) -> crate::Result<bool> {
        let bytes = encode_game(game)?;
        let swapped = self
            .tree
            .compare_and_swap(game_id.as_str(), expected, Some(bytes))
            .with_context(|| format!("write game {game_id}"))?;
        if swapped.is_err() {
            tracing::debug!("game {game_id} changed underneath write");
            return Ok(false);
        }
        self.tree.flush().context("flush games tree")?;
        self.notifier.publish(game_id, game)?;
        Ok(true)
    }
}

impl GameStore for SledGameStore {
    type Subscription = WatchSubscription;

    fn load_game(&self, game_id: &GameId) -> crate::Result<Option<Game>> {
        self.raw_game(game_id)?
            .map(|raw| decode_game(&raw).with_context(|| format!("decode game {game_id}")))
            .transpose()
    }

    fn create_document(&mut self, game_id: &GameId, game: &Game) -> crate::Result<Option<Game>> {
        let stored = Game {
            revision: next_revision(None, game),
            ..game.clone()
        };
        if self.swap(game_id, None, &stored)? {
            Ok(Some(stored))
        } else {
            Ok(None)
        }
    }

    fn write_document(&mut self, game_id: &GameId, game: &Game) -> crate::Result<WriteOutcome> {
        loop {
            let raw = self.raw_game(game_id)?;
            let existing = raw.as_ref().map(|raw| decode_game(raw)).transpose()?;
            if let Err(reason) = check_replace(existing.as_ref(), game) {
                let current = existing.unwrap_or_else(|| game.clone());
                return Ok(WriteOutcome::Rejected { current, reason });
            }
            let stored = Game {
                revision: next_revision(existing.as_ref(), game),
                ..game.clone()
            };
            if self.swap(game_id, raw.as_ref(), &stored)? {
                return Ok(WriteOutcome::Applied(stored));
            }
        }
    }

    fn apply(
        &mut self,
        game_id: &GameId,
        mutation: &Mutation,
    ) -> crate::Result<WriteOutcome> {
        loop {
            let Some(raw) = self.raw_game(game_id)? else {
                return Ok(WriteOutcome::Missing);
            };
            let current = decode_game(&raw)?;
            let mut next = current.clone();
            if let Err(reason) = mutation.apply_to(&mut next) {
                return Ok(WriteOutcome::Rejected { current, reason });
            }
            next.revision = current.revision + 1;
            if self.swap(game_id, Some(&raw), &next)? {
                return Ok(WriteOutcome::Applied(next));
            }
        }
    }

    fn subscribe(&self, game_id: &GameId) -> crate::Result<WatchSubscription> {
        let current = self.load_game(game_id)?;
        self.notifier.subscribe(game_id, current)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::SledGameStore;
    use crate::{
        BoardError,
        Cell,
        FieldUpdate,
        Game,
        GameId,
        PlayerName,
        Quarter,
        Side,
        app::game_store::{
            GameStore,
            WriteOutcome,
        },
        board::DigitPermutation,
        board::Digits,
        claim::ClaimChange,
    };
    use chrono::Utc;
    use tempdir::TempDir;

    fn sled_db(temp_dir: &TempDir) -> sled::Db {
        sled::Config::default()
            .path(temp_dir.path())
            .open()
            .expect("open sled db")
    }

    fn game_id() -> GameId {
        GameId::parse("SledGame01").unwrap()
    }

    #[test]
    fn create_document__then_reopen__restores_game() {
        // given
        let temp_dir = TempDir::new("sled_game_store_reopen").unwrap();
        let mut game = Game::new(Utc::now());
        game.home_team_name = "Chiefs".to_string();

        // when
        let stored = {
            let db = sled_db(&temp_dir);
            let mut store = SledGameStore::new(&db).unwrap();
            store.create_document(&game_id(), &game).unwrap().unwrap()
        };

        // then
        let db = sled_db(&temp_dir);
        let store = SledGameStore::new(&db).unwrap();
        let loaded = store.load_game(&game_id()).unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.home_team_name, "Chiefs");
        assert_eq!(loaded.revision, 1);
    }

    #[test]
    fn apply__field_update__persists_and_bumps_revision() {
        // given
        let temp_dir = TempDir::new("sled_game_store_field").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledGameStore::new(&db).unwrap();
        store
            .create_document(&game_id(), &Game::new(Utc::now()))
            .unwrap();

        // when
        let outcome = store
            .write_field(
                &game_id(),
                FieldUpdate::Score {
                    quarter: Quarter::Q3,
                    side: Side::Home,
                    value: Some(21),
                },
            )
            .unwrap();

        // then
        let WriteOutcome::Applied(applied) = outcome else {
            panic!("expected applied write, got {outcome:?}");
        };
        assert_eq!(applied.revision, 2);
        let loaded = store.load_game(&game_id()).unwrap().unwrap();
        assert_eq!(loaded.scores.get(Quarter::Q3).home, Some(21));
    }

    #[test]
    fn compare_and_set_cell__release_by_non_owner__is_rejected() {
        // given
        let temp_dir = TempDir::new("sled_game_store_release").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledGameStore::new(&db).unwrap();
        store
            .create_document(&game_id(), &Game::new(Utc::now()))
            .unwrap();
        let cell = Cell::new(9, 9).unwrap();
        let alice = PlayerName::parse("Alice").unwrap();
        let bob = PlayerName::parse("Bob").unwrap();
        store
            .compare_and_set_cell(&game_id(), ClaimChange::claim(cell, alice.clone()))
            .unwrap();

        // when
        let outcome = store
            .compare_and_set_cell(&game_id(), ClaimChange::release(cell, bob))
            .unwrap();

        // then
        match outcome {
            WriteOutcome::Rejected { current, reason } => {
                assert_eq!(
                    reason,
                    BoardError::Conflict {
                        cell,
                        occupant: Some(alice.clone()),
                    }
                );
                assert_eq!(current.grid.occupant(cell), Some(&alice));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn commit_randomization__second_commit__keeps_first_digits() {
        // given
        let temp_dir = TempDir::new("sled_game_store_randomize").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledGameStore::new(&db).unwrap();
        store
            .create_document(&game_id(), &Game::new(Utc::now()))
            .unwrap();
        let first = Digits {
            home: DigitPermutation::identity(),
            away: DigitPermutation::identity(),
        };
        let second = Digits {
            home: DigitPermutation::new([9, 8, 7, 6, 5, 4, 3, 2, 1, 0]).unwrap(),
            away: DigitPermutation::identity(),
        };

        // when
        store.commit_randomization(&game_id(), first).unwrap();
        let outcome = store.commit_randomization(&game_id(), second).unwrap();

        // then
        assert!(matches!(
            outcome,
            WriteOutcome::Rejected {
                reason: BoardError::AlreadyRandomized,
                ..
            }
        ));
        let loaded = store.load_game(&game_id()).unwrap().unwrap();
        assert_eq!(loaded.digits, Some(first));
    }

    #[test]
    fn create_document__taken_id__keeps_randomized_board() {
        // given
        let temp_dir = TempDir::new("sled_game_store_create_twice").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledGameStore::new(&db).unwrap();
        store
            .create_document(&game_id(), &Game::new(Utc::now()))
            .unwrap();
        let digits = Digits {
            home: DigitPermutation::identity(),
            away: DigitPermutation::identity(),
        };
        store.commit_randomization(&game_id(), digits).unwrap();

        // when
        let created = store
            .create_document(&game_id(), &Game::new(Utc::now()))
            .unwrap();
        let replaced = store
            .write_document(&game_id(), &Game::new(Utc::now()))
            .unwrap();

        // then
        assert_eq!(created, None);
        assert!(matches!(
            replaced,
            WriteOutcome::Rejected {
                reason: BoardError::AlreadyRandomized,
                ..
            }
        ));
        let loaded = store.load_game(&game_id()).unwrap().unwrap();
        assert_eq!(loaded.digits, Some(digits));
        assert_eq!(loaded.revision, 2);
    }

    #[test]
    fn apply__unknown_game__is_missing() {
        let temp_dir = TempDir::new("sled_game_store_missing").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledGameStore::new(&db).unwrap();
        let outcome = store
            .write_field(&game_id(), FieldUpdate::PricePerSquare(1.into()))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Missing);
    }
}
