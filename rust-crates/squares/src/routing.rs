use crate::game_id::GameId;
use rand::Rng;

pub const DEFAULT_BASE_PATH: &str = "/squares/";

/// Source of the game a participant is looking at.
pub trait GameRouter {
    fn active_game(&self) -> crate::Result<Option<GameId>>;

    fn switch_to(&mut self, game_id: &GameId) -> crate::Result<()>;

    /// Mints a fresh id and makes it the active game.
    fn start_new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> crate::Result<GameId> {
        let game_id = GameId::generate(rng);
        self.switch_to(&game_id)?;
        tracing::info!("switched to new game {game_id}");
        Ok(game_id)
    }
}

/// Reads the game id from a URL path such as `/squares/Ab3dE6gH9k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRouter {
    base_path: String,
    path: String,
}

impl PathRouter {
    pub fn new(base_path: impl Into<String>, path: impl Into<String>) -> Self {
        let mut base_path = base_path.into();
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        Self {
            base_path,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl GameRouter for PathRouter {
    fn active_game(&self) -> crate::Result<Option<GameId>> {
        let Some(rest) = self.path.strip_prefix(&self.base_path) else {
            return Ok(None);
        };
        let segment = rest.split(['/', '?', '#']).next().unwrap_or_default();
        match GameId::parse(segment) {
            Ok(game_id) => Ok(Some(game_id)),
            Err(err) => {
                if !segment.is_empty() {
                    tracing::warn!("ignoring invalid game id in path '{}': {err}", self.path);
                }
                Ok(None)
            }
        }
    }

    fn switch_to(&mut self, game_id: &GameId) -> crate::Result<()> {
        self.path = format!("{}{}", self.base_path, game_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use rand::{
        SeedableRng,
        rngs::StdRng,
    };

    #[test]
    fn active_game__reads_segment_after_base() {
        let router = PathRouter::new(DEFAULT_BASE_PATH, "/squares/Ab3dE6gH9k");
        let expected = GameId::parse("Ab3dE6gH9k").unwrap();
        assert_eq!(router.active_game().unwrap(), Some(expected));
    }

    #[test]
    fn active_game__ignores_trailing_segments_and_query() {
        let router = PathRouter::new("/squares", "/squares/Ab3dE6gH9k/?tab=scores");
        assert!(router.active_game().unwrap().is_some());
    }

    #[test]
    fn active_game__base_only_or_other_path__is_none() {
        let base = PathRouter::new(DEFAULT_BASE_PATH, "/squares/");
        let other = PathRouter::new(DEFAULT_BASE_PATH, "/elsewhere/Ab3dE6gH9k");
        let bad = PathRouter::new(DEFAULT_BASE_PATH, "/squares/not-an-id");
        assert_eq!(base.active_game().unwrap(), None);
        assert_eq!(other.active_game().unwrap(), None);
        assert_eq!(bad.active_game().unwrap(), None);
    }

    #[test]
    fn start_new_game__rewrites_path_to_new_id() {
        // given
        let mut router = PathRouter::new(DEFAULT_BASE_PATH, "/squares/");
        let mut rng = StdRng::seed_from_u64(4);

        // when
        let game_id = router.start_new_game(&mut rng).unwrap();

        // then
        assert_eq!(router.path(), format!("/squares/{game_id}"));
        assert_eq!(router.active_game().unwrap(), Some(game_id));
    }
}
