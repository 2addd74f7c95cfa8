use anyhow::{
    Context,
    Result,
    anyhow,
};
use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs,
    io::Write,
    path::{
        Path,
        PathBuf,
    },
};

pub const DEFAULT_DATA_DIR: &str = ".squares";
const GAMES_FILE: &str = "games.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub selected_at: Option<DateTime<Utc>>,
}

/// Known games, oldest selection first. The last record is the active game.
#[derive(Debug)]
pub struct GameRegistry {
    path: PathBuf,
}

impl GameRegistry {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = ensure_store(data_dir.as_ref())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn known_games(&self) -> Result<Vec<GameRecord>> {
        read_records(&self.path)
    }

    pub fn load_active(&self) -> Result<Option<GameRecord>> {
        Ok(self.known_games()?.pop())
    }

    /// Makes `game_id` the active game, recording it if it is new.
    pub fn switch_to(&self, game_id: &str) -> Result<GameRecord> {
        let mut records = self.known_games()?;
        let now = Utc::now();
        let record = match records.iter().position(|record| record.game_id == game_id) {
            Some(index) => GameRecord {
                selected_at: Some(now),
                ..records.remove(index)
            },
            None => GameRecord {
                game_id: game_id.to_string(),
                created_at: now,
                selected_at: Some(now),
            },
        };
        records.push(record.clone());
        write_records(&self.path, &records)?;
        Ok(record)
    }
}

fn ensure_store(data_dir: &Path) -> Result<PathBuf> {
    if !data_dir.exists() {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create data directory {}", data_dir.display())
        })?;
    }

    let file_path = data_dir.join(GAMES_FILE);
    if !file_path.exists() {
        let mut file = fs::File::create(&file_path).with_context(|| {
            format!("Failed to create game registry at {:?}", file_path)
        })?;
        file.write_all(b"")
            .context("Failed to initialize game registry")?;
    }

    Ok(file_path)
}

fn read_records(path: impl AsRef<Path>) -> Result<Vec<GameRecord>> {
    let data = fs::read(path.as_ref()).context("Failed to read game registry")?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    if let Ok(records) = serde_json::from_slice::<Vec<GameRecord>>(&data) {
        return Ok(records);
    }
    if let Ok(record) = serde_json::from_slice::<GameRecord>(&data) {
        return Ok(vec![record]);
    }
    Err(anyhow!(
        "Failed to parse game registry JSON; expected a list of game records"
    ))
}

fn write_records(path: impl AsRef<Path>, records: &[GameRecord]) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(records).context("Failed to serialize game registry")?;
    fs::write(path.as_ref(), json).context("Failed to write game registry")?;
    Ok(())
}
