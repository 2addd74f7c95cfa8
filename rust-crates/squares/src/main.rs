use anyhow::{
    Context,
    anyhow,
};
use chrono::Utc;
use clap::{
    Parser,
    Subcommand,
};
use game_registry::{
    DEFAULT_DATA_DIR,
    GameRegistry,
};
use rand::{
    SeedableRng,
    rngs::StdRng,
};
use squares::{
    GameId,
    Quarter,
    Side,
    app::{
        App,
        RunState,
        command_source::ChannelCommands,
        sled_game_store::SledGameStore,
    },
    client::{
        BoardClient,
        RandomizeOutcome,
        parse_price,
    },
    config::SquaresConfig,
    init_tracing,
    randomize::EmptySquaresWarning,
    routing::GameRouter,
};
use std::path::{
    Path,
    PathBuf,
};

mod console;
mod render;

const DB_DIR: &str = "db";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Use this game instead of the active one
    #[arg(short, long)]
    game: Option<String>,

    #[arg(short, long, default_value = "false")]
    tracing: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Start a new game and make it active
    New {
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        home: Option<String>,
        #[arg(long)]
        away: Option<String>,
    },
    /// Make an existing game active
    Use { game_id: String },
    /// List known games
    List,
    /// Claim a square, or release it if the player already holds it
    Claim {
        row: u32,
        col: u32,
        #[arg(short, long)]
        player: String,
    },
    /// Assign score digits to rows and columns
    Randomize {
        /// Go ahead even if squares are still empty
        #[arg(long)]
        force: bool,
    },
    /// Enter a quarter's score; an empty value clears that side
    Score {
        #[arg(value_parser = parse_quarter)]
        quarter: Quarter,
        #[arg(long)]
        home: Option<String>,
        #[arg(long)]
        away: Option<String>,
    },
    Price { amount: String },
    Teams { home: String, away: String },
    Show,
    /// Interactive console that also follows changes from other participants
    Play,
}

fn parse_quarter(raw: &str) -> Result<Quarter, String> {
    Quarter::from_key(raw).ok_or_else(|| format!("expected one of q1, q2, q3, q4, got '{raw}'"))
}

/// Active game kept in the on-disk game registry.
struct RegistryRouter {
    registry: GameRegistry,
}

impl RegistryRouter {
    fn new(data_dir: &Path) -> anyhow::Result<Self> {
        let registry = GameRegistry::new(data_dir).context("opening game registry")?;
        Ok(Self { registry })
    }
}

impl GameRouter for RegistryRouter {
    fn active_game(&self) -> squares::Result<Option<GameId>> {
        self.registry
            .load_active()?
            .map(|record| {
                GameId::parse(&record.game_id).with_context(|| {
                    format!("game registry holds invalid id '{}'", record.game_id)
                })
            })
            .transpose()
    }

    fn switch_to(&mut self, game_id: &GameId) -> squares::Result<()> {
        self.registry.switch_to(game_id.as_str())?;
        Ok(())
    }
}

async fn handle_interrupt() {
    let res = tokio::signal::ctrl_c().await;
    match res {
        Ok(_) => {
            tracing::info!("Received interrupt, exiting");
        }
        Err(_) => {
            tracing::warn!("Received interrupt error, exiting anyway");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.tracing {
        init_tracing();
    }
    let mut config = SquaresConfig::load(&args.data_dir).context("loading config")?;
    let mut router = RegistryRouter::new(&args.data_dir)?;
    let store = SledGameStore::open(args.data_dir.join(DB_DIR))
        .context("opening game database")?;

    match args.command {
        CliCommand::New { price, home, away } => {
            if let Some(price) = price {
                config.default_price_per_square =
                    parse_price(&price).context("parsing --price")?;
            }
            if let Some(home) = home {
                config.default_home_team = home;
            }
            if let Some(away) = away {
                config.default_away_team = away;
            }
            let game_id = router.start_new_game(&mut rand::rng())?;
            let client = BoardClient::create(store, game_id, &config, Utc::now())?;
            println!("Started game {}", client.game_id());
            println!("{}", render::full(&client.view()));
        }
        CliCommand::Use { game_id } => {
            let game_id = GameId::parse(&game_id)?;
            BoardClient::open(store, game_id.clone(), config.policy())?;
            router.switch_to(&game_id)?;
            println!("Now using game {game_id}");
        }
        CliCommand::List => {
            let records = router.registry.known_games()?;
            if records.is_empty() {
                println!("No games yet; run `squares new`");
            }
            let active = records.len().saturating_sub(1);
            for (index, record) in records.iter().enumerate() {
                let marker = if index == active { "*" } else { " " };
                println!(
                    "{marker} {} (created {})",
                    record.game_id,
                    record.created_at.to_rfc3339()
                );
            }
        }
        CliCommand::Claim { row, col, player } => {
            let mut client = open_client(store, &router, args.game.as_deref(), &config)?;
            client.toggle_claim(row, col, &player)?;
            println!("{}", render::full(&client.view()));
        }
        CliCommand::Randomize { force } => {
            let mut client = open_client(store, &router, args.game.as_deref(), &config)?;
            let confirmation = |_: &EmptySquaresWarning| force;
            match client.randomize(&confirmation, &mut rand::rng())? {
                RandomizeOutcome::Applied(_) => {
                    println!("Numbers assigned.");
                    println!("{}", render::full(&client.view()));
                }
                RandomizeOutcome::Declined { empty } => {
                    println!("{}", EmptySquaresWarning { empty });
                    println!("Re-run with --force to go ahead.");
                }
            }
        }
        CliCommand::Score {
            quarter,
            home,
            away,
        } => {
            if home.is_none() && away.is_none() {
                return Err(anyhow!("Provide --home and/or --away"));
            }
            let mut client = open_client(store, &router, args.game.as_deref(), &config)?;
            if let Some(home) = home {
                client.set_score(quarter, Side::Home, &home)?;
            }
            if let Some(away) = away {
                client.set_score(quarter, Side::Away, &away)?;
            }
            println!("{}", render::full(&client.view()));
        }
        CliCommand::Price { amount } => {
            let mut client = open_client(store, &router, args.game.as_deref(), &config)?;
            client.set_price(&amount)?;
            println!("{}", render::full(&client.view()));
        }
        CliCommand::Teams { home, away } => {
            let mut client = open_client(store, &router, args.game.as_deref(), &config)?;
            client.set_team_names(&home, &away)?;
            println!("{}", render::full(&client.view()));
        }
        CliCommand::Show => {
            let client = open_client(store, &router, args.game.as_deref(), &config)?;
            println!("Game {}", client.game_id());
            println!("{}", render::full(&client.view()));
        }
        CliCommand::Play => {
            let client = open_client(store, &router, args.game.as_deref(), &config)?;
            play(client).await?;
        }
    }
    Ok(())
}

/// Opens `--game` when given, otherwise the registry's active game.
fn open_client(
    store: SledGameStore,
    router: &RegistryRouter,
    game: Option<&str>,
    config: &SquaresConfig,
) -> anyhow::Result<BoardClient<SledGameStore>> {
    let game_id = match game {
        Some(raw) => GameId::parse(raw).context("parsing --game")?,
        None => router
            .active_game()?
            .ok_or_else(|| anyhow!("No active game; run `squares new` first"))?,
    };
    Ok(BoardClient::open(store, game_id, config.policy())?)
}

async fn play(client: BoardClient<SledGameStore>) -> anyhow::Result<()> {
    println!("Playing game {}", client.game_id());
    println!("{}", render::full(&client.view()));
    let (commands, sender) = ChannelCommands::new(16);
    let mut app = App::new(client, commands, StdRng::from_os_rng())?;
    tokio::spawn(console::run(sender));

    loop {
        let interrupt = handle_interrupt();
        match app.run(interrupt).await? {
            RunState::Continue => {
                if let Some(view) = app.take_remote_change() {
                    println!("Board changed by another participant:");
                    println!("{}", render::full(&view));
                }
            }
            RunState::Exit => {
                tracing::info!("Leaving game {}", app.client().game_id());
                return Ok(());
            }
        }
    }
}
