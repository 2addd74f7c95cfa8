// Line-oriented console for `squares play`.
use crate::render;
use squares::{
    Quarter,
    Side,
    app::command_source::CommandSender,
    client::{
        ClientError,
        RandomizeOutcome,
    },
    randomize::EmptySquaresWarning,
    view::BoardView,
};
use std::io::BufRead;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Claim { row: u32, col: u32, player: String },
    Randomize { force: bool },
    Score { quarter: Quarter, side: Side, input: String },
    Price(String),
    Teams { home: String, away: String },
    Show,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let command = match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("claim", [row, col, player @ ..]) if !player.is_empty() => ConsoleCommand::Claim {
            row: parse_index(row)?,
            col: parse_index(col)?,
            player: player.join(" "),
        },
        ("randomize", []) => ConsoleCommand::Randomize { force: false },
        ("randomize", ["--force"]) => ConsoleCommand::Randomize { force: true },
        ("score", [quarter, side, value @ ..]) if value.len() <= 1 => ConsoleCommand::Score {
            quarter: Quarter::from_key(quarter)
                .ok_or_else(|| format!("unknown quarter '{quarter}'"))?,
            side: Side::from_key(side).ok_or_else(|| format!("unknown side '{side}'"))?,
            input: value.first().copied().unwrap_or_default().to_string(),
        },
        ("price", [amount]) => ConsoleCommand::Price(amount.to_string()),
        ("teams", [home, away]) => ConsoleCommand::Teams {
            home: home.to_string(),
            away: away.to_string(),
        },
        ("show", []) => ConsoleCommand::Show,
        ("help", []) => ConsoleCommand::Help,
        ("quit" | "exit", []) => ConsoleCommand::Quit,
        _ => return Err(format!("could not understand '{}'; try 'help'", line.trim())),
    };
    Ok(Some(command))
}

fn parse_index(raw: &str) -> Result<u32, String> {
    raw.parse()
        .map_err(|_| format!("'{raw}' is not a row or column number"))
}

fn help() -> String {
    format!(
        "commands:\n  claim <row> <col> <player>\n  randomize [--force]\n  score <quarter> <home|away> [value]\n  price <amount>\n  teams <home> <away>\n  show\n  quit\nquarters: {}",
        render::quarter_key_help()
    )
}

/// Reads stdin on a plain thread so a pending read never holds up shutdown.
fn stdin_lines() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Feeds console lines to the app until `quit` or end of input.
pub async fn run(commands: CommandSender) {
    println!("{}", help());
    let mut lines = stdin_lines();
    while let Some(line) = lines.recv().await {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        if let Err(err) = execute(&commands, command).await {
            println!("error: {err}");
        }
    }
    tracing::debug!("console finished");
}

async fn execute(commands: &CommandSender, command: ConsoleCommand) -> Result<(), ClientError> {
    let view: BoardView = match command {
        ConsoleCommand::Claim { row, col, player } => {
            commands.toggle_claim(row, col, player).await?
        }
        ConsoleCommand::Randomize { force } => {
            match commands.randomize(force).await? {
                RandomizeOutcome::Applied(_) => println!("Numbers assigned."),
                RandomizeOutcome::Declined { empty } => {
                    println!("{}", EmptySquaresWarning { empty });
                    println!("Use 'randomize --force' to go ahead.");
                }
            }
            commands.view().await?
        }
        ConsoleCommand::Score {
            quarter,
            side,
            input,
        } => commands.set_score(quarter, side, input).await?,
        ConsoleCommand::Price(amount) => commands.set_price(amount).await?,
        ConsoleCommand::Teams { home, away } => commands.set_team_names(home, away).await?,
        ConsoleCommand::Show => commands.view().await?,
        ConsoleCommand::Help => {
            println!("{}", help());
            return Ok(());
        }
        ConsoleCommand::Quit => return Ok(()),
    };
    println!("{}", render::full(&view));
    Ok(())
}
