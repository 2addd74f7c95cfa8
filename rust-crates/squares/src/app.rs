use crate::{
    Result,
    app::{
        command_source::{
            Command,
            CommandSource,
        },
        game_store::{
            GameStore,
            GameSubscription,
        },
    },
    client::{
        BoardClient,
        ClientError,
    },
    randomize::EmptySquaresWarning,
    view::BoardView,
};
use rand::rngs::StdRng;
use tokio::sync::oneshot;

pub mod command_source;
pub mod game_store;
pub mod in_memory_game_store;
pub mod sled_game_store;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Continue,
    Exit,
}

pub struct App<Store: GameStore, Commands> {
    client: BoardClient<Store>,
    updates: Store::Subscription,
    commands: Commands,
    rng: StdRng,
    remote_change: bool,
}

enum Step {
    Snapshot(Result<crate::Game>),
    Command(Result<Option<Command>>),
    Interrupted,
}

impl<Store: GameStore, Commands> App<Store, Commands> {
    pub fn new(
        client: BoardClient<Store>,
        commands: Commands,
        rng: StdRng,
    ) -> std::result::Result<Self, ClientError> {
        let updates = client.subscribe()?;
        Ok(Self {
            client,
            updates,
            commands,
            rng,
            remote_change: false,
        })
    }

    pub fn client(&self) -> &BoardClient<Store> {
        &self.client
    }

    /// The board as it stands, if another participant changed it since the
    /// last call.
    pub fn take_remote_change(&mut self) -> Option<BoardView> {
        std::mem::take(&mut self.remote_change).then(|| self.client.view())
    }
}

impl<Store: GameStore, Commands: CommandSource> App<Store, Commands> {
    /// Handles one remote snapshot or one local command.
    pub async fn run(&mut self, interrupt: impl Future<Output = ()>) -> Result<RunState> {
        let step = tokio::select! {
            snapshot = self.updates.next_snapshot() => Step::Snapshot(snapshot),
            command = self.commands.next_command() => Step::Command(command),
            _ = interrupt => Step::Interrupted,
        };
        match step {
            Step::Snapshot(snapshot) => {
                let game = snapshot?;
                let revision = game.revision;
                if self.client.apply_snapshot(game) {
                    self.remote_change = true;
                    tracing::debug!(
                        "game {} moved to revision {revision}",
                        self.client.game_id()
                    );
                }
                Ok(RunState::Continue)
            }
            Step::Command(command) => match command? {
                Some(command) => {
                    self.handle(command);
                    Ok(RunState::Continue)
                }
                None => {
                    tracing::info!("command source closed");
                    Ok(RunState::Exit)
                }
            },
            Step::Interrupted => Ok(RunState::Exit),
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::ToggleClaim {
                row,
                col,
                player,
                reply,
            } => {
                let result = self.client.toggle_claim(row, col, &player).map(|_| ());
                self.reply_with_view(reply, result);
            }
            Command::Randomize { force, reply } => {
                let confirmation = |_: &EmptySquaresWarning| force;
                let result = self.client.randomize(&confirmation, &mut self.rng);
                respond(reply, result);
            }
            Command::SetScore {
                quarter,
                side,
                input,
                reply,
            } => {
                let result = self.client.set_score(quarter, side, &input).map(|_| ());
                self.reply_with_view(reply, result);
            }
            Command::SetPrice { input, reply } => {
                let result = self.client.set_price(&input).map(|_| ());
                self.reply_with_view(reply, result);
            }
            Command::SetTeamNames { home, away, reply } => {
                let result = self.client.set_team_names(&home, &away).map(|_| ());
                self.reply_with_view(reply, result);
            }
            Command::View(reply) => {
                if reply.send(self.client.view()).is_err() {
                    tracing::debug!("view requester went away");
                }
            }
        }
    }

    fn reply_with_view(
        &self,
        reply: oneshot::Sender<std::result::Result<BoardView, ClientError>>,
        result: std::result::Result<(), ClientError>,
    ) {
        respond(reply, result.map(|()| self.client.view()));
    }
}

fn respond<T>(
    reply: oneshot::Sender<std::result::Result<T, ClientError>>,
    result: std::result::Result<T, ClientError>,
) {
    if reply.send(result).is_err() {
        tracing::debug!("command requester went away before the reply");
    }
}
