use crate::{
    Quarter,
    Side,
    client::{
        ClientError,
        RandomizeOutcome,
    },
    view::BoardView,
};
use anyhow::anyhow;
use tokio::sync::{
    mpsc,
    oneshot,
};

pub type Reply<T> = oneshot::Sender<Result<T, ClientError>>;

pub trait CommandSource {
    /// `Ok(None)` once no further commands can arrive.
    fn next_command(&mut self) -> impl Future<Output = crate::Result<Option<Command>>>;
}

#[derive(Debug)]
pub enum Command {
    ToggleClaim {
        row: u32,
        col: u32,
        player: String,
        reply: Reply<BoardView>,
    },
    Randomize {
        /// Proceed even when squares are still empty.
        force: bool,
        reply: Reply<RandomizeOutcome>,
    },
    SetScore {
        quarter: Quarter,
        side: Side,
        input: String,
        reply: Reply<BoardView>,
    },
    SetPrice {
        input: String,
        reply: Reply<BoardView>,
    },
    SetTeamNames {
        home: String,
        away: String,
        reply: Reply<BoardView>,
    },
    View(oneshot::Sender<BoardView>),
}

pub struct ChannelCommands {
    receiver: mpsc::Receiver<Command>,
}

impl ChannelCommands {
    pub fn new(buffer: usize) -> (Self, CommandSender) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { receiver }, CommandSender { sender })
    }
}

impl CommandSource for ChannelCommands {
    async fn next_command(&mut self) -> crate::Result<Option<Command>> {
        Ok(self.receiver.recv().await)
    }
}

/// Handle for submitting commands to a running app and awaiting the replies.
#[derive(Clone)]
pub struct CommandSender {
    sender: mpsc::Sender<Command>,
}

impl CommandSender {
    pub async fn toggle_claim(
        &self,
        row: u32,
        col: u32,
        player: impl Into<String>,
    ) -> Result<BoardView, ClientError> {
        let player = player.into();
        self.request(|reply| Command::ToggleClaim {
            row,
            col,
            player,
            reply,
        })
        .await
    }

    pub async fn randomize(&self, force: bool) -> Result<RandomizeOutcome, ClientError> {
        self.request(|reply| Command::Randomize { force, reply })
            .await
    }

    pub async fn set_score(
        &self,
        quarter: Quarter,
        side: Side,
        input: impl Into<String>,
    ) -> Result<BoardView, ClientError> {
        let input = input.into();
        self.request(|reply| Command::SetScore {
            quarter,
            side,
            input,
            reply,
        })
        .await
    }

    pub async fn set_price(&self, input: impl Into<String>) -> Result<BoardView, ClientError> {
        let input = input.into();
        self.request(|reply| Command::SetPrice { input, reply })
            .await
    }

    pub async fn set_team_names(
        &self,
        home: impl Into<String>,
        away: impl Into<String>,
    ) -> Result<BoardView, ClientError> {
        let (home, away) = (home.into(), away.into());
        self.request(|reply| Command::SetTeamNames { home, away, reply })
            .await
    }

    pub async fn view(&self) -> crate::Result<BoardView> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Command::View(reply))
            .await
            .map_err(|_| anyhow!("app is no longer accepting commands"))?;
        response
            .await
            .map_err(|_| anyhow!("app dropped the view request"))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, ClientError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .await
            .map_err(|_| anyhow!("app is no longer accepting commands"))?;
        response
            .await
            .map_err(|_| anyhow!("app dropped the request"))?
    }
}
