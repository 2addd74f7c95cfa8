#![allow(non_snake_case)]

use chrono::Utc;
use rand::{
    SeedableRng,
    rngs::StdRng,
};
use squares::{
    Cell,
    GameId,
    Quarter,
    Side,
    app::{
        App,
        RunState,
        command_source::{
            ChannelCommands,
            CommandSender,
        },
        game_store::{
            GameStore,
            GameSubscription,
        },
        in_memory_game_store::InMemoryGameStore,
        sled_game_store::SledGameStore,
    },
    client::{
        BoardClient,
        RandomizeOutcome,
    },
    config::{
        ClientPolicy,
        SquaresConfig,
    },
};
use std::{
    future::pending,
    time::Duration,
};
use tempdir::TempDir;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn game_id() -> GameId {
    GameId::parse("MultiUser1").unwrap()
}

fn spawn_app<S>(client: BoardClient<S>, seed: u64) -> (App<S, ChannelCommands>, CommandSender)
where
    S: GameStore,
{
    let (commands, sender) = ChannelCommands::new(8);
    let app = App::new(client, commands, StdRng::seed_from_u64(seed)).unwrap();
    (app, sender)
}

/// Drives `app` until `done` resolves, then returns what it produced.
async fn drive<S, T>(
    app: &mut App<S, ChannelCommands>,
    done: impl Future<Output = T>,
) -> T
where
    S: GameStore,
{
    tokio::pin!(done);
    loop {
        tokio::select! {
            value = &mut done => return value,
            state = app.run(pending()) => {
                assert_eq!(state.unwrap(), RunState::Continue);
            }
        }
    }
}

#[tokio::test]
async fn run__two_apps_on_one_store__converge_on_every_write() {
    // given
    let store = InMemoryGameStore::new();
    let host = BoardClient::create(
        store.clone(),
        game_id(),
        &SquaresConfig::default(),
        Utc::now(),
    )
    .unwrap();
    let guest = BoardClient::open(store.clone(), game_id(), ClientPolicy::default()).unwrap();
    let (mut host_app, host_commands) = spawn_app(host, 1);
    let (mut guest_app, guest_commands) = spawn_app(guest, 2);

    // when
    let view = drive(&mut host_app, host_commands.toggle_claim(4, 6, "Host")).await;
    view.unwrap();
    let result = drive(&mut guest_app, guest_commands.toggle_claim(4, 6, "Guest")).await;
    drive(&mut guest_app, guest_commands.set_team_names("Chiefs", "Eagles"))
        .await
        .unwrap();
    let mut updates = store.subscribe(&game_id()).unwrap();
    let latest = timeout(WAIT, updates.next_snapshot()).await.unwrap().unwrap();
    let host_view = timeout(WAIT, drive(&mut host_app, async {
        loop {
            let view = host_commands.view().await.unwrap();
            if view.revision == latest.revision {
                return view;
            }
            tokio::task::yield_now().await;
        }
    }))
    .await
    .unwrap();

    // then
    assert!(result.unwrap_err().board_error().is_some_and(|err| err.is_conflict()));
    assert_eq!(host_view.home_team_name, "Chiefs");
    assert_eq!(host_view.away_team_name, "Eagles");
    assert_eq!(
        host_view.grid.occupant(Cell::new(4, 6).unwrap()).map(|p| p.as_str()),
        Some("Host")
    );
    assert_eq!(guest_app.client().game(), &latest);
}

#[tokio::test]
async fn subscribe__sled_store__follows_scores_and_randomization() {
    // given
    let temp_dir = TempDir::new("multi_client_sled").unwrap();
    let store = SledGameStore::open(temp_dir.path()).unwrap();
    let mut scorer = BoardClient::create(
        store.clone(),
        game_id(),
        &SquaresConfig::default(),
        Utc::now(),
    )
    .unwrap();
    let mut watcher = BoardClient::open(store.clone(), game_id(), ClientPolicy::default())
        .unwrap();
    let mut updates = watcher.subscribe().unwrap();

    // when
    let forced = |_: &squares::randomize::EmptySquaresWarning| true;
    let outcome = scorer
        .randomize(&forced, &mut StdRng::seed_from_u64(9))
        .unwrap();
    scorer.set_score(Quarter::Q1, Side::Home, "14").unwrap();
    scorer.set_score(Quarter::Q1, Side::Away, "0").unwrap();
    let target = scorer.game().revision;
    while watcher.game().revision < target {
        let snapshot = timeout(WAIT, updates.next_snapshot()).await.unwrap().unwrap();
        watcher.apply_snapshot(snapshot);
    }

    // then
    let RandomizeOutcome::Applied(digits) = outcome else {
        panic!("expected digits, got {outcome:?}");
    };
    assert_eq!(watcher.game().digits, Some(digits));
    assert_eq!(watcher.game().scores.get(Quarter::Q1).entered(), Some((14, 0)));
    assert_eq!(watcher.view().payouts, scorer.view().payouts);
}
