use std::sync::Arc;
use std::time::Duration;

use game_content::ContentFactory;
use game_core::{
    Actor, BattleManager, BattleOutcome, Services, Uid, UidAllocator, roll_encounter,
};
use runtime::{
    ActionChoice, AnimationPlayer, BattleEvent, EncounterRunner, InstantPlayer, RuntimeConfig,
    ScriptedProvider, StalledPlayer, SyncSignal, TimedPlayer,
};
use tokio::sync::broadcast::error::TryRecvError;

const SEED: u64 = 11;

fn encounter() -> BattleManager {
    led_encounter(None)
}

fn led_encounter(leader: Option<Uid>) -> BattleManager {
    let services: Arc<Services> = Arc::new(ContentFactory::bundled().build_services().unwrap());
    let creatures = services.creatures().unwrap();
    let mut uids = UidAllocator::new();

    let party = ["summoner", "pixie"]
        .into_iter()
        .enumerate()
        .map(|(slot, id)| {
            let mut actor = Actor::new(uids.allocate(), creatures.get(id).unwrap(), 5);
            actor.set_slot(slot);
            actor
        })
        .collect();
    let enemies = roll_encounter(&services, "default", 1, SEED, &mut uids).unwrap();
    BattleManager::start_with_leader(services, party, enemies, SEED, leader).unwrap()
}

fn runner_with(
    player: Arc<dyn AnimationPlayer>,
    config: &RuntimeConfig,
) -> (EncounterRunner, runtime::EncounterHandle) {
    EncounterRunner::new(encounter(), player, config)
}

#[tokio::test]
async fn instant_player_reaches_an_outcome() {
    let config = RuntimeConfig {
        event_buffer: 65_536,
        ..RuntimeConfig::default()
    };
    let (runner, handle) = runner_with(Arc::new(InstantPlayer), &config);
    let mut events = handle.subscribe();

    let summary = runner.run().await.unwrap();

    assert!(!summary.forced);
    assert_eq!(summary.timeouts, 0);
    assert!(summary.log[0].starts_with("Enemies: "));
    assert_eq!(summary.victory.is_some(), summary.outcome == BattleOutcome::Win);

    let mut received = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => received.push(event),
            Err(TryRecvError::Empty) => break,
            Err(err) => panic!("unexpected receive error: {err}"),
        }
    }
    assert!(matches!(&received[0], BattleEvent::Log { line } if line.starts_with("Enemies: ")));
    assert!(received.iter().any(|e| matches!(e, BattleEvent::Cue(_))));
    assert_eq!(
        received.last(),
        Some(&BattleEvent::Ended {
            outcome: summary.outcome,
            forced: false,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn stalled_animation_times_out_both_signals() {
    let config = RuntimeConfig::default();
    let stalled = Arc::new(StalledPlayer::new());
    let (runner, _handle) = runner_with(stalled.clone(), &config);

    let summary = runner.run().await.unwrap();

    assert!(!summary.forced);
    assert!(summary.timeouts > 0);
    assert_eq!(summary.timeouts % 2, 0);
    assert_eq!(summary.timeouts as usize, stalled.cues_played() * 2);
}

#[tokio::test(start_paused = true)]
async fn apply_timeout_shorter_than_animation() {
    let config = RuntimeConfig {
        apply_timeout: Duration::from_millis(50),
        event_buffer: 65_536,
        ..RuntimeConfig::default()
    };
    let player = TimedPlayer::new(Duration::from_millis(100), Duration::from_millis(300));
    let (runner, handle) = runner_with(Arc::new(player), &config);
    let mut events = handle.subscribe();

    let summary = runner.run().await.unwrap();
    assert!(summary.timeouts > 0);

    let mut timed_out = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let BattleEvent::SignalTimedOut { signal } = event {
            timed_out.push(signal);
        }
    }
    assert_eq!(timed_out.len(), summary.timeouts as usize);
    assert!(timed_out.iter().all(|signal| *signal == SyncSignal::Apply));
}

#[tokio::test(start_paused = true)]
async fn force_end_preempts_a_pending_animation() {
    let config = RuntimeConfig::default();
    let stalled = Arc::new(StalledPlayer::new());
    let (runner, handle) = runner_with(stalled.clone(), &config);

    let task = runner.spawn();
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.force_end(BattleOutcome::Lose).await.unwrap();

    let summary = task.await.unwrap().unwrap();
    assert!(summary.forced);
    assert_eq!(summary.outcome, BattleOutcome::Lose);
    assert_eq!(summary.timeouts, 0);
    assert_eq!(stalled.cues_played(), 1);
    assert!(
        summary
            .log
            .iter()
            .any(|line| line == "The encounter is called: lose")
    );
    assert!(summary.victory.is_none());

    // The runner is gone, so further commands have nowhere to go.
    assert!(handle.force_end(BattleOutcome::Win).await.is_err());
}

#[tokio::test]
async fn scripted_flee_ends_on_the_first_ally_turn() {
    let config = RuntimeConfig::default();
    let (runner, _handle) = runner_with(Arc::new(InstantPlayer), &config);
    let provider = Arc::new(ScriptedProvider::new([ActionChoice::Flee]));

    let summary = runner.with_provider(provider.clone()).run().await.unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Flee);
    assert!(!summary.forced);
    assert!(summary.log.iter().any(|line| line.ends_with("flees the battle")));
    assert_eq!(provider.remaining().await, 0);
}

#[tokio::test]
async fn unknown_scripted_action_forfeits_only_that_turn() {
    let config = RuntimeConfig::default();
    let (runner, _handle) = runner_with(Arc::new(InstantPlayer), &config);
    let provider = Arc::new(ScriptedProvider::new([ActionChoice::act("warp")]));

    let summary = runner.with_provider(provider).run().await.unwrap();

    assert!(summary.log.iter().any(|line| line.contains("falters")));
    assert!(!summary.forced);
    assert!(summary.rounds >= 1);
}

#[tokio::test]
async fn leader_opens_the_first_round() {
    let config = RuntimeConfig {
        event_buffer: 65_536,
        ..RuntimeConfig::default()
    };
    // The summoner is slower than the pixie.
    let (runner, _handle) =
        EncounterRunner::new(led_encounter(Some(Uid(1))), Arc::new(InstantPlayer), &config);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.log[1], "Round 1");
    assert_eq!(summary.log[2], "Summoner's turn");
}
