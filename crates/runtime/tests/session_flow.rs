//! Session worker pacing and input handling.
//!
//! Tokio's clock is paused, so the boss auto-turn and the animation windows
//! fire deterministically as soon as every task is idle.

use std::sync::Arc;
use std::time::Duration;

use combat_core::testing::{QueuedRolls, TestCatalog};
use combat_core::{
    ActionKind, BossDefinition, CombatAction, DamageKind, DamageSpec, FixedClock, IgnoreReason,
    Phase, SessionError, Transition,
};
use combat_runtime::{
    CombatEvent, CombatRuntime, RuntimeConfig, RuntimeError, ScriptedProvider, SessionHandle,
};
use tokio::sync::broadcast;
use tokio::time::Instant;

const BOSS: &str = "test-wyrm";

fn radiant_smite() -> CombatAction {
    CombatAction::new("radiant-smite", "Radiant Smite", ActionKind::Attack)
        .with_damage(DamageSpec::new("1d10", 15, DamageKind::Radiant))
}

fn fixed_strike(id: &str, total: i32) -> CombatAction {
    CombatAction::new(id, "Fixed Strike", ActionKind::Attack)
        .with_damage(DamageSpec::new("1d1", total - 1, DamageKind::Physical))
}

fn catalog() -> TestCatalog {
    let boss = BossDefinition {
        id: BOSS.to_string(),
        name: "Test Wyrm".to_string(),
        max_hp: 45,
        defense: None,
        abilities: vec![fixed_strike("claw", 8)],
        victory_text: "The wyrm falls.".to_string(),
        sigil_reward: "Wyrm Sigil".to_string(),
    };
    TestCatalog::new().with_encounter(boss, vec![radiant_smite(), fixed_strike("finisher", 25)])
}

fn runtime(rolls: Arc<QueuedRolls>) -> CombatRuntime {
    CombatRuntime::builder()
        .catalog(Arc::new(catalog()))
        .rng(rolls)
        .clock(Arc::new(FixedClock(0)))
        .build()
        .expect("runtime should build")
}

async fn wait_for_phase(events: &mut broadcast::Receiver<CombatEvent>, phase: Phase) -> u32 {
    loop {
        match events.recv().await.expect("event stream open") {
            CombatEvent::PhaseChanged { to, round, .. } if to == phase => return round,
            _ => {}
        }
    }
}

async fn player_first(handle: &SessionHandle) {
    let transition = handle.roll_initiative().await.unwrap();
    assert_eq!(
        transition,
        Transition::Applied {
            from: Phase::Initiative,
            to: Phase::PlayerTurn,
            outcome: None,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn boss_acts_after_player_animation_and_turn_delay() {
    // initiative 20 vs 1, smite rolls 10, boss picks ability 0 and rolls 1d1
    let rolls = Arc::new(QueuedRolls::new([20, 1, 10, 0, 1]));
    let handle = runtime(rolls).start_session(BOSS, 7).unwrap();
    let mut events = handle.subscribe();

    player_first(&handle).await;
    let started = Instant::now();
    let transition = handle.submit_action("radiant-smite").await.unwrap();
    assert_eq!(transition.outcome().and_then(|o| o.damage), Some(25));

    let session = handle.snapshot().await.unwrap();
    assert_eq!(session.boss().hp(), 20);
    assert_eq!(session.phase(), Phase::BossTurn);
    assert!(session.is_animating());

    let round = wait_for_phase(&mut events, Phase::PlayerTurn).await;
    let elapsed = started.elapsed();
    assert_eq!(round, 2);
    assert!(elapsed >= Duration::from_millis(2_500), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(3_000), "{elapsed:?}");

    let session = handle.snapshot().await.unwrap();
    assert_eq!(session.player().hp(), 92);
    assert!(session.is_animating());
    assert_eq!(
        session.log().last().map(|entry| entry.message.as_str()),
        Some("--- Round 2 ---")
    );
}

#[tokio::test(start_paused = true)]
async fn boss_winning_initiative_acts_without_player_input() {
    let rolls = Arc::new(QueuedRolls::new([1, 20, 0, 1]));
    let handle = runtime(rolls.clone()).start_session(BOSS, 7).unwrap();
    let mut events = handle.subscribe();

    let transition = handle.roll_initiative().await.unwrap();
    assert!(matches!(
        transition,
        Transition::Applied { to: Phase::BossTurn, .. }
    ));

    let started = Instant::now();
    wait_for_phase(&mut events, Phase::PlayerTurn).await;
    assert!(started.elapsed() >= Duration::from_millis(1_500));
    assert_eq!(rolls.remaining(), 0);

    // Input stays blocked until the boss animation window closes.
    let ignored = handle.submit_action("radiant-smite").await.unwrap();
    assert_eq!(
        ignored,
        Transition::Ignored {
            reason: IgnoreReason::Animating
        }
    );
    loop {
        if events.recv().await.unwrap() == CombatEvent::AnimationCleared {
            break;
        }
    }
    assert!(!handle.snapshot().await.unwrap().is_animating());
}

#[tokio::test(start_paused = true)]
async fn log_entries_are_streamed_in_order() {
    let rolls = Arc::new(QueuedRolls::new([20, 1, 10]));
    let handle = runtime(rolls).start_session(BOSS, 7).unwrap();
    let mut events = handle.subscribe();

    player_first(&handle).await;
    handle.submit_action("radiant-smite").await.unwrap();

    let mut messages = Vec::new();
    let mut resolved = None;
    while let Ok(event) = events.try_recv() {
        match event {
            CombatEvent::LogAppended(entry) => messages.push(entry.message),
            CombatEvent::ActionResolved { actor, outcome } => resolved = Some((actor, outcome)),
            _ => {}
        }
    }
    assert_eq!(
        messages,
        [
            "Paladin rolled 22",
            "Test Wyrm rolled 2",
            "Paladin acts first!",
            "Radiant Smite hits Test Wyrm for 25 damage!",
        ]
    );
    let (actor, outcome) = resolved.expect("player action resolved");
    assert_eq!(actor, combat_core::Side::Player);
    assert_eq!(outcome.ability_id, "radiant-smite");
}

#[tokio::test(start_paused = true)]
async fn out_of_turn_input_is_ignored() {
    let rolls = Arc::new(QueuedRolls::new([20, 1, 10]));
    let handle = runtime(rolls).start_session(BOSS, 7).unwrap();

    let early = handle.submit_action("radiant-smite").await.unwrap();
    assert!(matches!(
        early,
        Transition::Ignored {
            reason: IgnoreReason::WrongPhase {
                expected: Phase::PlayerTurn,
                actual: Phase::Initiative
            }
        }
    ));

    player_first(&handle).await;
    let again = handle.roll_initiative().await.unwrap();
    assert!(!again.is_applied());

    handle.submit_action("radiant-smite").await.unwrap();
    let during_animation = handle.submit_action("radiant-smite").await.unwrap();
    assert_eq!(
        during_animation,
        Transition::Ignored {
            reason: IgnoreReason::Animating
        }
    );
    assert_eq!(handle.snapshot().await.unwrap().boss().hp(), 20);
}

#[tokio::test(start_paused = true)]
async fn unknown_ability_is_rejected_without_side_effects() {
    let rolls = Arc::new(QueuedRolls::new([20, 1]));
    let handle = runtime(rolls).start_session(BOSS, 7).unwrap();
    player_first(&handle).await;

    let err = handle.submit_action("fireball").await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownAbility { ref ability_id, .. } if ability_id == "fireball"));

    let session = handle.snapshot().await.unwrap();
    assert_eq!(session.phase(), Phase::PlayerTurn);
    assert_eq!(session.boss().hp(), 45);
}

#[tokio::test(start_paused = true)]
async fn ending_a_session_cancels_the_pending_boss_turn() {
    // Boss rolls are queued but must never be consumed.
    let rolls = Arc::new(QueuedRolls::new([20, 1, 10, 0, 1]));
    let handle = runtime(rolls.clone()).start_session(BOSS, 7).unwrap();
    let mut events = handle.subscribe();

    player_first(&handle).await;
    handle.submit_action("radiant-smite").await.unwrap();
    let summary = handle.end().await.unwrap();
    assert_eq!(summary.phase, Phase::BossTurn);
    assert_eq!(summary.boss_hp, 20);
    assert!(summary.sigil.is_none());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(rolls.remaining(), 2);
    assert!(matches!(
        handle.snapshot().await,
        Err(RuntimeError::CommandChannelClosed)
    ));

    let mut saw_end = false;
    while let Ok(event) = events.try_recv() {
        assert!(!matches!(event, CombatEvent::PhaseChanged { from: Phase::BossTurn, .. }));
        saw_end |= matches!(event, CombatEvent::SessionEnded(_));
    }
    assert!(saw_end);
}

#[tokio::test(start_paused = true)]
async fn scripted_battle_runs_to_victory() {
    let rolls = Arc::new(QueuedRolls::new([]));
    let handle = runtime(rolls).start_session(BOSS, 11).unwrap();
    let provider = ScriptedProvider::new(["finisher", "finisher"]);

    let summary = handle.run_to_completion(&provider).await.unwrap();

    assert!(summary.is_victory());
    assert_eq!(summary.boss_hp, 0);
    assert_eq!(summary.sigil.as_deref(), Some("Wyrm Sigil"));
    assert_eq!(summary.victory_text.as_deref(), Some("The wyrm falls."));
    assert_eq!(provider.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn exhausted_script_stops_the_driver() {
    let rolls = Arc::new(QueuedRolls::new([20, 1]));
    let handle = runtime(rolls).start_session(BOSS, 11).unwrap();
    let provider = ScriptedProvider::new(["finisher"]);

    let err = handle.run_to_completion(&provider).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ProviderExhausted));
    assert_eq!(handle.snapshot().await.unwrap().boss().hp(), 20);
}

#[tokio::test]
async fn unknown_boss_fails_at_start() {
    let runtime = runtime(Arc::new(QueuedRolls::default()));
    let err = runtime.start_session("nobody", 1).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::UnknownBoss { .. })
    ));
}

#[test]
fn builder_requires_a_catalog() {
    let err = CombatRuntime::builder()
        .config(RuntimeConfig::instant())
        .build()
        .err();
    assert!(matches!(err, Some(RuntimeError::MissingCatalog)));
}
