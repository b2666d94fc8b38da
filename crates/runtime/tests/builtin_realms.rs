//! Full battles against the bundled realms.

use std::sync::Arc;

use combat_content::ContentCatalog;
use combat_runtime::{CombatEvent, CombatRuntime, RandomProvider, RuntimeConfig};

fn runtime() -> CombatRuntime {
    let catalog = ContentCatalog::builtin().expect("builtin content parses");
    CombatRuntime::builder()
        .catalog(Arc::new(catalog))
        .config(RuntimeConfig::instant())
        .build()
        .expect("runtime should build")
}

#[tokio::test(start_paused = true)]
async fn random_play_finishes_every_realm() {
    let runtime = runtime();
    for (index, boss_id) in runtime.boss_ids().iter().enumerate() {
        let handle = runtime.start_session(boss_id, index as u64).unwrap();
        let provider = RandomProvider::from_seed(index as u64);

        let summary = handle.run_to_completion(&provider).await.unwrap();

        assert!(summary.phase.is_terminal(), "{boss_id}: {:?}", summary.phase);
        assert_eq!(summary.sigil.is_some(), summary.is_victory());
        assert!(summary.player_hp == 0 || summary.boss_hp == 0);
    }
}

#[tokio::test(start_paused = true)]
async fn same_seed_replays_the_same_battle() {
    let runtime = runtime();
    let mut logs = Vec::new();
    for _ in 0..2 {
        let handle = runtime.start_session("shadowcloud", 99).unwrap();
        let summary = handle
            .run_to_completion(&RandomProvider::from_seed(4))
            .await
            .unwrap();
        logs.push((summary.rounds, summary.player_hp, summary.boss_hp));
    }
    assert_eq!(logs[0], logs[1]);
}

#[tokio::test(start_paused = true)]
async fn events_serialize_for_clients() {
    let runtime = runtime();
    let handle = runtime.start_session("docker-tiamat", 1).unwrap();
    let mut events = handle.subscribe();
    handle.roll_initiative().await.unwrap();

    let event = events.recv().await.unwrap();
    let json = serde_json::to_string(&event).unwrap();
    let back: CombatEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
    assert!(json.contains("LogAppended"), "{json}");
}
