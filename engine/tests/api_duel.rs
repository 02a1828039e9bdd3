use brawl_engine::api::{simulate_duel, DuelConfig, ParticipantSpec};
use brawl_engine::HealCap;

fn duel_cfg(seed: u64) -> DuelConfig {
    DuelConfig {
        challenger: ParticipantSpec::Labeled { id: "u1".into(), label: "Alice".into() },
        opponent: ParticipantSpec::Labeled { id: "u2".into(), label: "Bob".into() },
        catalog: None,
        catalog_id: None,
        catalog_path: None,
        seed,
        starting_hp: None,
        heal_cap: HealCap::Uncapped,
        house: None,
        max_rounds: None,
    }
}

#[test]
fn duel_api_smoke() {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let catalog_path = manifest
        .join("content/catalogs/gentle.yaml")
        .to_string_lossy()
        .into_owned();

    let cfg = DuelConfig { catalog_path: Some(catalog_path), ..duel_cfg(2025) };
    let res = simulate_duel(cfg).expect("duel ran");
    assert!(res.rounds > 0);
    assert!(matches!(res.winner.as_str(), "u1" | "u2"));
    assert!(!res.log.is_empty());
    assert_eq!(res.log.first().map(String::as_str), Some("[START] Duel: Alice vs Bob, both at 100 HP"));
    assert!(res.log.last().unwrap().starts_with("[END] winner="));
    assert_eq!(res.log.len(), res.events.len());
}

#[test]
fn same_seed_same_duel() {
    let a = simulate_duel(duel_cfg(77)).unwrap();
    let b = simulate_duel(duel_cfg(77)).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner, b.winner);
}

#[test]
fn house_participant_wins_on_the_first_swing() {
    let cfg = DuelConfig { house: Some("u1".into()), ..duel_cfg(5) };
    let res = simulate_duel(cfg).unwrap();
    assert_eq!(res.winner, "u1");
    assert_eq!(res.winner_label, "Alice");
    assert_eq!(res.rounds, 1);
    assert!(res.log[2].starts_with("[TAUNT][Alice]"));
}

#[test]
fn house_must_be_one_of_the_duelists() {
    let cfg = DuelConfig { house: Some("u9".into()), ..duel_cfg(5) };
    let err = simulate_duel(cfg).unwrap_err();
    assert!(err.to_string().contains("u9"));
}

#[test]
fn house_needs_a_catalog_with_a_house_attack() {
    let cfg = DuelConfig {
        house: Some("u1".into()),
        catalog_id: Some("gentle".into()),
        ..duel_cfg(5)
    };
    assert!(simulate_duel(cfg).is_err());
}

#[test]
fn custom_starting_hp_shows_in_the_opening_line() {
    let cfg = DuelConfig { starting_hp: Some(40), ..duel_cfg(3) };
    let res = simulate_duel(cfg).unwrap();
    assert_eq!(res.log[0], "[START] Duel: Alice vs Bob, both at 40 HP");
}

#[test]
fn config_reads_from_json() {
    let cfg: DuelConfig = serde_json::from_str(
        r#"{
            "challenger": { "id": "bot", "label": "The House" },
            "opponent": "alice",
            "seed": 11,
            "heal_cap": "starting_hp",
            "house": "bot"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.heal_cap, HealCap::StartingHp);
    let res = simulate_duel(cfg).unwrap();
    assert_eq!(res.winner_label, "The House");
}

#[test]
fn inline_catalog_wins_over_the_builtin_id() {
    let mut catalog = brawl_engine::Catalog::builtin("gentle").unwrap();
    catalog.house_attack = Some(brawl_engine::catalog::HouseAttack {
        name: "pillow fort collapse".into(),
        damage: 500,
        taunt: None,
    });
    let cfg = DuelConfig {
        catalog: Some(catalog),
        catalog_id: Some("default".into()),
        house: Some("u1".into()),
        ..duel_cfg(9)
    };
    let res = simulate_duel(cfg).unwrap();
    assert!(res.log.iter().any(|l| l.contains("pillow fort collapse")));
    assert!(!res.log.iter().any(|l| l.starts_with("[TAUNT]")));
}
