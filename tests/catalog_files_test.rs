use std::fs;
use std::path::PathBuf;

use planet_repair::config::{load_bank, load_scene};
use planet_repair::core::{ConfigError, QuestionBank, Scene};
use planet_repair::types::BuildingId;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("planet-repair-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn builtin_catalog_is_playable() {
    let bank = QuestionBank::builtin().unwrap();
    assert!(bank.len() >= 3);
    for item in bank.items() {
        assert!(item.options.contains(&item.correct_option));
    }
}

#[test]
fn catalog_accepts_both_key_spellings() {
    let json = r#"{"questions":[
        {"question":"A?","options":["x","y"],"correctAnswer":"x"},
        {"prompt":"B?","options":["x","y"],"correctOption":"y"},
        {"question":"C?","options":["x","y","z"],"correctAnswer":"z"}
    ]}"#;
    let bank = QuestionBank::from_json_str(json).unwrap();
    assert_eq!(bank.get(1).unwrap().prompt, "B?");
    assert_eq!(bank.get(1).unwrap().correct_option, "y");
}

#[test]
fn catalog_rejections() {
    let too_small = r#"{"questions":[{"question":"A?","options":["x"],"correctAnswer":"x"}]}"#;
    assert!(matches!(
        QuestionBank::from_json_str(too_small),
        Err(ConfigError::TooFewQuestions { found: 1, .. })
    ));

    let bad_answer = r#"{"questions":[
        {"question":"A?","options":["x","y"],"correctAnswer":"x"},
        {"question":"B?","options":["x","y"],"correctAnswer":"q"},
        {"question":"C?","options":["x","y"],"correctAnswer":"y"}
    ]}"#;
    assert!(matches!(
        QuestionBank::from_json_str(bad_answer),
        Err(ConfigError::MissingCorrectOption { index: 1 })
    ));

    assert!(matches!(
        QuestionBank::from_json_str("[]"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn scene_reads_percent_and_normalized_positions() {
    let percent = r#"{"buildings":[{"id":4,"x":25,"y":50},{"id":9,"x":1,"y":0.5}]}"#;
    let scene = Scene::from_json_str(percent).unwrap();
    let a = scene.get(BuildingId(4)).unwrap();
    assert!((a.position.x - 0.25).abs() < 1e-6);
    assert!((a.position.y - 0.5).abs() < 1e-6);
    // Small values in a percent document are still percent.
    let b = scene.get(BuildingId(9)).unwrap();
    assert!((b.position.x - 0.01).abs() < 1e-6);
    assert!((b.position.y - 0.005).abs() < 1e-6);

    let normalized = r#"{"buildings":[{"id":9,"x":0.5,"y":0.25},{"id":2,"x":1,"y":1}]}"#;
    let scene = Scene::from_json_str(normalized).unwrap();
    let b = scene.get(BuildingId(9)).unwrap();
    assert!((b.position.x - 0.5).abs() < 1e-6);
    assert!((b.position.y - 0.25).abs() < 1e-6);
    assert!((scene.get(BuildingId(2)).unwrap().position.x - 1.0).abs() < 1e-6);
}

#[test]
fn scene_rejects_duplicates_and_empty() {
    let dup = r#"{"buildings":[{"id":1,"x":10,"y":10},{"id":1,"x":20,"y":20}]}"#;
    assert!(matches!(
        Scene::from_json_str(dup),
        Err(ConfigError::DuplicateBuildingId(BuildingId(1)))
    ));
    assert!(matches!(
        Scene::from_json_str(r#"{"buildings":[]}"#),
        Err(ConfigError::NoBuildings)
    ));

    let ten: Vec<String> = (1..=10)
        .map(|id| format!(r#"{{"id":{},"x":{},"y":50}}"#, id, id * 5))
        .collect();
    let crowded = format!(r#"{{"buildings":[{}]}}"#, ten.join(","));
    assert!(matches!(
        Scene::from_json_str(&crowded),
        Err(ConfigError::TooManyBuildings { found: 10, max: 9 })
    ));
}

#[test]
fn files_load_through_config_helpers() {
    let catalog = temp_file(
        "catalog.json",
        r#"{"questions":[
            {"question":"A?","options":["x","y"],"correctAnswer":"x"},
            {"question":"B?","options":["x","y"],"correctAnswer":"y"},
            {"question":"C?","options":["x","y"],"correctAnswer":"x"}
        ]}"#,
    );
    let scene = temp_file("scene.json", r#"{"buildings":[{"id":1,"x":50,"y":50}]}"#);

    assert_eq!(load_bank(&catalog).unwrap().len(), 3);
    assert_eq!(load_scene(&scene).unwrap().len(), 1);

    let missing = std::env::temp_dir().join("planet-repair-does-not-exist.json");
    let err = load_bank(&missing).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to read question catalog"));

    let _ = fs::remove_file(catalog);
    let _ = fs::remove_file(scene);
}
