use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenex_core::PromptType;
use scenex_experiment::{
    build_stimuli, load_stimuli_file, prepare_trial, write_results, ExperimentError, FrameRecord,
    ResultSummary, SceneCatalog, StimulusPlan,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scenex-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn frame(frame: &str) -> serde_json::Value {
    json!({
        "scene": "mancar",
        "frame": frame,
        "referents": { "A": "man", "B": "car" },
        "frame_path": format!("{frame}.png"),
        "labeled_frame_path": format!("{frame}.00.png"),
        "arrow_frame_path": format!("{frame}.arrow.png"),
        "scene_data": {
            "ground": "the car",
            "prompts": {
                "confirm": "Is the man {relation} {ground}?",
                "count": "How many objects are {relation} {ground}?",
            },
        },
    })
}

fn write_catalog(dir: &Path, frames: &[&str]) {
    for (i, name) in frames.iter().enumerate() {
        let path = dir.join(format!("mancar.{i:02}.json"));
        fs::write(path, frame(name).to_string()).unwrap();
    }
}

#[test]
fn prompt_templates_are_filled() {
    let record: FrameRecord = serde_json::from_value(frame("mancar-01")).unwrap();
    let trial = prepare_trial(&record, "in front of", PromptType::Confirm).unwrap();

    assert_eq!(trial.prompt, "Is the man in front of the car?");
    assert_eq!(trial.relation, json!("in front of"));
    assert_eq!(trial.scene, json!("mancar"));
    assert_eq!(trial.frame, json!("mancar-01"));
    assert_eq!(trial.stimulus_path(), Some("mancar-01.arrow.png"));
    assert_eq!(trial.choices().labels(), ["Yes", "No"]);
}

#[test]
fn missing_template_is_an_error() {
    let record: FrameRecord = serde_json::from_value(frame("mancar-01")).unwrap();
    let err = prepare_trial(&record, "near", PromptType::Pick).unwrap_err();
    assert!(matches!(err, ExperimentError::MissingPrompt { .. }));
}

#[test]
fn catalog_reads_matching_files_only() {
    let dir = scratch_dir("catalog");
    write_catalog(&dir, &["mancar-01", "mancar-02", "mancar-02"]);
    fs::write(dir.join("other.00.json"), frame("other-01").to_string()).unwrap();
    fs::write(dir.join("mancar.png"), b"not json").unwrap();

    let catalog = SceneCatalog::load(&dir, "mancar").unwrap();
    assert_eq!(catalog.len(), 2);
    let frames: Vec<_> = catalog.frames().map(|f| f.frame.as_str()).collect();
    assert_eq!(frames, ["mancar-01", "mancar-02"]);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn malformed_frame_file_reports_its_path() {
    let dir = scratch_dir("malformed");
    let bad = dir.join("mancar.00.json");
    fs::write(&bad, "{ not json").unwrap();

    match SceneCatalog::load(&dir, "mancar") {
        Err(ExperimentError::Json { path, .. }) => assert_eq!(path, bad),
        other => panic!("expected a JSON error, got {other:?}"),
    }

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn two_part_plan_samples_each_part() {
    let confirm_dir = scratch_dir("part1");
    let count_dir = scratch_dir("part2");
    write_catalog(&confirm_dir, &["mancar-01", "mancar-02", "mancar-03", "mancar-04"]);
    write_catalog(&count_dir, &["mancar-05", "mancar-06"]);

    let plan = StimulusPlan::two_part(
        SceneCatalog::load(&confirm_dir, "mancar").unwrap(),
        SceneCatalog::load(&count_dir, "mancar").unwrap(),
    );
    let mut rng = StdRng::seed_from_u64(7);
    let trials = build_stimuli(&plan, &mut rng).unwrap();

    let confirm: Vec<_> = trials
        .iter()
        .filter(|t| t.prompt_type == PromptType::Confirm)
        .collect();
    let count: Vec<_> = trials
        .iter()
        .filter(|t| t.prompt_type == PromptType::Count)
        .collect();

    assert_eq!(confirm.len(), 3);
    assert_eq!(count.len(), 2, "part 2 only has two frames");
    assert!(confirm
        .iter()
        .all(|t| t.relation == json!("in front of") || t.relation == json!("near")));
    assert!(count.iter().all(|t| t.relation == json!("near")));

    let mut frames: Vec<_> = confirm.iter().map(|t| t.frame.to_string()).collect();
    frames.sort();
    frames.dedup();
    assert_eq!(frames.len(), 3, "frames are drawn without replacement");

    fs::remove_dir_all(confirm_dir).unwrap();
    fs::remove_dir_all(count_dir).unwrap();
}

#[test]
fn stimuli_file_and_results_file() {
    let dir = scratch_dir("files");
    let stimuli_path = dir.join("stimuli.json");
    fs::write(
        &stimuli_path,
        json!({
            "stimuli": [
                { "prompt_type": "confirm", "prompt": "Is this true?", "arrow_frame_path": "x.png" },
                { "prompt_type": "count", "referents": { "a": {}, "b": {} }, "frame_path": "f.png" },
            ]
        })
        .to_string(),
    )
    .unwrap();

    let trials = load_stimuli_file(&stimuli_path).unwrap();
    assert_eq!(trials.len(), 2);
    assert_eq!(trials[1].choices().labels(), ["0", "1", "2"]);

    let mut records: Vec<_> = trials.iter().map(scenex_core::ResponseRecord::pending).collect();
    records[0].choice = Some(scenex_core::Choice::Label("Yes".into()));
    records[0].rt = Some(250.0);

    let summary = ResultSummary::from_records(&records);
    assert_eq!(summary.trials, 2);
    assert_eq!(summary.answered, 1);
    assert_eq!(summary.mean_rt_ms, Some(250.0));

    let results_path = dir.join("results.json");
    write_results(&results_path, &records).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&results_path).unwrap()).unwrap();
    assert_eq!(written[0]["choice"], json!("Yes"));
    assert_eq!(written[1]["choice"], json!(null));

    fs::remove_dir_all(dir).unwrap();
}
