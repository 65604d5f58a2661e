use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

const REFERENCE: [&str; 8] = [
    "--int=99",
    "--dex=90",
    "--luk=10",
    "--base-level=99",
    "--job-level=10",
    "--potion-research=10",
    "--chemical-protection=5",
    "--pharmacy-level=10",
];

fn workspace_assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root")
        .join("assets")
}

fn run_in(assets: &Path, data: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pharmacy"))
        .arg("--assets")
        .arg(assets)
        .arg("--data-dir")
        .arg(data)
        .args(args)
        .output()
        .expect("run pharmacy")
}

fn run(data: &TempDir, args: &[&str]) -> Output {
    run_in(&workspace_assets(), data.path(), args)
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "pharmacy failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

fn price_line<'a>(text: &'a str, id: &str) -> Option<&'a str> {
    text.lines()
        .find(|line| line.split_whitespace().next() == Some(id))
}

#[test]
fn evaluate_reports_reference_range() {
    let data = tempdir().expect("temp dir");
    let mut args = vec!["evaluate"];
    args.extend(REFERENCE);
    let text = stdout(&run(&data, &args));
    assert!(
        text.starts_with("level 10 | max potions 12 | min 263 | max 413"),
        "{text}"
    );
    assert!(text.contains("effective INT 99 DEX 90 LUK 10"), "{text}");
    assert!(text.contains("MAX-6"), "{text}");
}

#[test]
fn evaluate_applies_buff_flags() {
    let data = tempdir().expect("temp dir");
    let mut args = vec!["evaluate", "--buff", "gloria"];
    args.extend(REFERENCE);
    let text = stdout(&run(&data, &args));
    assert!(text.contains("effective INT 99 DEX 90 LUK 40"), "{text}");
}

#[test]
fn negative_input_fails_validation() {
    let data = tempdir().expect("temp dir");
    let output = run(&data, &["evaluate", "--int=-5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("int: -5 is negative"), "{stderr}");
}

#[test]
fn non_numeric_input_fails_validation() {
    let data = tempdir().expect("temp dir");
    let output = run(&data, &["evaluate", "--dex", "lots"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not an integer"), "{stderr}");
}

#[test]
fn unknown_buff_flag_is_rejected() {
    let data = tempdir().expect("temp dir");
    let output = run(&data, &["evaluate", "--buff", "haste"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no buff \"haste\""));
}

#[test]
fn samples_repeat_for_a_seed() {
    let data = tempdir().expect("temp dir");
    let mut args = vec!["evaluate", "--item", "12428", "--samples", "4", "--seed", "0x2a"];
    args.extend(REFERENCE);
    let first = stdout(&run(&data, &args));
    let second = stdout(&run(&data, &args));
    assert_eq!(first, second);
    assert!(first.contains("samples (seed 42):"), "{first}");
    assert_eq!(first.lines().filter(|line| line.trim_start().starts_with('#')).count(), 4);
}

#[test]
fn samples_need_an_item() {
    let data = tempdir().expect("temp dir");
    let output = run(&data, &["evaluate", "--samples", "2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--samples needs --item"));
}

#[test]
fn missing_rulepack_is_fatal() {
    let assets = tempdir().expect("temp dir");
    let data = tempdir().expect("temp dir");
    let source = workspace_assets();
    for (dir, file) in [("catalog", "items.json"), ("defaults", "prices.json")] {
        fs::create_dir_all(assets.path().join(dir)).expect("mkdir");
        fs::copy(source.join(dir).join(file), assets.path().join(dir).join(file))
            .expect("copy asset");
    }
    let output = run_in(assets.path(), data.path(), &["items"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading game data"), "{stderr}");
    assert!(stderr.contains("advanced_pharmacy.toml"), "{stderr}");
}

#[test]
fn final_items_only_lists_finals() {
    let data = tempdir().expect("temp dir");
    let text = stdout(&run(&data, &["items", "--final"]));
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 13);
    assert!(rows.iter().all(|row| row.contains("final")));
}

#[test]
fn recipe_lists_materials_and_bands() {
    let data = tempdir().expect("temp dir");
    let text = stdout(&run(&data, &["recipe", "12428"]));
    assert!(text.contains("skill level 10"), "{text}");
    assert!(text.contains("item difficulty: 10"), "{text}");
    assert!(text.contains(" 10 x Garrafa Vazia (713)"), "{text}");
    assert!(text.contains("score >= 830"), "{text}");
}

#[test]
fn price_edits_persist_and_reset() {
    let data = tempdir().expect("temp dir");
    let dry = stdout(&run(&data, &["prices", "set", "507", "25", "--dry-run"]));
    assert!(dry.starts_with("source: live"), "{dry}");
    assert!(!data.path().join("prices.json").exists());

    stdout(&run(&data, &["prices", "set", "507", "25"]));
    assert!(data.path().join("prices.json").exists());
    let shown = stdout(&run(&data, &["prices", "show"]));
    assert!(shown.starts_with("source: user"), "{shown}");
    let line = price_line(&shown, "507").expect("red herb row");
    assert_eq!(line.split_whitespace().nth(1), Some("25"));

    let reset = stdout(&run(&data, &["prices", "reset"]));
    let line = price_line(&reset, "507").expect("red herb row");
    assert_eq!(line.split_whitespace().nth(1), Some("18"));
}

#[test]
fn negative_price_is_rejected() {
    let data = tempdir().expect("temp dir");
    let output = run(&data, &["prices", "set", "507", "-1"]);
    assert!(!output.status.success());
    assert!(!data.path().join("prices.json").exists());
}

#[test]
fn cost_table_covers_final_items() {
    let data = tempdir().expect("temp dir");
    let text = stdout(&run(&data, &["cost"]));
    assert!(text.starts_with("prices: default"), "{text}");
    // header plus one row per final item
    assert_eq!(text.lines().count(), 2 + 13);
}

#[test]
fn profile_edits_survive_between_runs() {
    let data = tempdir().expect("temp dir");
    let text = stdout(&run(&data, &["profile", "set", "int", "150"]));
    assert!(text.contains(" int 150 "), "{text}");
    stdout(&run(&data, &["profile", "buff", "gloria", "on"]));

    let shown = stdout(&run(&data, &["profile", "show"]));
    assert!(shown.contains(" int 150 "), "{shown}");
    assert!(shown.contains("buffs: gloria"), "{shown}");

    let evaluated = stdout(&run(&data, &["evaluate"]));
    assert!(evaluated.contains("effective INT 150 DEX 100 LUK 130"), "{evaluated}");
}

#[test]
fn profile_export_then_import() {
    let data = tempdir().expect("temp dir");
    let exported = data.path().join("backup").join("me.json");
    stdout(&run(&data, &["profile", "set", "dex", "120"]));
    stdout(&run(&data, &["profile", "export", exported.to_str().expect("utf8 path")]));

    stdout(&run(&data, &["profile", "reset"]));
    let reset = stdout(&run(&data, &["profile", "show"]));
    assert!(reset.contains(" dex 100 "), "{reset}");

    let imported = stdout(&run(
        &data,
        &["profile", "import", exported.to_str().expect("utf8 path")],
    ));
    assert!(imported.contains(" dex 120 "), "{imported}");
}
