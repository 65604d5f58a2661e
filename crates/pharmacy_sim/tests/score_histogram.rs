use std::fs;
use std::process::Command;

use tempfile::tempdir;

#[test]
fn histogram_covers_every_roll_pair() {
    let dir = tempdir().expect("temp dir");
    let out_path = dir.path().join("scores").join("enrich_white.csv");
    let status = Command::new(env!("CARGO_BIN_EXE_pharmacy-sim"))
        .args([
            "--item",
            "12428",
            "--int",
            "99",
            "--dex",
            "90",
            "--luk",
            "10",
            "--base-level",
            "99",
            "--job-level",
            "10",
            "--potion-research",
            "10",
            "--chemical-protection",
            "5",
            "--pharmacy-level",
            "10",
            "--out",
            out_path.to_str().expect("utf8 path"),
        ])
        .status()
        .expect("run pharmacy-sim");
    assert!(status.success(), "pharmacy-sim exited with {status:?}");

    let csv = fs::read_to_string(&out_path).expect("read csv");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("score,combos,yield"));
    let rows: Vec<(i64, u64, u32)> = lines
        .map(|line| {
            let cols: Vec<&str> = line.split(',').collect();
            (
                cols[0].parse().expect("score"),
                cols[1].parse().expect("combos"),
                cols[2].parse().expect("yield"),
            )
        })
        .collect();
    assert_eq!(rows.first(), Some(&(263, 1, 6)));
    assert_eq!(rows.last().map(|row| row.0), Some(413));
    assert_eq!(rows.iter().map(|row| row.1).sum::<u64>(), 847);
    // every score sits below the 430 difficulty
    assert!(rows.iter().all(|row| row.2 == 6));
}

#[test]
fn missing_item_flag_fails() {
    let status = Command::new(env!("CARGO_BIN_EXE_pharmacy-sim"))
        .args(["--int", "99"])
        .status()
        .expect("run pharmacy-sim");
    assert!(!status.success());
}
