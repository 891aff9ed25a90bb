use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wikipath_core::{write_snapshot, Graph, SnapshotLayout};

fn fixture(layout: SnapshotLayout) -> (TempDir, PathBuf) {
    let mut g = Graph::new();
    g.add_article(1, Some("Scooby-Doo".into()), vec![2, 4]);
    g.add_article(2, Some("Cartoon Network".into()), vec![3]);
    g.add_article(3, Some("ICarly".into()), vec![]);
    g.add_article(4, Some("Hanna-Barbera".into()), vec![2]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    write_snapshot(&path, &g, layout).unwrap();
    (dir, path)
}

fn wikipath(snapshot: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wikipath").unwrap();
    cmd.env_remove("WIKIPATH_LAYOUT")
        .env_remove("WIKIPATH_SEARCH_LIMIT")
        .env_remove("WIKIPATH_MAX_DEPTH")
        .env("WIKIPATH_SNAPSHOT", snapshot)
        .arg("--quiet");
    cmd
}

#[test]
fn status_reports_counts() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("vertices:       4"))
        .stdout(predicate::str::contains("edges:          4"))
        .stdout(predicate::str::contains("titles indexed: 4"));
}

#[test]
fn path_resolves_misspelled_names() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["path", "scooby doo", "icarli"])
        .assert()
        .success()
        .stdout(predicate::str::contains("From: Scooby-Doo (1)"))
        .stdout(predicate::str::contains("To:   ICarly (3)"))
        .stdout(predicate::str::contains("BFS: 2 hops"))
        .stdout(predicate::str::contains("IDDFS (cap 9): 2 hops"))
        .stdout(predicate::str::contains("2. Cartoon Network"));
}

#[test]
fn path_against_link_direction_is_not_found() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["path", "icarly", "scooby", "--strategy", "bfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BFS: no path found"));
}

#[test]
fn depth_cap_limits_iddfs() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["path", "scooby", "icarly", "--strategy", "iddfs", "--max-depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IDDFS (cap 1): no path found"));
}

#[test]
fn unmatched_name_fails() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["path", "scooby", "zzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no article matches 'zzz'"));
}

#[test]
fn search_lists_ranked_titles() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["search", "hanna", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hanna-Barbera"))
        .stdout(predicate::str::contains("Scooby").not());
}

#[test]
fn links_only_snapshot_accepts_ids() {
    let (_dir, path) = fixture(SnapshotLayout::LinksOnly);
    wikipath(&path)
        .args(["--layout", "links-only", "path", "1", "3", "--strategy", "bfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BFS: 2 hops"))
        .stdout(predicate::str::contains("3. #3"));
}

#[test]
fn missing_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    wikipath(&dir.path().join("absent.bin"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load snapshot"));
}

#[test]
fn corrupt_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.bin");
    std::fs::write(&path, 5u32.to_le_bytes()).unwrap();
    wikipath(&path)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt snapshot"));
}

#[test]
fn search_limit_must_be_positive() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["search", "hanna", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit"));
}

#[test]
fn hash_prefix_selects_an_id() {
    let (_dir, path) = fixture(SnapshotLayout::Titled);
    wikipath(&path)
        .args(["path", "#4", "icarly", "--strategy", "bfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("From: Hanna-Barbera (4)"))
        .stdout(predicate::str::contains("BFS: 2 hops"));
}
