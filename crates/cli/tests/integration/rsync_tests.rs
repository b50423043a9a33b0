//! `haga rsync` integration tests.
//!
//! The transfer itself is replaced with `true` through `HAGA_RSYNC`, so only
//! the whitelist check runs for real.

use predicates::prelude::*;

use super::common::TestEnv;

fn env_with_files(files: &[&str]) -> TestEnv {
  let env = TestEnv::new();
  for file in files {
    env.write_file(&format!("public/{file}"), "x");
  }
  env
}

#[test]
fn exact_whitelist_syncs() {
  let env = env_with_files(&["index.html", "css/site.css"]);

  env
    .haga_cmd()
    .env("HAGA_RSYNC", "true")
    .args(["rsync", "public", "/srv/www", "index.html", "css/site.css"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Synced"));
}

#[test]
fn unexpected_file_blocks_sync() {
  let env = env_with_files(&["index.html", "stale.html"]);

  env
    .haga_cmd()
    .env("HAGA_RSYNC", "false")
    .args(["rsync", "public", "/srv/www", "index.html"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("UNEXPECTED_FILE"))
    .stderr(predicate::str::contains("stale.html"));
}

#[test]
fn missing_input_is_reported() {
  let env = env_with_files(&["index.html"]);

  env
    .haga_cmd()
    .env("HAGA_RSYNC", "true")
    .args(["rsync", "public", "/srv/www", "index.html", "about.html"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("INPUT_NOT_FOUND"))
    .stderr(predicate::str::contains("about.html"));
}

#[test]
fn input_outside_src_dir_is_reported() {
  let env = env_with_files(&["index.html"]);
  env.write_file("secret.txt", "x");

  env
    .haga_cmd()
    .env("HAGA_RSYNC", "true")
    .args(["rsync", "public", "/srv/www", "index.html", "../secret.txt"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("INPUT_OUTSIDE_SRC_DIR"));
}

#[test]
fn directory_input_is_reported() {
  let env = env_with_files(&["css/site.css"]);

  env
    .haga_cmd()
    .env("HAGA_RSYNC", "true")
    .args(["rsync", "public", "/srv/www", "css", "css/site.css"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("INPUT_IS_DIRECTORY"));
}

#[test]
fn src_dir_file_is_reported() {
  let env = TestEnv::new();
  env.write_file("public", "not a dir");

  env
    .haga_cmd()
    .args(["rsync", "public", "/srv/www"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("SRC_DIR_NOT_DIRECTORY"));
}

#[test]
fn failing_transfer_is_an_error() {
  let env = env_with_files(&["index.html"]);

  env
    .haga_cmd()
    .env("HAGA_RSYNC", "false")
    .args(["rsync", "public", "/srv/www", "index.html"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Sync failed"));
}
