//! Deployment targets: config bootstrap and validation during `genin`.

use predicates::prelude::*;

use super::common::TestEnv;

const DEPLOY_DESCRIPTION: &str = r#"
return {
  targets = {
    { type = "copy", inputs = { "index.html" }, output_dir = "public" },
    { type = "rsync", name = "deploy", src_dir = "public", inputs = { "index.html" },
      dst_dir = "user@host:/srv/www" },
  },
}
"#;

#[test]
fn first_run_bootstraps_config() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  assert!(!env.exists("config"));

  let root = env.root();
  let root = root.display();
  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains(r#"dstDir = "user@host:/srv/www""#))
    .stdout(predicate::str::contains(format!(
      "build {root}/out/public.timestamp: rsync {root}/out/public/index.html"
    )))
    .stdout(predicate::str::contains(format!("build deploy: phony {root}/out/public.timestamp")));

  let config: serde_json::Value = serde_json::from_str(&env.read_file("config")).unwrap();
  assert_eq!(config["dstDir"], "user@host:/srv/www");
}

#[test]
fn deploy_target_stays_out_of_all() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  let root = env.root();

  let output = env.haga_cmd().arg("genin").output().unwrap();
  assert!(output.status.success());
  let ninja = String::from_utf8(output.stdout).unwrap();

  let all = ninja.lines().find(|l| l.starts_with("build all: phony")).unwrap();
  assert!(all.contains(&format!("{}/out/public/index.html", root.display())));
  assert!(!all.contains("timestamp"));
  assert!(!all.contains("deploy"));
}

#[test]
fn edited_config_wins() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  env.write_file("config", "{\n  \"dstDir\": \"/mnt/mirror\"\n}\n");

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains(r#"dstDir = "/mnt/mirror""#))
    .stdout(predicate::str::contains("user@host").not());
}

#[test]
fn config_is_a_regeneration_input() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  let root = env.root();
  let root = root.display();

  let output = env.haga_cmd().arg("genin").output().unwrap();
  let ninja = String::from_utf8(output.stdout).unwrap();
  let regen = ninja.lines().find(|l| l.contains(": regen ")).unwrap();
  assert!(regen.contains(&format!("{root}/config")), "{regen}");
}

#[test]
fn invalid_config_fails_and_is_kept() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  env.write_file("config", r#"{ "dstDir": 42 }"#);

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .failure()
    .stderr(predicate::str::contains("CONFIG_INVALID_SCHEMA"));

  assert_eq!(env.read_file("config"), r#"{ "dstDir": 42 }"#);
}

#[test]
fn hand_edited_json5_config_is_read() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  env.write_file("config", "{\n  // staging\n  dstDir: '/mnt/staging',\n}\n");

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains(r#"dstDir = "/mnt/staging""#));
}

#[test]
fn malformed_config_fails() {
  let env = TestEnv::with_description(DEPLOY_DESCRIPTION);
  env.write_file("config", "not json");

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .failure()
    .stderr(predicate::str::contains("CONFIG_PARSE_ERROR"));
}

#[test]
fn whitespace_input_drops_deploy_target() {
  let env = TestEnv::with_description(
    r#"
return {
  targets = {
    { type = "rsync", name = "deploy", src_dir = "public", inputs = { "my file.html" },
      dst_dir = "/srv/www" },
  },
}
"#,
  );

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stderr(predicate::str::contains("my file.html"))
    .stdout(predicate::str::contains("build deploy").not());
}
