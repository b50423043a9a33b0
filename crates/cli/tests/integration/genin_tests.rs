//! `haga genin` integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn genin_copy_targets_mirror_paths() {
  let env = TestEnv::with_description(
    r#"
return {
  targets = {
    { type = "copy", inputs = { "robots.txt", "img/logo.png" }, output_dir = "public" },
  },
}
"#,
  );
  let root = env.root();
  let root = root.display();

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains(format!(
      "build {root}/out/public/robots.txt: copy {root}/robots.txt"
    )))
    .stdout(predicate::str::contains(format!(
      "build {root}/out/public/img/logo.png: copy {root}/img/logo.png"
    )));
}

#[test]
fn genin_adds_default_regen_edge() {
  let env = TestEnv::with_description(r#"return { targets = { { type = "copy", inputs = { "a" } } } }"#);
  let root = env.root();
  let root = root.display();

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains(format!(
      "build {root}/out/build.ninja: regen {root}/HAGA.lua"
    )))
    .stdout(predicate::str::contains("generator = 1"))
    .stdout(predicate::str::contains(format!("|| {root}/out/build.ninja")));
}

#[test]
fn genin_cpps_drops_template_suffix() {
  let env = TestEnv::with_description(
    r#"
return {
  targets = {
    { type = "cpps", inputs = { "index.html.in" }, defines = { "SITE=1" } },
  },
}
"#,
  );
  let root = env.root();
  let root = root.display();

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains("rule cpp"))
    .stdout(predicate::str::contains(format!(
      "build {root}/out/index.html {root}/out/index.html.d: cpp {root}/index.html.in"
    )))
    .stdout(predicate::str::contains(r#"defines = "-DSITE=1""#));
}

#[test]
fn genin_keywords_concatenate() {
  let env = TestEnv::with_description(
    r#"
return {
  rules = {
    { name = "stamp", commands = { { haga.kw.TOUCH_COMMAND, "$out" } } },
  },
  targets = {
    { type = "core", rule = "stamp", inputs = {}, outputs = { "stamp" } },
    { type = "copy", inputs = { "a" }, output_dir = haga.kw.OUTPUT_DIR .. "/assets" },
  },
}
"#,
  );
  let root = env.root();

  env
    .haga_cmd()
    .env("HAGA_TOUCH", "/bin/touch")
    .arg("genin")
    .assert()
    .success()
    .stdout(predicate::str::contains("command = /bin/touch $out"))
    .stdout(predicate::str::contains("build stamp: stamp"))
    .stdout(predicate::str::contains(format!("build {0}/out/assets/a: copy {0}/a", root.display())));
}

#[test]
fn genin_writes_build_file_with_out_dir() {
  let env = TestEnv::with_description(r#"return { targets = { { type = "copy", inputs = { "a" } } } }"#);

  env
    .haga_cmd()
    .args(["genin", "-o", "out"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  assert!(env.read_file("out/build.ninja").contains("rule copy"));
}

#[test]
fn genin_explicit_description_path() {
  let env = TestEnv::new();
  env.write_file("site/SITE.lua", r#"return { targets = { { type = "copy", inputs = { "a" } } } }"#);
  let root = env.root();
  let root = root.display();

  env
    .haga_cmd()
    .args(["genin", "site/SITE.lua"])
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("build {root}/out/site/a: copy {root}/site/a")));
}

#[test]
fn genin_duplicate_rule_fails() {
  let env = TestEnv::with_description(
    r#"
return {
  rules = {
    { name = "stamp", commands = { { "touch", "$out" } } },
    { name = "stamp", commands = { { "date", ">", "$out" } } },
  },
  targets = {},
}
"#,
  );

  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .failure()
    .stderr(predicate::str::contains("duplicate rule found: stamp"))
    .stdout(predicate::str::is_empty());
}

#[test]
fn genin_unknown_target_type_fails() {
  let env = TestEnv::with_description(r#"return { targets = { { type = "nope" } } }"#);
  env.haga_cmd().arg("genin").assert().failure().stdout(predicate::str::is_empty());
}

#[test]
fn genin_reports_every_error_in_one_run() {
  let env = TestEnv::with_description(
    r#"
return {
  rules = {
    { name = "s", commands = { { "touch", "$out" } } },
    { name = "s", commands = { { "date" } } },
  },
  targets = { { type = "copy", inputs = { "a" }, output_dir = haga.kw.NOPE .. "/x" } },
}
"#,
  );
  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .failure()
    .stderr(predicate::str::contains("keyword NOPE is not defined in this context"))
    .stderr(predicate::str::contains("duplicate rule found: s"))
    .stderr(predicate::str::contains("2 errors"))
    .stdout(predicate::str::is_empty());
}

#[test]
fn genin_lua_syntax_error_fails() {
  let env = TestEnv::with_description("return {");
  env
    .haga_cmd()
    .arg("genin")
    .assert()
    .failure()
    .stderr(predicate::str::contains("HAGA.lua"));
}
