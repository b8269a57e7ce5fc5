//! Integration tests for the project lifecycle
//!
//! Drives init, setup, ready, build and status through the binary with a
//! stub library and a stand-in compiler.

mod common;

use common::{stderr, stdout, TestProject, BASE_JS, DEPS_JS};

#[test]
fn test_status_of_empty_directory() {
    let project = TestProject::new();

    let output = project.run_ok(&["--json", "status"]);

    let doc: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(doc["stage"], "uninitialized");
    assert_eq!(doc["production_bundle"], false);
}

#[test]
fn test_setup_requires_init() {
    let project = TestProject::new();

    let output = project.run(&["setup"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("uninitialized"), "unexpected stderr: {err}");
    assert!(err.contains("nskit init"), "unexpected stderr: {err}");
    assert!(project.snapshot().is_empty());
}

#[test]
fn test_setup_skips_present_library() {
    let project = TestProject::tools_ready();

    let output = project.run_ok(&["setup"]);

    assert!(stdout(&output).contains("already present"));
    assert_eq!(project.read_file(BASE_JS), "var goog = goog || {};\n");
}

#[test]
fn test_ready_requires_tools() {
    let project = TestProject::new();
    project.run_ok(&["init"]);

    let output = project.run(&["ready"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("tools ready"), "unexpected stderr: {err}");
    assert!(err.contains("nskit setup"), "unexpected stderr: {err}");
    assert!(!project.file_exists(DEPS_JS));
}

#[test]
fn test_ready_writes_manifest() {
    let project = TestProject::tools_ready();
    project.create_file(
        "development/js_dev/app/view.js",
        "goog.provide('app.View');\ngoog.require('app.Model');\n",
    );
    project.create_file("development/js_dev/app/model.js", "goog.provide('app.Model');\n");

    project.run_ok(&["ready"]);

    let deps = project.read_file(DEPS_JS);
    let lines: Vec<&str> = deps.lines().filter(|l| l.starts_with("goog.addDependency")).collect();
    assert_eq!(
        lines,
        vec![
            "goog.addDependency('../../../../development/js_dev/app/model.js', ['app.Model'], [], {});",
            "goog.addDependency('../../../../development/js_dev/app/view.js', ['app.View'], ['app.Model'], {});",
            "goog.addDependency('../../../../development/js_dev/main.js', ['main'], ['goog.dom'], {});",
        ]
    );

    let status = project.run_ok(&["--json", "status"]);
    let doc: serde_json::Value = serde_json::from_str(stdout(&status).trim()).unwrap();
    assert_eq!(doc["stage"], "deps_ready");
}

#[test]
fn test_ready_is_deterministic() {
    let project = TestProject::tools_ready();
    for i in 0..12 {
        let requires = if i > 0 {
            format!("goog.require('mod.m{}');\n", i - 1)
        } else {
            String::new()
        };
        project.create_file(
            &format!("development/js_dev/m{i:02}.js"),
            &format!("goog.provide('mod.m{i}');\n{requires}"),
        );
    }

    project.run_ok(&["ready"]);
    let first = project.read_file(DEPS_JS);
    project.run_ok(&["ready"]);

    assert_eq!(project.read_file(DEPS_JS), first);
}

#[test]
fn test_build_requires_manifest_and_changes_nothing() {
    let project = TestProject::new();
    project.run_ok(&["init"]);
    let before = project.snapshot();

    let output = project.run(&["build"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("'build'"), "unexpected stderr: {err}");
    assert!(err.contains("dependencies ready"), "unexpected stderr: {err}");
    assert!(err.contains("initialized"), "unexpected stderr: {err}");
    assert_eq!(project.snapshot(), before);
}

#[cfg(unix)]
#[test]
fn test_production_build() {
    let project = TestProject::tools_ready();
    project.install_fake_compiler();
    project.run_ok(&["ready"]);

    project.run_ok(&["build"]);

    let bundle = project.read_file("production/js/script.min.js");
    assert!(bundle.starts_with("var goog = goog || {};\ngoog.provide('main');"));
    let page = project.read_file("production/index.html");
    assert!(page.contains("<script src=\"js/script.min.js\"></script>"));
    assert!(!page.contains("deps.js"));
    assert!(!project.file_exists("production/js_dev"));
    assert!(!project.file_exists("debug"));

    let log = project.read_file("compiler.log");
    assert!(log.contains("goog.DEBUG=false"));
    assert!(log.contains("ADVANCED_OPTIMIZATIONS"));
}

#[cfg(unix)]
#[test]
fn test_debug_build_layout() {
    let project = TestProject::tools_ready();
    project.install_fake_compiler();
    project.run_ok(&["ready"]);

    project.run_ok(&["build", "--debug"]);

    assert!(project.file_exists("production/js/script.min.js"));
    assert!(!project.file_exists("production/js/script.min.js.map"));
    assert!(!project.file_exists("production/debug"));

    assert!(project.file_exists("debug/js/script.min.js"));
    assert!(project.file_exists("debug/index.html"));
    let map: serde_json::Value =
        serde_json::from_str(&project.read_file("debug/js/script.min.js.map")).unwrap();
    assert_eq!(map["sourceRoot"], "../..");

    let log = project.read_file("compiler.log");
    assert!(log.contains("--create_source_map"));
    assert!(!log.contains("goog.DEBUG=false"));
}

#[cfg(unix)]
#[test]
fn test_debug_enabled_in_config() {
    let project = TestProject::tools_ready();
    let config = project.read_file("nskit.toml").replace("debug = false", "debug = true");
    project.create_file("nskit.toml", &config);
    project.install_fake_compiler();
    project.run_ok(&["ready"]);

    project.run_ok(&["build"]);

    assert!(project.file_exists("debug/js/script.min.js.map"));
}

#[cfg(unix)]
#[test]
fn test_compiler_failure_is_reported_verbatim() {
    let project = TestProject::tools_ready();
    project.install_failing_compiler("main.js:7: ERROR - missing semicolon");
    project.run_ok(&["ready"]);

    let output = project.run(&["build"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("compiler failed"), "unexpected stderr: {err}");
    assert!(err.contains("main.js:7: ERROR - missing semicolon"), "unexpected stderr: {err}");
    assert!(!project.file_exists("production"));
    assert!(!project.file_exists(".nskit/staging"));
}

#[test]
fn test_missing_compiler_is_reported() {
    let project = TestProject::tools_ready();
    project.append_file(
        "nskit.toml",
        "\n[tools]\ncompiler_command = [\"nskit-test-no-such-compiler\"]\n",
    );
    project.run_ok(&["ready"]);

    let output = project.run(&["build"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("nskit-test-no-such-compiler"));
}
