use crate::AtatWorld;
use cucumber::{given, then, when};

/// Unreachable API endpoint, so any accidental network call fails fast instead of hitting GitHub.
const OFFLINE_API_URL: &str = "http://127.0.0.1:9";

#[given(regex = r#"^the config file content is '(.*)'$"#)]
async fn given_config_file_content(world: &mut AtatWorld, content: String) {
    let config_path = world.project_path().join(".atat").join("config.json");
    if let Some(parent_dir) = config_path.parent() {
        std::fs::create_dir_all(parent_dir)
            .unwrap_or_else(|e| panic!("Failed to create config dir {:?}: {}", parent_dir, e));
    }
    std::fs::write(&config_path, content)
        .unwrap_or_else(|e| panic!("Failed to write config file {:?}: {}", config_path, e));
}

#[given("an empty config file")]
async fn given_empty_config_file(world: &mut AtatWorld) {
    let config_path = world.project_path().join(".atat").join("config.json");
    let _ = std::fs::remove_file(&config_path);
}

#[given("TODO.md contains:")]
async fn given_todo_content(world: &mut AtatWorld, step: &cucumber::gherkin::Step) {
    let content = step
        .docstring
        .as_ref()
        .map(|doc| doc.trim_start_matches('\n').to_string())
        .expect("TODO.md content docstring required");
    std::fs::write(world.project_path().join("TODO.md"), &content)
        .expect("Failed to write TODO.md");
    world.original_todo_content = content;
}

#[given("there is no TODO.md")]
async fn given_no_todo(world: &mut AtatWorld) {
    let _ = std::fs::remove_file(world.project_path().join("TODO.md"));
}

#[when(regex = r#"^I run `gh atat ?([^`]*)`$"#)]
async fn when_run_gh_atat(world: &mut AtatWorld, arguments: String) {
    let project_path = world.project_path();
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_gh-atat"))
        .args(arguments.split_whitespace())
        .current_dir(&project_path)
        .env_remove("ATAT_LOG")
        .env("ATAT_API_URL", OFFLINE_API_URL)
        .env("GH_TOKEN", "offline-test-token")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute gh-atat in {:?}: {}", project_path, e));
    world.captured_output = [output.stdout, output.stderr].concat();
    world.command_status = Some(output.status);
}

#[then(regex = r#"^the output should be "(.*)"$"#)]
async fn then_output_should_be(world: &mut AtatWorld, expected_output: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert_eq!(
        output.trim_end(),
        expected_output,
        "Expected output '{}', but got:\n---\n{}\n---",
        expected_output,
        output.trim_end()
    );
    assert!(
        world.command_status.is_some_and(|s| s.success()),
        "Command failed with status: {:?}",
        world.command_status
    );
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_should_contain(world: &mut AtatWorld, expected: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert!(
        output.contains(&expected),
        "Expected output to contain '{}', but got:\n---\n{}\n---",
        expected,
        output
    );
    assert!(
        world.command_status.is_some_and(|s| s.success()),
        "Command failed with status: {:?}",
        world.command_status
    );
}

#[then(regex = r#"^the error should be "(.*)"$"#)]
async fn then_error_should_be(world: &mut AtatWorld, expected_output: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert_eq!(
        output.trim_end(),
        expected_output,
        "Expected output '{}', but got:\n---\n{}\n---",
        expected_output,
        output.trim_end()
    );
    assert_eq!(
        world.command_status.and_then(|s| s.code()),
        Some(1),
        "Command should have exited with status 1: {:?}",
        world.command_status
    );
}

#[then("the output should be empty")]
async fn then_output_should_be_empty(world: &mut AtatWorld) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert!(
        output.trim().is_empty(),
        "Expected output to be empty, but got:\n---\n{}\n---",
        output
    );
    assert!(
        world.command_status.is_some_and(|s| s.success()),
        "Command failed with status: {:?}",
        world.command_status
    );
}

#[then(regex = r#"^the config file should contain "([^"]*)"$"#)]
async fn then_config_file_should_contain(world: &mut AtatWorld, expected_repo: String) {
    let config_path = world.project_path().join(".atat").join("config.json");
    let content = std::fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read config file {:?}: {}", config_path, e));
    assert!(
        content.contains(&expected_repo),
        "Expected config file to contain '{}', but got:\n---\n{}\n---",
        expected_repo,
        content
    );
}

#[then(regex = r#"^the config file should not contain "([^"]*)"$"#)]
async fn then_config_file_should_not_contain(world: &mut AtatWorld, unexpected_repo: String) {
    let config_path = world.project_path().join(".atat").join("config.json");
    let content = std::fs::read_to_string(&config_path).unwrap_or_default();
    assert!(
        !content.contains(&unexpected_repo),
        "Expected config file not to contain '{}', but got:\n---\n{}\n---",
        unexpected_repo,
        content
    );
}

#[then("the config file should be empty")]
async fn then_config_file_should_be_empty(world: &mut AtatWorld) {
    let config_path = world.project_path().join(".atat").join("config.json");
    match std::fs::read_to_string(&config_path) {
        Ok(content) => assert_eq!(
            content.trim(),
            "{}",
            "Expected config file to be an empty object, but got:\n---\n{}\n---",
            content
        ),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => panic!("Failed to read config file {:?}: {}", config_path, e),
    }
}

#[then("TODO.md should be unchanged")]
async fn then_todo_unchanged(world: &mut AtatWorld) {
    let content = std::fs::read_to_string(world.project_path().join("TODO.md"))
        .expect("Failed to read TODO.md");
    assert_eq!(content, world.original_todo_content);
}
