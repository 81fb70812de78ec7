use scopehint::Settings;
use std::env;
use tempfile::TempDir;

// Environment and current directory are process-wide, so everything that
// touches them lives in this one test.
#[test]
fn test_env_and_workspace_layering() {
    let temp_dir = TempDir::new().unwrap();
    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(&temp_dir).unwrap();

    let config_dir = temp_dir.path().join(".scopehint");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("settings.toml"),
        "[analysis]\nmax_retries = 5\n\n[worker]\npending_capacity = 3\n",
    )
    .unwrap();

    unsafe {
        // Double underscore separates nested levels
        env::set_var("SCOPEHINT_ANALYSIS__MAX_RETRIES", "9");
        env::set_var("SCOPEHINT_LOGGING__DEFAULT", "debug");
    }

    let settings = Settings::load();

    unsafe {
        env::remove_var("SCOPEHINT_ANALYSIS__MAX_RETRIES");
        env::remove_var("SCOPEHINT_LOGGING__DEFAULT");
    }
    env::set_current_dir(original_dir).unwrap();

    let settings = settings.unwrap();
    assert_eq!(settings.analysis.max_retries, 9, "env overrides the file");
    assert_eq!(settings.worker.pending_capacity, 3, "file overrides defaults");
    assert_eq!(settings.logging.default, "debug");
    assert!(settings.analysis.tolerant);
    assert!(settings.workspace_root.is_some());
}
