use super::*;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.bot.log_level, "info");
    assert_eq!(cfg.store.db_path, "~/.remindbot/data/tasks.db");
    assert!(cfg.scheduler.enabled);
    assert_eq!(cfg.scheduler.poll_interval_secs, 10);
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_parse_full_config() {
    let cfg = from_toml(
        r#"
        [bot]
        log_level = "debug"

        [channel.telegram]
        enabled = true
        bot_token = "123:abc"

        [store]
        db_path = "/tmp/tasks.db"

        [scheduler]
        poll_interval_secs = 5
        "#,
    )
    .unwrap();
    assert_eq!(cfg.bot.log_level, "debug");
    assert_eq!(cfg.bot.name, "remindbot");
    let tg = cfg.channel.telegram.unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "123:abc");
    assert_eq!(cfg.store.db_path, "/tmp/tasks.db");
    assert_eq!(cfg.scheduler.poll_interval_secs, 5);
    assert!(cfg.scheduler.enabled, "enabled should default to true");
}

#[test]
fn test_parse_empty_config_uses_defaults() {
    let cfg = from_toml("").unwrap();
    assert_eq!(cfg.scheduler.poll_interval_secs, 10);
    assert_eq!(cfg.bot.data_dir, "~/.remindbot");
}

#[test]
fn test_parse_invalid_config() {
    let err = from_toml("[scheduler]\npoll_interval_secs = \"soon\"").unwrap_err();
    assert!(matches!(err, RemindError::Config(_)));
}

#[test]
fn test_load_missing_file_falls_back_to_defaults() {
    let cfg = load("/nonexistent/__remindbot_config__.toml").unwrap();
    assert_eq!(cfg.scheduler.poll_interval_secs, 10);
}

#[test]
fn test_token_env_fills_empty_token() {
    let mut cfg = from_toml("[channel.telegram]\nenabled = true\n").unwrap();
    apply_token_env(&mut cfg, Some("env-token".to_string()));
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "env-token");
}

#[test]
fn test_token_env_does_not_override_configured_token() {
    let mut cfg = from_toml("[channel.telegram]\nenabled = true\nbot_token = \"file\"\n").unwrap();
    apply_token_env(&mut cfg, Some("env-token".to_string()));
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "file");
}

#[test]
fn test_token_env_enables_unconfigured_telegram() {
    let mut cfg = Config::default();
    apply_token_env(&mut cfg, Some("env-token".to_string()));
    let tg = cfg.channel.telegram.unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "env-token");

    let mut cfg = Config::default();
    apply_token_env(&mut cfg, Some("   ".to_string()));
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_shellexpand() {
    assert_eq!(shellexpand("/abs/path"), "/abs/path");
    if let Some(home) = std::env::var_os("HOME") {
        assert_eq!(
            shellexpand("~/x.db"),
            format!("{}/x.db", home.to_string_lossy())
        );
    }
}
