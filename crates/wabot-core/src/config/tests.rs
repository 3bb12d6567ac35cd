use super::*;
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.bot.version, "2.0.0");
    assert_eq!(cfg.bot.server_name, "Heroku");
    assert!(cfg.whatsapp.enabled);
    assert_eq!(cfg.whatsapp.reconnect_delay_secs, 5);
    assert_eq!(cfg.whatsapp.init_retry_secs, 10);
    assert_eq!(cfg.api.port, 3000);
    assert!(cfg.responder.builtin_tables);
    assert!((cfg.responder.fallback_rate - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_parse_empty_uses_defaults() {
    let cfg = parse("").unwrap();
    assert_eq!(cfg.api.host, "0.0.0.0");
    assert!(cfg.responder.commands.is_empty());
    assert!(cfg.responder.keywords.is_empty());
}

#[test]
fn test_parse_responder_tables() {
    let toml_str = r#"
        [responder]
        fallback_rate = 0.5

        [responder.commands]
        "!ping" = "pong"

        [[responder.keywords]]
        keywords = ["open", "hours"]
        response = "We are open 9 to 5."
    "#;
    let cfg = parse(toml_str).unwrap();
    assert_eq!(cfg.responder.commands.get("!ping").unwrap(), "pong");
    assert_eq!(cfg.responder.keywords.len(), 1);
    assert_eq!(cfg.responder.keywords[0].keywords, vec!["open", "hours"]);
    assert!((cfg.responder.fallback_rate - 0.5).abs() < f64::EPSILON);
    // Untouched fields keep their defaults.
    assert!(cfg.responder.fallback_message.contains("!help"));
}

#[test]
fn test_parse_rejects_bad_fallback_rate() {
    let err = parse("[responder]\nfallback_rate = 1.5\n").unwrap_err();
    assert!(err.to_string().contains("fallback_rate"));
}

#[test]
fn test_parse_rejects_empty_keyword_rule() {
    let toml_str = r#"
        [[responder.keywords]]
        keywords = ["", "  "]
        response = "never"
    "#;
    assert!(parse(toml_str).is_err());
}

#[test]
fn test_parse_rejects_empty_command_key() {
    let toml_str = r#"
        [responder.commands]
        " " = "blank"
    "#;
    assert!(parse(toml_str).is_err());
}

#[test]
fn test_parse_invalid_toml() {
    let err = parse("[bot\nname = ").unwrap_err();
    assert!(matches!(err, BotError::Config(_)));
}

#[test]
fn test_apply_env_overrides() {
    let mut cfg = Config::default();
    apply_env(
        &mut cfg,
        env(&[
            ("PORT", "8080"),
            ("ADMIN_NUMBER", " 5511999887766 "),
            ("HEROKU_APP_NAME", "my-bot"),
        ]),
    )
    .unwrap();
    assert_eq!(cfg.api.port, 8080);
    assert_eq!(cfg.whatsapp.admin_number, "5511999887766");
    assert_eq!(cfg.bot.server_name, "my-bot");
}

#[test]
fn test_apply_env_server_name_wins_over_heroku() {
    let mut cfg = Config::default();
    apply_env(
        &mut cfg,
        env(&[("SERVER_NAME", "vps-1"), ("HEROKU_APP_NAME", "my-bot")]),
    )
    .unwrap();
    assert_eq!(cfg.bot.server_name, "vps-1");
}

#[test]
fn test_apply_env_rejects_bad_port() {
    let mut cfg = Config::default();
    let err = apply_env(&mut cfg, env(&[("PORT", "http")])).unwrap_err();
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.bot.name, "WhatsApp Bot");
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[bot]\nname = \"Shop Bot\"\n\n[whatsapp]\nallowed_users = [\"5511999887766\"]\n",
    )
    .unwrap();
    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.bot.name, "Shop Bot");
    assert_eq!(cfg.whatsapp.allowed_users, vec!["5511999887766"]);
}

#[test]
fn test_shellexpand_leaves_plain_paths() {
    assert_eq!(shellexpand("/var/lib/wabot"), "/var/lib/wabot");
    assert_eq!(shellexpand("relative/dir"), "relative/dir");
}

#[test]
fn test_example_config_parses() {
    let cfg = parse(include_str!("../../../../config.example.toml")).unwrap();
    assert_eq!(cfg.bot.name, "WhatsApp Bot");
    assert_eq!(cfg.api.port, 3000);
    assert!(cfg.responder.builtin_tables);
    assert!(cfg.responder.commands.is_empty());
    assert!(cfg.responder.keywords.is_empty());
}
