use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_cover_every_section() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.database.max_connections.get(), DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(settings.auth.token_ttl, Duration::from_secs(60 * 60));
    assert!(settings.auth.jwt_secret().is_err());
    assert_eq!(
        settings.uploads.max_request_bytes.get(),
        DEFAULT_UPLOAD_REQUEST_LIMIT_BYTES
    );
    assert_eq!(settings.upstream.timeout, Duration::from_secs(10));
    assert_eq!(settings.upstream.cache_ttl, Duration::from_secs(3600));
    assert_eq!(
        settings.letterboxd.feed_url.as_str(),
        DEFAULT_LETTERBOXD_FEED_URL
    );
    assert_eq!(settings.rawg.base_url.as_str(), DEFAULT_RAWG_BASE_URL);
    assert!(settings.rawg.api_key.is_none());
    assert_eq!(settings.cors.allowed_origins, DEFAULT_CORS_ORIGINS);
}

#[test]
fn uploads_limit_can_be_overridden_via_cli() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        uploads_max_request_bytes: Some(1_572_864),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.uploads.max_request_bytes.get(), 1_572_864);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn short_jwt_secret_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("short".into());

    let err = Settings::from_raw(raw).expect_err("secret too short");
    assert!(matches!(err, LoadError::Invalid { key: "auth.jwt_secret", .. }));
}

#[test]
fn jwt_secret_is_trimmed_and_redacted() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("  0123456789abcdef0123  ".into());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.auth.jwt_secret().expect("secret"),
        "0123456789abcdef0123"
    );
    assert!(!format!("{:?}", settings.auth).contains("0123456789"));
}

#[test]
fn zero_token_ttl_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.token_ttl_minutes = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero ttl");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "auth.token_ttl_minutes",
            ..
        }
    ));
}

#[test]
fn upstream_timeout_must_be_positive() {
    let mut raw = RawSettings::default();
    raw.upstream.timeout_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero timeout");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "upstream.timeout_seconds",
            ..
        }
    ));
}

#[test]
fn feed_url_must_be_http() {
    let mut raw = RawSettings::default();
    raw.letterboxd.feed_url = Some("ftp://letterboxd.com/feed".into());

    let err = Settings::from_raw(raw).expect_err("bad scheme");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "letterboxd.feed_url",
            ..
        }
    ));
}

#[test]
fn blank_rawg_key_counts_as_missing() {
    let mut raw = RawSettings::default();
    raw.rawg.api_key = Some("   ".into());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.rawg.api_key.is_none());
}

#[test]
fn cors_origins_are_normalized() {
    let mut raw = RawSettings::default();
    raw.cors.allowed_origins = Some(vec![
        " https://example.com/ ".into(),
        String::new(),
        "http://localhost:3000".into(),
    ]);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cors.allowed_origins,
        ["https://example.com", "http://localhost:3000"]
    );
}

#[test]
fn invalid_cors_origin_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cors.allowed_origins = Some(vec!["not a url".into()]);

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "cors.allowed_origins",
            ..
        })
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["folio"]);
    assert!(args.command.is_none());
}

#[test]
fn serve_command_parses_overrides() {
    let args = CliArgs::parse_from([
        "folio",
        "serve",
        "--server-port",
        "9100",
        "--letterboxd-feed-url",
        "https://letterboxd.com/someone/rss/",
    ]);

    let Some(Command::Serve(serve)) = args.command else {
        panic!("expected serve command");
    };
    assert_eq!(serve.overrides.server_port, Some(9100));
    assert_eq!(
        serve.overrides.letterboxd_feed_url.as_deref(),
        Some("https://letterboxd.com/someone/rss/")
    );
}

#[test]
fn create_admin_accepts_database_override() {
    let args = CliArgs::parse_from([
        "folio",
        "create-admin",
        "--username",
        "admin",
        "--password",
        "correct horse",
        "--database-url",
        "postgres://localhost/folio",
    ]);

    let Some(Command::CreateAdmin(create)) = args.command else {
        panic!("expected create-admin command");
    };
    assert_eq!(create.username, "admin");
    assert_eq!(create.password, "correct horse");

    let mut raw = RawSettings::default();
    raw.apply_database_override(&create.database);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://localhost/folio")
    );
}
