use super::*;


fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_run() {
    match parse(&["vidfetch", "run", "jobs.toml"]).command {
        CliCommand::Run { manifest } => assert_eq!(manifest, PathBuf::from("jobs.toml")),
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_direct_many_urls() {
    match parse(&["vidfetch", "direct", "https://a/x/1.mp4", "https://a/x/2.mp4"]).command {
        CliCommand::Direct { urls } => assert_eq!(urls.len(), 2),
        _ => panic!("expected Direct"),
    }
}

#[test]
fn cli_parse_direct_requires_url() {
    assert!(Cli::try_parse_from(["vidfetch", "direct"]).is_err());
}

#[test]
fn cli_parse_hls() {
    let cli = parse(&[
        "vidfetch",
        "hls",
        "https://a/master.m3u8",
        "--title",
        "My Show",
        "--language",
        "sub_ita",
        "--episode",
        "12",
    ]);
    match cli.command {
        CliCommand::Hls {
            url,
            title,
            language,
            episode,
        } => {
            assert_eq!(url, "https://a/master.m3u8");
            assert_eq!(title, "My Show");
            assert_eq!(language, Language::SubIta);
            assert_eq!(episode, 12);
        }
        _ => panic!("expected Hls"),
    }
}

#[test]
fn cli_parse_hls_defaults_episode_and_rejects_bad_language() {
    let cli = parse(&["vidfetch", "hls", "u", "--title", "T", "--language", "ITA"]);
    match cli.command {
        CliCommand::Hls { episode, .. } => assert_eq!(episode, 1),
        _ => panic!("expected Hls"),
    }
    assert!(Cli::try_parse_from(["vidfetch", "hls", "u", "--title", "T", "--language", "FR"]).is_err());
    assert!(Cli::try_parse_from(["vidfetch", "hls", "u", "--language", "ITA"]).is_err());
}

#[test]
fn cli_parse_global_flags_after_subcommand() {
    let cli = parse(&[
        "vidfetch",
        "direct",
        "https://a/x/1.mp4",
        "--batch-size",
        "5",
        "--speed-mbps",
        "20",
        "-o",
        "/srv/media",
        "--muxer",
        "/opt/ffmpeg",
    ]);
    let o = &cli.overrides;
    assert_eq!(o.batch_size, Some(5));
    assert_eq!(o.speed_mbps, Some(20.0));
    assert_eq!(o.output, Some(PathBuf::from("/srv/media")));
    assert_eq!(o.muxer, Some(PathBuf::from("/opt/ffmpeg")));
}

#[test]
fn cli_speed_flags_conflict() {
    assert!(Cli::try_parse_from([
        "vidfetch",
        "--speed-mbps",
        "8",
        "--max-bytes-per-sec",
        "1000",
        "direct",
        "https://a/x/1.mp4",
    ])
    .is_err());
}

#[test]
fn overrides_apply_to_config() {
    let mut cfg = EngineConfig::default();
    let overrides = ConfigOverrides {
        batch_size: Some(4),
        speed_mbps: Some(8.0),
        output: Some(PathBuf::from("out")),
        muxer: Some(PathBuf::from("/usr/local/bin/ffmpeg")),
        ..ConfigOverrides::default()
    };
    overrides.apply(&mut cfg);
    assert_eq!(cfg.batch_size, 4);
    assert_eq!(cfg.max_bytes_per_sec, Some(1_000_000));
    assert_eq!(cfg.output_root, PathBuf::from("out"));
    assert_eq!(cfg.muxer_path, Some(PathBuf::from("/usr/local/bin/ffmpeg")));
}

#[test]
fn zero_speed_means_unlimited() {
    let mut cfg = EngineConfig {
        max_bytes_per_sec: Some(500),
        ..EngineConfig::default()
    };
    ConfigOverrides {
        max_bytes_per_sec: Some(0),
        ..ConfigOverrides::default()
    }
    .apply(&mut cfg);
    assert_eq!(cfg.max_bytes_per_sec, None);
    assert_eq!(cfg.total_rate(), 0);
}

#[test]
fn no_overrides_keep_config() {
    let mut cfg = EngineConfig {
        batch_size: 7,
        max_bytes_per_sec: Some(123),
        ..EngineConfig::default()
    };
    ConfigOverrides::default().apply(&mut cfg);
    assert_eq!(cfg.batch_size, 7);
    assert_eq!(cfg.max_bytes_per_sec, Some(123));
}
