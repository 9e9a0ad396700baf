use rounds_config::AppConfig;

// 串联在单个测试中执行，避免并行用例争用进程级环境变量。
#[test]
fn config_reads_env_with_defaults() {
    unsafe {
        std::env::remove_var("ROUNDS_DATA_DIR");
        std::env::remove_var("ROUNDS_ALLOW_ADHOC_POINTS");
        std::env::remove_var("ROUNDS_REVIEW");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.data_dir, None);
    assert!(!config.allow_adhoc_points);
    assert!(config.review_enabled);

    unsafe {
        std::env::set_var("ROUNDS_DATA_DIR", "/tmp/rounds-data");
        std::env::set_var("ROUNDS_ALLOW_ADHOC_POINTS", "true");
        std::env::set_var("ROUNDS_REVIEW", "off");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.data_dir.as_deref(), Some("/tmp/rounds-data"));
    assert!(config.allow_adhoc_points);
    assert!(!config.review_enabled);

    unsafe {
        std::env::remove_var("ROUNDS_DATA_DIR");
        std::env::remove_var("ROUNDS_ALLOW_ADHOC_POINTS");
        std::env::remove_var("ROUNDS_REVIEW");
    }
}
