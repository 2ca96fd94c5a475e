use super::*;

// =============================================================================
// env_parse: unique env var names per test, since tests run in parallel.
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    assert_eq!(env_parse("__TEST_SC_MISSING_4411__", 42u16), Ok(42));
}

#[test]
fn env_parse_blank_returns_default() {
    let key = "__TEST_SC_BLANK_4412__";
    unsafe { std::env::set_var(key, "  ") };
    assert_eq!(env_parse(key, 7u16), Ok(7));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_trims_valid_value() {
    let key = "__TEST_SC_VALID_4413__";
    unsafe { std::env::set_var(key, " 8080 ") };
    assert_eq!(env_parse(key, 0u16), Ok(8080));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_invalid_is_error() {
    let key = "__TEST_SC_INVALID_4414__";
    unsafe { std::env::set_var(key, "eighty") };
    assert_eq!(
        env_parse(key, 0u16),
        Err(ConfigError::Invalid { var: key, value: "eighty".to_owned() })
    );
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_reads_ip_addresses() {
    let key = "__TEST_SC_HOST_4415__";
    unsafe { std::env::set_var(key, "127.0.0.1") };
    assert_eq!(env_parse(key, DEFAULT_HOST), Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn addr_joins_host_and_port() {
    let config = ServerConfig { host: DEFAULT_HOST, port: 3000, site_root: None };
    assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
}
