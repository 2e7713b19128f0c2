use std::time::Duration;

use remaining_time_engine::{ConfigError, PollSettings, PrinterConfig};

fn valid() -> PrinterConfig {
    PrinterConfig {
        server_name: "My printer name".to_string(),
        server_address: "192.168.1.99".to_string(),
        server_port: 80,
        api_key: "B508534ED20348F090B4D0AD637D3660".to_string(),
        wifi_ssid: "workshop".to_string(),
        wifi_password: "correct horse".to_string(),
        poll: PollSettings::default(),
    }
}

#[test]
fn valid_config_passes() {
    let config = valid();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.base_url(), "http://192.168.1.99:80");
}

#[test]
fn placeholder_credentials_are_rejected() {
    let mut config = valid();
    config.wifi_password = "MY_WIFI_PASSWORD".to_string();
    assert_eq!(
        config.validate(),
        Err(ConfigError::Placeholder {
            field: "wifi_password",
            value: "MY_WIFI_PASSWORD".to_string(),
        })
    );

    let mut config = valid();
    config.api_key = "API_KEY".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Placeholder { field: "api_key", .. })
    ));

    let mut config = valid();
    config.wifi_ssid = " MY_SSID ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Placeholder { field: "wifi_ssid", .. })
    ));
}

#[test]
fn empty_fields_are_rejected() {
    let mut config = valid();
    config.api_key = "   ".to_string();
    assert_eq!(config.validate(), Err(ConfigError::Missing("api_key")));
}

#[test]
fn address_must_be_ipv4_literal() {
    let mut config = valid();
    config.server_address = "octopi.local".to_string();
    assert_eq!(
        config.validate(),
        Err(ConfigError::InvalidAddress("octopi.local".to_string()))
    );
}

#[test]
fn port_zero_is_rejected() {
    let mut config = valid();
    config.server_port = 0;
    assert_eq!(config.validate(), Err(ConfigError::InvalidPort));
}

#[test]
fn zero_cadence_is_rejected() {
    let mut config = valid();
    config.poll.cadence_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPollSettings(_))
    ));
}

#[test]
fn poll_defaults() {
    let poll = PollSettings::default();
    assert_eq!(poll.cadence(), Duration::from_secs(3));
    assert_eq!(poll.request_timeout(), Duration::from_secs(5));
    assert_eq!(poll.max_backoff_multiplier, 8);
}

#[test]
fn errors_render_readably() {
    let err = ConfigError::Placeholder {
        field: "api_key",
        value: "API_KEY".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "config field `api_key` still holds the placeholder \"API_KEY\""
    );
}
