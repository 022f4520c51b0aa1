use env_log_layer::init::{init_with_config, InitError, LoggerConfig};

#[test]
fn second_install_is_rejected() {
    let config = LoggerConfig { silent: true, ..Default::default() };
    assert!(init_with_config(config.clone()).is_ok());

    match init_with_config(config) {
        Err(InitError::AlreadyInstalled(_)) => {}
        other => panic!("expected AlreadyInstalled, got {other:?}"),
    }

    // Logging through the installed silent logger must not panic.
    tracing::error!("dropped");
}
