use std::{error::Error, path::Path};

use crate::config::{Config, LoadError, DEFAULT_POLL_RATE_MS, DEFAULT_VIRTUAL_DEVICE_NAME};

const CONFIG_FILE: &str = "./rootfs/usr/share/shanwan/config.yaml";

/// The shipped config file must parse and match the built-in defaults
#[tokio::test]
async fn check_shipped_config() -> Result<(), Box<dyn Error>> {
    let config = Config::from_yaml_file(CONFIG_FILE)?;
    assert_eq!(config, Config::default());

    let config = Config::load(Some(Path::new(CONFIG_FILE)))?;
    assert_eq!(config.version, 1);

    Ok(())
}

#[tokio::test]
async fn test_partial_config_uses_defaults() -> Result<(), Box<dyn Error>> {
    let config = Config::from_yaml("rumble: false\npoll_rate_ms: 4\n".to_string())?;

    assert!(!config.rumble);
    assert_eq!(config.poll_rate_ms, 4);
    assert_eq!(config.device_path, None);
    assert_eq!(config.virtual_device_name, DEFAULT_VIRTUAL_DEVICE_NAME);

    let config = Config::from_yaml("device_path: /dev/hidraw3\n".to_string())?;
    assert_eq!(config.device_path.as_deref(), Some("/dev/hidraw3"));
    assert!(config.rumble);
    assert_eq!(config.poll_rate_ms, DEFAULT_POLL_RATE_MS);

    Ok(())
}

#[tokio::test]
async fn test_invalid_config() -> Result<(), Box<dyn Error>> {
    let result = Config::from_yaml("rumble: [1, 2]\n".to_string());
    assert!(matches!(result, Err(LoadError::DeserializeError(_))));

    let result = Config::from_yaml_file("./does/not/exist.yaml");
    assert!(matches!(result, Err(LoadError::IoError(_))));

    Ok(())
}
