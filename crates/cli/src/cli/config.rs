use br_domain::config::{Config, ConfigSeverity};
use br_node_sdk::AttributeCatalog;

/// Parse and validate the config, printing any issues.
///
/// Also builds the catalog, which is where custom encodings are checked.
/// Returns false when errors were found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    // The catalog re-runs validation; on a clean config it adds the
    // encoding-name check.
    let mut error_count = error_count;
    if error_count == 0 {
        if let Err(e) = AttributeCatalog::from_config(config) {
            println!("[ERROR] catalog: {e}");
            error_count += 1;
        }
    }

    if error_count == 0 && warning_count == 0 {
        println!("Config OK ({config_path})");
        return true;
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("failed to serialize config: {e}"))?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use br_domain::config::CustomAttributeConfig;

    #[test]
    fn default_config_validates() {
        assert!(validate(&Config::default(), "dombridge.toml"));
    }

    #[test]
    fn shared_code_fails_validation() {
        let mut config = Config::default();
        config.custom_attributes.push(CustomAttributeConfig {
            name: "Title".into(),
            code: 3,
            encoding: "pass_through".into(),
        });
        assert!(!validate(&config, "dombridge.toml"));
    }

    #[test]
    fn unknown_encoding_fails_validation() {
        let mut config = Config::default();
        config.custom_attributes.push(CustomAttributeConfig {
            name: "Tags".into(),
            code: 30,
            encoding: "csv".into(),
        });
        assert!(!validate(&config, "dombridge.toml"));
    }
}
