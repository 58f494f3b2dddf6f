use br_domain::config::Config;
use br_node_sdk::AttributeCatalog;

pub fn run(config: &Config) -> anyhow::Result<()> {
    let catalog = AttributeCatalog::from_config(config)?;
    for line in render(&catalog) {
        println!("{line}");
    }
    Ok(())
}

fn render(catalog: &AttributeCatalog) -> Vec<String> {
    let mut lines = vec![format!("{:<6} {:<20} {}", "CODE", "ATTRIBUTE", "ENCODING")];
    for entry in catalog.entries() {
        let code = entry
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into());
        let encoding = entry
            .encoding
            .map(|e| e.to_string())
            .unwrap_or_else(|| "(none)".into());
        lines.push(format!("{code:<6} {:<20} {encoding}", entry.name.as_str()));
    }
    lines
}
