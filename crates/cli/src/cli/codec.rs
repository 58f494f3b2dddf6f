use anyhow::Context;
use serde::Serialize;

use br_domain::config::Config;
use br_node_sdk::{AttributeCatalog, AttributeCode, AttributeName, AttributeValue, Encoding, ProtocolMessage, Rect};
use br_protocol::RECT_ARITY;

/// Encode command-line tokens for `attribute` and print the data field.
pub fn encode(config: &Config, attribute: &str, values: &[String]) -> anyhow::Result<()> {
    let catalog = AttributeCatalog::from_config(config)?;
    let name = AttributeName::from(attribute);
    let encoding = catalog
        .encoding(&name)
        .with_context(|| format!("no encoder registered for '{name}'"))?;

    let value = parse_value(encoding, values)?;
    println!("{}", catalog.encode(&name, &value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct DecodedUpdate {
    node_type: String,
    node_id: u64,
    code: AttributeCode,
    attribute: Option<AttributeName>,
    value: Option<AttributeValue>,
    raw: String,
}

/// Parse a full protocol message and print it as JSON.
pub fn decode(config: &Config, message: &str) -> anyhow::Result<()> {
    let catalog = AttributeCatalog::from_config(config)?;
    let decoded = decode_message(&catalog, message)?;
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

fn decode_message(catalog: &AttributeCatalog, message: &str) -> anyhow::Result<DecodedUpdate> {
    let parsed: ProtocolMessage = message.parse()?;
    let attribute = catalog.name_for(parsed.code()).cloned();

    // Unregistered codes still decode; only the typed value is lost.
    let value = match attribute.as_ref().and_then(|n| catalog.encoding(n)) {
        Some(encoding) => Some(encoding.decode(parsed.data())?),
        None => {
            tracing::warn!(code = %parsed.code(), "no attribute registered for code");
            None
        }
    };

    Ok(DecodedUpdate {
        node_type: parsed.node_type().to_string(),
        node_id: parsed.node_id(),
        code: parsed.code(),
        attribute,
        value,
        raw: parsed.data().to_string(),
    })
}

/// Turn CLI tokens into the value shape `encoding` expects.
fn parse_value(encoding: Encoding, values: &[String]) -> anyhow::Result<AttributeValue> {
    match encoding {
        Encoding::PassThrough => Ok(AttributeValue::Text(values.join(" "))),
        Encoding::BoolAsNumber => match values {
            [single] => parse_bool(single).map(AttributeValue::Bool),
            _ => anyhow::bail!("expected exactly one boolean, got {} values", values.len()),
        },
        Encoding::ListJoin => Ok(AttributeValue::List(values.to_vec())),
        Encoding::NestedListJoin => {
            let numbers = values
                .iter()
                .map(|v| {
                    v.parse::<f64>()
                        .with_context(|| format!("'{v}' is not a number"))
                })
                .collect::<anyhow::Result<Vec<f64>>>()?;
            if numbers.len() % RECT_ARITY != 0 {
                anyhow::bail!(
                    "rectangles take {RECT_ARITY} numbers each (top left bottom right), got {}",
                    numbers.len()
                );
            }
            Ok(AttributeValue::Rects(
                numbers
                    .chunks_exact(RECT_ARITY)
                    .map(|c| Rect::new(c[0], c[1], c[2], c[3]))
                    .collect(),
            ))
        }
    }
}

fn parse_bool(token: &str) -> anyhow::Result<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean"),
    }
}
