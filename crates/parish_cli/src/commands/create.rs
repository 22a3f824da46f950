//! Create command implementation.

use parish_core::{Entity, Kind, Store};
use serde_json::Value;

/// Runs the create command.
pub fn run(store: &Store, kind: &str, data: &str) -> Result<(), Box<dyn std::error::Error>> {
    let kind: Kind = kind.parse()?;

    let Value::Object(mut body) = serde_json::from_str(data)? else {
        return Err("--data must be a JSON object".into());
    };
    body.insert("type_tag".to_owned(), Value::String(kind.tag().to_owned()));

    let entity = Entity::from_map(body)?;
    entity.validate()?;

    let stored = store.add(entity)?;
    store.persist()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(stored.to_map()?))?
    );
    Ok(())
}
