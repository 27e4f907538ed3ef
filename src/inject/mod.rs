//! Injection engine: writes resolved entities back into the tree.

use crate::error::{AggregateError, Result};
use crate::options::InjectionMode;
use crate::path::{ConcretePath, Segment};
use crate::plan::PlanEntry;
use crate::source::SourceRegistry;
use indexmap::IndexMap;
use serde_json::Value;

mod merge;


pub use merge::merge_object;

/// Execute every plan entry against `tree`, in plan order.
///
/// Fetches are awaited one at a time. Sources must already be prepared.
pub async fn inject_all(
    tree: &mut Value,
    entries: IndexMap<ConcretePath, Vec<PlanEntry>>,
    sources: &SourceRegistry,
) -> Result<()> {
    for (target_path, entries) in entries {
        for entry in entries {
            inject_entry(tree, &target_path, entry, sources).await?;
        }
    }
    Ok(())
}

async fn inject_entry(
    tree: &mut Value,
    target_path: &ConcretePath,
    entry: PlanEntry,
    sources: &SourceRegistry,
) -> Result<()> {
    if entry.parent_absent {
        tracing::trace!("Skipping '{}': identifier slot is absent", entry.id_field_path);
        return Ok(());
    }

    let entity = fetch_entity(&entry, sources).await?;
    let entity = match (entity, &entry.transform) {
        (Some(entity), Some(transform)) => {
            Some(transform.apply(entity).map_err(|error| AggregateError::Transform {
                path: entry.id_field_path.to_string(),
                error,
            })?)
        }
        (entity, _) => entity,
    };
    let entity = entity.filter(|value| !value.is_null());

    // An earlier entry may have replaced an ancestor of this target.
    let Some(Value::Object(container)) = target_path.lookup_mut(tree) else {
        tracing::debug!(
            "Skipping '{}': target '{}' is no longer an object",
            entry.id_field_path,
            target_path
        );
        return Ok(());
    };

    match entry.mode {
        InjectionMode::Merge => match entity {
            Some(Value::Object(fields)) => merge_object(container, fields),
            Some(other) => tracing::warn!(
                "Cannot merge non-object entity into '{}' (got {})",
                target_path,
                json_kind(&other)
            ),
            None => {}
        },
        InjectionMode::ToKey { key, omit_null } => match entity {
            Some(value) => {
                container.insert(key, value);
            }
            None if omit_null => {
                container.remove(&key);
            }
            None => {
                container.insert(key, Value::Null);
            }
        },
    }

    if entry.remove_id_key {
        if let Some(Segment::Key(id_key)) = entry.id_field_path.last() {
            container.remove(id_key);
        }
    }

    Ok(())
}

async fn fetch_entity(entry: &PlanEntry, sources: &SourceRegistry) -> Result<Option<Value>> {
    let Some(id) = &entry.identifier else {
        return Ok(None);
    };

    let source = sources
        .get(&entry.source_name)
        .ok_or_else(|| AggregateError::unknown_source(entry.source_name.as_str()))?;

    source
        .get(id)
        .await
        .map_err(|error| AggregateError::Fetch {
            source_name: entry.source_name.clone(),
            identifier: id.to_string(),
            error,
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
