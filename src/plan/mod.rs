//! Aggregation planner.
//!
//! Turns a configuration and a data tree into the identifiers each source has
//! to prepare and the injections to perform, grouped by the object they write
//! into.

use crate::error::Result;
use crate::options::{AggregationConfig, InjectionMode, PathOption, Transform};
use crate::path::{resolve, ConcretePath, PathDescriptor, PathPattern};
use crate::source::Identifier;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;


/// One identifier occurrence and what to do with it
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// `None` for a null identifier: nothing is fetched, null semantics apply
    pub identifier: Option<Identifier>,
    pub source_name: String,
    /// Object the entity is written into (identifier path minus its last segment)
    pub target_path: ConcretePath,
    pub id_field_path: ConcretePath,
    pub remove_id_key: bool,
    pub transform: Option<Transform>,
    pub mode: InjectionMode,
    /// Copied from the descriptor; such entries are never executed
    pub parent_absent: bool,
}

/// Output of [`plan`]
#[derive(Debug, Default)]
pub struct InjectionPlan {
    /// Deduplicated identifiers per source, in first-seen order
    pub ids_by_source: IndexMap<String, IndexSet<Identifier>>,
    /// Entries per target path, in planning order
    pub entries: IndexMap<ConcretePath, Vec<PlanEntry>>,
}

impl InjectionPlan {
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Build the injection plan for `tree`.
///
/// Patterns are visited shallowest first so that an entry writing into an
/// ancestor runs before entries below it.
pub fn plan(tree: &Value, config: &AggregationConfig) -> Result<InjectionPlan> {
    let mut patterns = config
        .iter()
        .map(|(raw, option)| Ok((PathPattern::parse(raw)?, option)))
        .collect::<Result<Vec<_>>>()?;
    patterns.sort_by_key(|(pattern, _)| pattern.segment_count());

    let mut plan = InjectionPlan::default();
    for (pattern, option) in patterns {
        let descriptors = resolve(tree, &pattern);
        tracing::debug!(
            "Pattern '{}' matched {} location(s) for source '{}'",
            pattern,
            descriptors.len(),
            option.source
        );

        for descriptor in descriptors {
            add_descriptor(&mut plan, descriptor, option);
        }
    }

    Ok(plan)
}

fn add_descriptor(
    plan: &mut InjectionPlan,
    descriptor: PathDescriptor,
    option: &PathOption,
) {
    // Containers cannot be keys; such entries follow the null rules.
    let identifier = match &descriptor.identifier {
        None | Some(Value::Null) => None,
        Some(value) => {
            let identifier = Identifier::from_value(value);
            if identifier.is_none() {
                tracing::warn!(
                    "Identifier at '{}' is not a scalar, treating it as null",
                    descriptor.concrete_path
                );
            }
            identifier
        }
    };

    if let Some(id) = &identifier {
        plan.ids_by_source
            .entry(option.source.clone())
            .or_default()
            .insert(id.clone());
    }

    let target_path = descriptor.concrete_path.parent().unwrap_or_default();
    plan.entries
        .entry(target_path.clone())
        .or_default()
        .push(PlanEntry {
            identifier,
            source_name: option.source.clone(),
            target_path,
            id_field_path: descriptor.concrete_path,
            remove_id_key: option.remove_id_key,
            transform: option.transform.clone(),
            mode: option.mode(),
            parent_absent: descriptor.parent_absent,
        });
}
