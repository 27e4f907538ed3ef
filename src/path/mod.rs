//! Path patterns and the descriptor resolver.
//!
//! A pattern such as `tasks.*.assigneeId` is walked against a data tree and
//! produces one [`PathDescriptor`] per concrete location it reaches, e.g.
//! `tasks.0.assigneeId` and `tasks.1.assigneeId`.

use crate::error::{AggregateError, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;


/// Segment that iterates every element of the array at its position
pub const WILDCARD: &str = "*";

const ROOT_WILDCARD_PREFIX: &str = "*.";

/// One step of a concrete path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Location of a single node in a data tree; wildcards replaced by indices.
///
/// The root is the empty path and renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConcretePath(Vec<Segment>);

impl ConcretePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Path extended by one segment
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Path with its final segment dropped; `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Borrow the node at this path, if every step exists
    pub fn lookup<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(tree, |node, segment| match segment {
            Segment::Key(key) => node.as_object()?.get(key),
            Segment::Index(index) => node.as_array()?.get(*index),
        })
    }

    /// Mutably borrow the node at this path, if every step exists
    pub fn lookup_mut<'a>(&self, tree: &'a mut Value) -> Option<&'a mut Value> {
        self.0.iter().try_fold(tree, |node, segment| match segment {
            Segment::Key(key) => node.as_object_mut()?.get_mut(key),
            Segment::Index(index) => node.as_array_mut()?.get_mut(*index),
        })
    }
}

impl fmt::Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for ConcretePath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

/// A validated dotted pattern, with any leading `*.` already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<String>,
}

impl PathPattern {
    /// Parse a dotted pattern.
    ///
    /// A leading `*.` only documents that the root is an array; the resolver
    /// iterates a root array regardless, so it is dropped here.
    pub fn parse(raw: &str) -> Result<Self> {
        let body = raw.strip_prefix(ROOT_WILDCARD_PREFIX).unwrap_or(raw);
        if body.is_empty() {
            return Err(AggregateError::invalid_pattern(raw, "pattern is empty"));
        }

        let segments: Vec<String> = body.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(AggregateError::invalid_pattern(raw, "pattern has an empty segment"));
        }
        if segments.last().map(String::as_str) == Some(WILDCARD) {
            return Err(AggregateError::invalid_pattern(
                raw,
                "pattern must end with a field name",
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Depth used to order patterns, shallowest first
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl FromStr for PathPattern {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One concrete location a pattern resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescriptor {
    pub concrete_path: ConcretePath,
    /// Value found at the location; `None` when `parent_absent` is set
    pub identifier: Option<Value>,
    /// The slot that would hold the identifier does not exist: its container
    /// is missing, null or not an object, or the container lacks the field.
    pub parent_absent: bool,
}

/// Resolve `pattern` against `tree`, returning every location it reaches.
///
/// Missing containers never fail; they produce a descriptor flagged
/// `parent_absent` instead.
pub fn resolve(tree: &Value, pattern: &PathPattern) -> Vec<PathDescriptor> {
    let mut descriptors = Vec::new();
    resolve_into(
        Some(tree),
        pattern.segments(),
        ConcretePath::root(),
        &mut descriptors,
    );
    tracing::trace!(
        "Resolved pattern '{}' to {} location(s)",
        pattern,
        descriptors.len()
    );
    descriptors
}

fn resolve_into(
    node: Option<&Value>,
    segments: &[String],
    path: ConcretePath,
    out: &mut Vec<PathDescriptor>,
) {
    // Arrays are iterated before the segment is looked at; the matching `*`
    // is consumed below without adding anything to the path.
    if let Some(Value::Array(items)) = node {
        for (index, item) in items.iter().enumerate() {
            resolve_into(Some(item), segments, path.child(Segment::Index(index)), out);
        }
        return;
    }

    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if head == WILDCARD {
        resolve_into(node, rest, path, out);
        return;
    }

    let path = path.child(Segment::Key(head.clone()));
    let value = match node {
        Some(Value::Object(map)) => map.get(head),
        _ => None,
    };

    if rest.is_empty() {
        out.push(PathDescriptor {
            concrete_path: path,
            identifier: value.cloned(),
            parent_absent: value.is_none(),
        });
    } else {
        resolve_into(value, rest, path, out);
    }
}
