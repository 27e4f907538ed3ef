//! Replace identifier fields in JSON trees with the entities they reference.
//!
//! An [`AggregationConfig`] maps dotted path patterns (`tasks.*.assigneeId`)
//! to a named [`EntitySource`]. [`Aggregator::aggregate`] finds every
//! identifier the patterns reach, prepares each source once with the
//! deduplicated identifiers, then writes the resolved entities back into the
//! tree, either merged into the identifier's parent object or under a new key.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod inject;
pub mod logging;
pub mod options;
pub mod path;
pub mod plan;
pub mod prepare;
pub mod source;

pub use aggregator::Aggregator;
pub use config::{LoggingConfig, Settings};
pub use error::{AggregateError, ConfigError, Result, SourceError};
pub use options::{AggregationConfig, InjectionMode, PathOption, ToKey, Transform};
pub use path::{ConcretePath, PathDescriptor, PathPattern, Segment};
pub use source::{
    CachedSource, EntitySource, Identifier, IdentifierGetter, Loader, MemorySource,
    SourceRegistry,
};
