//! # Conf Generator
//!
//! Expands a single configuration document annotated with *varying*
//! parameters into every concrete configuration the annotations describe.
//!
//! ## Overview
//!
//! Experiment sweeps are usually written as one document where some keys
//! list several possible values. This crate demangles such a document once
//! and then lazily yields, for every valid combination, the concrete
//! configuration plus a flat summary of what was chosen at each varying key.
//!
//! ## Marker Grammar
//!
//! - `$key: [a, b, c]` - unconditional choice, one configuration per element.
//! - `$key: {label: value, ...}` - choice tagged with context labels. Sites
//!   sharing label names are kept in step: `a` chosen for one site means `a`
//!   for every site that offers `a`.
//! - `$key: {a|b: value}` - one candidate valid for several labels.
//! - `$$key: ...` - nested choice. The chosen value may contain markers of
//!   its own, resolved by a later pass; only single-marker sites appear in
//!   the summary.
//!
//! ## Basic Usage
//!
//! ```rust
//! use conf_generator::{ConfGenerator, from_yaml_str};
//!
//! let document = from_yaml_str(r#"
//! $optimizer:
//!   sgd: {name: sgd, momentum: 0.9}
//!   adam: {name: adam}
//! $learning_rate:
//!   sgd: 0.1
//!   adam: 0.001
//! $batch_size: [32, 64]
//! "#)?;
//!
//! let generator = ConfGenerator::new(&document)?;
//! let mut count = 0;
//! for result in generator.generate() {
//!     let (config, summary) = result?;
//!     assert!(config.get("optimizer").is_some());
//!     assert!(summary.get("batch_size").is_some());
//!     count += 1;
//! }
//! // two synchronized optimizer/learning-rate pairs times two batch sizes
//! assert_eq!(count, 4);
//! # Ok::<(), conf_generator::Error>(())
//! ```
//!
//! ## Typed Results
//!
//! ```rust
//! use conf_generator::{ConfGenerator, from_json_str, from_value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Run {
//!     epochs: u32,
//! }
//!
//! let document = from_json_str(r#"{"$epochs": [10, 20]}"#)?;
//! let runs: Vec<Run> = ConfGenerator::new(&document)?
//!     .generate()
//!     .map(|result| -> Result<Run, conf_generator::Error> {
//!         let (config, _) = result?;
//!         from_value(config)
//!     })
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(runs.len(), 2);
//! # Ok::<(), conf_generator::Error>(())
//! ```
//!
//! ## Custom Marker
//!
//! ```rust
//! use conf_generator::{ConfGenerator, GeneratorConfig, from_json_str};
//!
//! let document = from_json_str(r#"{"~seed": [1, 2, 3]}"#)?;
//! let config = GeneratorConfig::new().with_marker("~");
//! let generator = ConfGenerator::with_config(&document, config)?;
//! assert_eq!(generator.generate().count(), 3);
//! # Ok::<(), conf_generator::Error>(())
//! ```
//!
//! ## Logging
//!
//! Diagnostics are emitted through [`tracing`]; install any subscriber to
//! see them.

pub mod context;
pub mod demangle;
pub mod deserializer;
pub mod error;
pub mod generator;
pub mod loader;
pub mod node;
pub mod product;
pub mod summary;
pub mod value;


// Re-export main types and functions
pub use generator::{ConfGenerator, DEFAULT_MARKER, Expansion, GeneratorConfig};
pub use summary::{Decisions, merge_decisions};
pub use value::{Value, ValueArray, ValueMap};

// Re-export error types
pub use error::{ConfigError, Error, SerdeError};

// Re-export the building blocks of an expansion
pub use context::{ContextCombinations, context_dimensions};
pub use demangle::{Demangler, degree, demangle, marker_depth};
pub use node::{Aggregate, AggregateKind, Alternatives, Candidate, Choices, ContextSet, ParamNode};

// Re-export loading and typed conversion
pub use deserializer::{ValueDeserializer, from_value};
pub use loader::{DocumentFormat, from_json_str, from_yaml_str, load_path};
