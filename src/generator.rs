//! Expansion engine
//!
//! A [`ConfGenerator`] demangles a document once and then lazily enumerates
//! every concrete configuration it describes:
//!
//! 1. the context resolver yields each active context assignment;
//! 2. for that context every varying site is narrowed to its eligible
//!    candidates and the Cartesian product of their values is walked, one
//!    fresh configuration tree per combination;
//! 3. when markers are nested (degree above one) each produced tree still
//!    carries markers, so it is expanded again by a nested pass that
//!    inherits the active context, and the nested decisions are merged into
//!    the outer ones.

use crate::context::ContextCombinations;
use crate::demangle::{Demangler, degree};
use crate::error::{ConfigError, Error};
use crate::loader;
use crate::node::{AggregateKind, ContextSet, ParamNode};
use crate::product::CartesianProduct;
use crate::summary::Decisions;
use crate::value::{Value, ValueArray, ValueMap};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, trace};

/// Marker used when none is configured
pub const DEFAULT_MARKER: &str = "$";

/// Options for building a [`ConfGenerator`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Prefix designating varying keys
    pub marker: String,
    /// Labels joined into every active context
    pub context: ContextSet,
}

impl GeneratorConfig {
    /// Creates a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the varying marker
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets the inherited context labels
    pub fn with_context<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            context: ContextSet::new(),
        }
    }
}

/// Immutable template of a document with varying parameters
#[derive(Debug, Clone)]
pub struct ConfGenerator {
    config: GeneratorConfig,
    template: ParamNode,
    degree: usize,
}

impl ConfGenerator {
    /// Builds a generator using the default marker
    pub fn new(document: &Value) -> Result<Self, ConfigError> {
        Self::with_config(document, GeneratorConfig::default())
    }

    pub fn with_config(document: &Value, config: GeneratorConfig) -> Result<Self, ConfigError> {
        let template = Demangler::new(&config.marker)?.demangle(document)?;
        let degree = degree(document, &config.marker);
        debug!(
            degree,
            sites = template.site_count(),
            marker = %config.marker,
            "built configuration generator"
        );
        Ok(Self {
            config,
            template,
            degree,
        })
    }

    /// Loads a YAML or JSON document and builds a generator for it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_path_with_config(path, GeneratorConfig::default())
    }

    pub fn from_path_with_config(
        path: impl AsRef<Path>,
        config: GeneratorConfig,
    ) -> Result<Self, Error> {
        let document = loader::load_path(path)?;
        Ok(Self::with_config(&document, config)?)
    }

    /// Number of expansion passes the document needs
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn marker(&self) -> &str {
        &self.config.marker
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The demangled template
    pub fn template(&self) -> &ParamNode {
        &self.template
    }

    /// Active context assignments, in enumeration order
    pub fn contexts(&self) -> ContextCombinations {
        ContextCombinations::new(&self.template, self.config.context.clone())
    }

    /// Enumerates every configuration together with its decisions
    pub fn generate(&self) -> Expansion<'_> {
        Expansion::new(Cow::Borrowed(self), self.contexts())
    }

    /// Like [`generate`](Self::generate), owning the generator
    pub fn into_expansion(self) -> Expansion<'static> {
        let contexts = self.contexts();
        Expansion::new(Cow::Owned(self), contexts)
    }

    /// Enumerates the configurations for one fixed active context
    pub fn expand(&self, active: ContextSet) -> Expansion<'_> {
        Expansion::new(
            Cow::Borrowed(self),
            ContextCombinations::from_dimensions(Vec::new(), active),
        )
    }
}

/// Value combinations of one active context
#[derive(Debug)]
struct Pass {
    active: ContextSet,
    /// Eligible values per site, in traversal order
    options: Vec<Vec<Value>>,
    choices: CartesianProduct,
}

impl Pass {
    fn new(template: &ParamNode, active: ContextSet) -> Self {
        let mut options = Vec::new();
        collect_options(template, &active, &mut options);
        let choices = CartesianProduct::new(options.iter().map(Vec::len).collect());
        trace!(
            context = ?active,
            sites = options.len(),
            combinations = choices.total(),
            "expanding context"
        );
        Self {
            active,
            options,
            choices,
        }
    }

    /// Builds a fresh configuration for one index tuple
    fn materialize(&self, template: &ParamNode, indices: &[usize]) -> (Value, Decisions) {
        let mut picks = self
            .options
            .iter()
            .zip(indices)
            .map(|(options, &index)| &options[index]);
        let mut decisions = Decisions::new();
        let config = materialize(template, &mut picks, &mut decisions);
        (config, decisions)
    }
}

fn collect_options(node: &ParamNode, active: &ContextSet, options: &mut Vec<Vec<Value>>) {
    match node {
        ParamNode::Fixed(_) => {}
        ParamNode::Alternatives(alternatives) => options.push(alternatives.options(active)),
        ParamNode::Aggregate(aggregate) => {
            for child in aggregate.children() {
                collect_options(child, active, options);
            }
        }
    }
}

fn materialize<'v>(
    node: &ParamNode,
    picks: &mut impl Iterator<Item = &'v Value>,
    decisions: &mut Decisions,
) -> Value {
    match node {
        ParamNode::Fixed(value) => value.clone(),
        ParamNode::Alternatives(alternatives) => {
            // picks were collected by the same traversal, one per site
            let value = picks.next().cloned().unwrap_or_default();
            if alternatives.visible {
                decisions.record(&alternatives.name, value.clone());
            }
            value
        }
        ParamNode::Aggregate(aggregate) => match &aggregate.kind {
            AggregateKind::Mapping(map) => {
                let mut object = ValueMap::with_capacity(map.len());
                for (key, child) in map {
                    object.insert(key.clone(), materialize(child, picks, decisions));
                }
                Value::Object(object)
            }
            AggregateKind::Sequence(items) => {
                let array: ValueArray = items
                    .iter()
                    .map(|child| materialize(child, picks, decisions))
                    .collect();
                Value::Array(Box::new(array))
            }
        },
    }
}

/// Nested pass resolving the markers left in one produced configuration
#[derive(Debug)]
struct Nested {
    inner: Box<Expansion<'static>>,
    decisions: Decisions,
}

/// Lazy sequence of `(configuration, decisions)` pairs.
///
/// Nothing is computed until the next pair is requested. A nested pass that
/// fails to demangle yields its error once; the sequence ends after that.
#[derive(Debug)]
pub struct Expansion<'g> {
    generator: Cow<'g, ConfGenerator>,
    contexts: ContextCombinations,
    pass: Option<Pass>,
    nested: Option<Nested>,
    finished: bool,
}

impl<'g> Expansion<'g> {
    fn new(generator: Cow<'g, ConfGenerator>, contexts: ContextCombinations) -> Self {
        Self {
            generator,
            contexts,
            pass: None,
            nested: None,
            finished: false,
        }
    }

    fn fail(&mut self, error: ConfigError) -> ConfigError {
        self.finished = true;
        self.pass = None;
        self.nested = None;
        error
    }
}

impl Iterator for Expansion<'_> {
    type Item = Result<(Value, Decisions), ConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(nested) = self.nested.as_mut() {
                match nested.inner.next() {
                    Some(Ok((config, inner))) => {
                        return Some(Ok((config, nested.decisions.merged(inner))));
                    }
                    Some(Err(error)) => return Some(Err(self.fail(error))),
                    None => self.nested = None,
                }
            }

            if let Some(pass) = self.pass.as_mut() {
                if let Some(indices) = pass.choices.next() {
                    let (config, decisions) = pass.materialize(self.generator.template(), &indices);
                    if self.generator.degree() <= 1 {
                        return Some(Ok((config, decisions)));
                    }

                    let nested_config = GeneratorConfig {
                        marker: self.generator.marker().to_string(),
                        context: pass.active.clone(),
                    };
                    match ConfGenerator::with_config(&config, nested_config) {
                        Ok(generator) => {
                            debug!(degree = generator.degree(), "expanding nested pass");
                            self.nested = Some(Nested {
                                inner: Box::new(generator.into_expansion()),
                                decisions,
                            });
                            continue;
                        }
                        Err(error) => return Some(Err(self.fail(error))),
                    }
                }
                self.pass = None;
            }

            let Some(active) = self.contexts.next() else {
                self.finished = true;
                return None;
            };
            self.pass = Some(Pass::new(self.generator.template(), active));
        }
    }
}

impl std::iter::FusedIterator for Expansion<'_> {}
