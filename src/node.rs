//! Parameter nodes: the demangled form of a configuration document
//!
//! A document is rewritten once into a tree of [`ParamNode`]s. Fixed leaves
//! are copied verbatim into every produced configuration, aggregates mirror
//! the mappings and sequences of the document, and every varying key becomes
//! an [`Alternatives`] site whose candidates are tagged with the context
//! labels they belong to.

use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Set of context labels. The empty set is the universal context.
pub type ContextSet = BTreeSet<String>;

/// A node of the demangled template
#[derive(Debug, Clone, PartialEq)]
pub enum ParamNode {
    /// A value copied as-is into every configuration
    Fixed(Value),
    /// A varying site choosing one of several candidates
    Alternatives(Alternatives),
    /// A mapping or sequence of further nodes
    Aggregate(Aggregate),
}

impl ParamNode {
    /// Union of the context labels of every varying site beneath this node
    pub fn context(&self) -> ContextSet {
        match self {
            ParamNode::Fixed(_) => ContextSet::new(),
            ParamNode::Alternatives(alternatives) => alternatives.labels.clone(),
            ParamNode::Aggregate(aggregate) => aggregate.context.clone(),
        }
    }

    /// Returns true if the node holds no label-restricted site at all
    pub fn is_context_free(&self) -> bool {
        match self {
            ParamNode::Fixed(_) => true,
            ParamNode::Alternatives(alternatives) => alternatives.labels.is_empty(),
            ParamNode::Aggregate(aggregate) => aggregate.context.is_empty(),
        }
    }

    /// Number of varying sites in this subtree
    pub fn site_count(&self) -> usize {
        match self {
            ParamNode::Fixed(_) => 0,
            ParamNode::Alternatives(_) => 1,
            ParamNode::Aggregate(aggregate) => {
                aggregate.children().map(ParamNode::site_count).sum()
            }
        }
    }
}

/// Structural node. Mapping children are kept in lexicographic key order so
/// every traversal visits sites in the same, reproducible order.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub kind: AggregateKind,
    /// Cached union of the labels found beneath this node
    pub context: ContextSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateKind {
    Mapping(BTreeMap<String, ParamNode>),
    Sequence(Vec<ParamNode>),
}

impl Aggregate {
    pub fn mapping(children: BTreeMap<String, ParamNode>) -> Self {
        let context = union_of(children.values());
        Self {
            kind: AggregateKind::Mapping(children),
            context,
        }
    }

    pub fn sequence(children: Vec<ParamNode>) -> Self {
        let context = union_of(children.iter());
        Self {
            kind: AggregateKind::Sequence(children),
            context,
        }
    }

    /// Iterates over the children in traversal order
    pub fn children(&self) -> Box<dyn Iterator<Item = &ParamNode> + '_> {
        match &self.kind {
            AggregateKind::Mapping(map) => Box::new(map.values()),
            AggregateKind::Sequence(items) => Box::new(items.iter()),
        }
    }
}

fn union_of<'a>(nodes: impl Iterator<Item = &'a ParamNode>) -> ContextSet {
    let mut context = ContextSet::new();
    for node in nodes {
        if !node.is_context_free() {
            context.extend(node.context());
        }
    }
    context
}

/// What a single candidate contributes when its site is expanded
#[derive(Debug, Clone, PartialEq)]
pub enum Choices {
    /// One value, taken from a mapping under a marked key
    One(Value),
    /// Each element in turn, taken from a sequence under a marked key
    Each(Vec<Value>),
}

impl Choices {
    pub fn len(&self) -> usize {
        match self {
            Choices::One(_) => 1,
            Choices::Each(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        match self {
            Choices::One(value) => std::slice::from_ref(value).iter(),
            Choices::Each(values) => values.iter(),
        }
    }
}

/// A candidate sub-tree of a varying site
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Labels under which this candidate is eligible; empty means always
    pub context: ContextSet,
    pub choices: Choices,
}

impl Candidate {
    /// A candidate restricted to the given labels
    pub fn labelled<I, S>(labels: I, value: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            context: labels.into_iter().map(Into::into).collect(),
            choices: Choices::One(value),
        }
    }

    /// An unconditional candidate enumerating each value in turn
    pub fn unconditional(values: Vec<Value>) -> Self {
        Self {
            context: ContextSet::new(),
            choices: Choices::Each(values),
        }
    }

    /// Returns true if this candidate is eligible under the active context
    pub fn matches(&self, active: &ContextSet) -> bool {
        self.context.is_empty() || !self.context.is_disjoint(active)
    }
}

/// A varying site
#[derive(Debug, Clone, PartialEq)]
pub struct Alternatives {
    /// Key name with one marker removed
    pub name: String,
    /// Whether the chosen value is reported in the summary
    pub visible: bool,
    pub candidates: Vec<Candidate>,
    /// Union of the candidates' labels
    pub labels: ContextSet,
}

impl Alternatives {
    pub fn new(name: impl Into<String>, visible: bool, candidates: Vec<Candidate>) -> Self {
        let labels = candidates
            .iter()
            .flat_map(|candidate| candidate.context.iter().cloned())
            .collect();
        Self {
            name: name.into(),
            visible,
            candidates,
            labels,
        }
    }

    /// Selects the candidates eligible under `active`.
    ///
    /// Exactly one match is used as is. No match at all leaves the choice
    /// unconstrained, so every candidate is eligible. Several matches mean
    /// the document is inconsistent for this context and no candidate is
    /// eligible, which makes the whole context assignment produce nothing.
    pub fn select(&self, active: &ContextSet) -> Vec<&Candidate> {
        let matching: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|candidate| candidate.matches(active))
            .collect();
        match matching.len() {
            0 => self.candidates.iter().collect(),
            1 => matching,
            n => {
                debug!(
                    site = %self.name,
                    matches = n,
                    "context matches several alternatives; site yields nothing"
                );
                Vec::new()
            }
        }
    }

    /// Values this site can take under `active`, in candidate order
    pub fn options(&self, active: &ContextSet) -> Vec<Value> {
        self.select(active)
            .into_iter()
            .flat_map(|candidate| candidate.choices.iter().cloned())
            .collect()
    }
}
