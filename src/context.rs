//! Context resolution
//!
//! Every varying site whose candidates carry labels contributes one
//! dimension: the sorted union of its labels. An active context assignment
//! picks one label per dimension. Dimensions are not scoped to their site,
//! so sites reusing the same label names stay synchronized: assignments that
//! pick different labels for them make each such site match several
//! candidates, and those assignments produce nothing.

use crate::node::{AggregateKind, ContextSet, ParamNode};
use crate::product::CartesianProduct;

/// Collects the label dimensions of `root` in traversal order
pub fn context_dimensions(root: &ParamNode) -> Vec<Vec<String>> {
    let mut dimensions = Vec::new();
    collect_dimensions(root, &mut dimensions);
    dimensions
}

fn collect_dimensions(node: &ParamNode, dimensions: &mut Vec<Vec<String>>) {
    if node.is_context_free() {
        return;
    }
    match node {
        ParamNode::Fixed(_) => {}
        ParamNode::Alternatives(alternatives) => {
            dimensions.push(alternatives.labels.iter().cloned().collect());
        }
        ParamNode::Aggregate(aggregate) => match &aggregate.kind {
            AggregateKind::Mapping(map) => {
                for child in map.values() {
                    collect_dimensions(child, dimensions);
                }
            }
            AggregateKind::Sequence(items) => {
                for child in items {
                    collect_dimensions(child, dimensions);
                }
            }
        },
    }
}

/// Lazy sequence of active contexts: one label chosen per dimension, joined
/// with the labels inherited from an enclosing pass
#[derive(Debug, Clone)]
pub struct ContextCombinations {
    dimensions: Vec<Vec<String>>,
    product: CartesianProduct,
    inherited: ContextSet,
}

impl ContextCombinations {
    pub fn new(root: &ParamNode, inherited: ContextSet) -> Self {
        Self::from_dimensions(context_dimensions(root), inherited)
    }

    pub fn from_dimensions(dimensions: Vec<Vec<String>>, inherited: ContextSet) -> Self {
        let product = CartesianProduct::new(dimensions.iter().map(Vec::len).collect());
        Self {
            dimensions,
            product,
            inherited,
        }
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }
}

impl Iterator for ContextCombinations {
    type Item = ContextSet;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.product.next()?;
        let mut active = self.inherited.clone();
        for (dimension, index) in self.dimensions.iter().zip(indices) {
            active.insert(dimension[index].clone());
        }
        Some(active)
    }
}

impl std::iter::FusedIterator for ContextCombinations {}
