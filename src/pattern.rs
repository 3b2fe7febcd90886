//! The set of partition patterns a shatter request picks from.

use crate::bsp::PartitionTree;
use crate::config::ShatterConfig;
use crate::traits::HierarchySource;
use log::{debug, warn};
use rand::Rng;

/// Partition trees built from the pattern hierarchies of a
/// [`HierarchySource`].
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    trees: Vec<PartitionTree>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the library contents with every pattern `source` provides.
    ///
    /// Hierarchies are looked up as `"{prefix}0"`, `"{prefix}1"`, ... until a
    /// name is missing. A hierarchy that cannot become a tree is skipped and
    /// the scan moves on to the next index. Returns the number of trees loaded.
    pub fn load<S: HierarchySource>(&mut self, source: &S, config: &ShatterConfig) -> usize {
        self.trees.clear();

        let mut index = 0;
        loop {
            let name = config.pattern_name(index);
            let Some(hierarchy) = source.transform_tree(&name) else {
                break;
            };
            match PartitionTree::from_hierarchy(hierarchy, config.root_bone, config.max_fragments)
            {
                Ok(tree) => {
                    debug!("loaded shatter pattern {name} with {} leaves", tree.leaf_count());
                    self.trees.push(tree);
                },
                Err(err) => warn!("skipping shatter pattern {name}: {err}"),
            }
            index += 1;
        }

        if self.trees.is_empty() {
            debug!(
                "no shatter patterns found under prefix {:?}",
                config.pattern_prefix
            );
        }
        self.trees.len()
    }

    /// Add an already built tree.
    pub fn push(&mut self, tree: PartitionTree) {
        self.trees.push(tree);
    }

    /// A uniformly chosen tree, or `None` if the library is empty.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<&PartitionTree> {
        if self.trees.is_empty() {
            return None;
        }
        self.trees.get(rng.gen_range(0..self.trees.len()))
    }

    pub fn unload(&mut self) {
        self.trees.clear();
    }

    pub fn get(&self, index: usize) -> Option<&PartitionTree> {
        self.trees.get(index)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartitionTree> {
        self.trees.iter()
    }
}
