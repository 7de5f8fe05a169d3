// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::errors::GraphError;

/// Organizational grouping of module ids. Has no effect on dataflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub uid: String,
    pub module_ids: Vec<String>,
    pub children: Vec<Layer>,
}

impl Layer {
    /// A layer with the given uid, or a random one.
    pub fn new(uid: Option<String>, module_ids: Vec<String>, children: Vec<Layer>) -> Self {
        Self {
            uid: uid.unwrap_or_else(|| Uuid::new_v4().to_string()),
            module_ids,
            children,
        }
    }

    pub fn find(&self, uid: &str) -> Option<&Layer> {
        if self.uid == uid {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(uid))
    }

    fn find_mut(&mut self, uid: &str) -> Option<&mut Layer> {
        if self.uid == uid {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(uid))
    }

    /// Every layer of the tree (this one included) matching `predicate`,
    /// depth first.
    pub fn filter<P>(&self, predicate: P) -> Vec<Layer>
    where
        P: Fn(&Layer) -> bool,
    {
        let mut found = Vec::new();
        self.collect_matching(&predicate, &mut found);
        found
    }

    fn collect_matching<P>(&self, predicate: &P, found: &mut Vec<Layer>)
    where
        P: Fn(&Layer) -> bool,
    {
        if predicate(self) {
            found.push(self.clone());
        }
        for child in &self.children {
            child.collect_matching(predicate, found);
        }
    }

    pub fn contains_module(&self, module_id: &str) -> bool {
        self.module_ids.iter().any(|id| id == module_id)
            || self.children.iter().any(|child| child.contains_module(module_id))
    }

    pub fn all_module_ids(&self) -> Vec<String> {
        let mut ids = self.module_ids.clone();
        for child in &self.children {
            ids.extend(child.all_module_ids());
        }
        ids
    }

    fn all_layer_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::from([self.uid.clone()]);
        for child in &self.children {
            ids.extend(child.all_layer_ids());
        }
        ids
    }

    fn parent_of(&self, uid: &str) -> Option<&Layer> {
        if self.children.iter().any(|child| child.uid == uid) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.parent_of(uid))
    }

    /// New tree with `include` placed under the layer `at` (this layer when
    /// `None`). Modules and layers gathered by `include` are removed from
    /// where they were, so each ends up in exactly one place.
    ///
    /// When `include` reuses the uid of an existing layer, it also takes the
    /// members of that layer it does not already hold. When `at` is one of
    /// the moved layers, `include` goes to the closest ancestor left behind.
    pub fn merge(&self, include: Layer, at: Option<&str>) -> Result<Layer, GraphError> {
        let requested = at.unwrap_or(self.uid.as_str());
        if self.find(requested).is_none() {
            return Err(GraphError::UnknownLayer {
                layer_id: requested.to_string(),
            });
        }

        let include = self.absorb_replaced(include);
        let moved_modules: BTreeSet<String> = include.all_module_ids().into_iter().collect();
        let moved_layers = include.all_layer_ids();

        let mut target = requested.to_string();
        while moved_layers.contains(&target) {
            target = match self.parent_of(&target) {
                Some(parent) => parent.uid.clone(),
                None => return Err(GraphError::LayerCycle { layer_id: target }),
            };
        }

        let mut merged = self.without(&moved_modules, &moved_layers);
        let parent = merged
            .find_mut(&target)
            .ok_or(GraphError::UnknownLayer { layer_id: target })?;
        parent.children.push(include);
        Ok(merged)
    }

    fn absorb_replaced(&self, mut include: Layer) -> Layer {
        let Some(replaced) = self.find(&include.uid) else {
            return include;
        };
        let modules: BTreeSet<String> = include.all_module_ids().into_iter().collect();
        let left = replaced.without(&modules, &include.all_layer_ids());
        include.module_ids.extend(left.module_ids);
        include.children.extend(left.children);
        include
    }

    fn without(&self, modules: &BTreeSet<String>, layers: &BTreeSet<String>) -> Layer {
        Layer {
            uid: self.uid.clone(),
            module_ids: self.module_ids.iter().filter(|id| !modules.contains(*id)).cloned().collect(),
            children: self
                .children
                .iter()
                .filter(|child| !layers.contains(&child.uid))
                .map(|child| child.without(modules, layers))
                .collect(),
        }
    }
}
