//! Assembly options

use crate::remarkable::graph::{ContentTransform, CyclePolicy};
use std::fmt;
use std::sync::Arc;

/// Knobs of the tree assembler.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Keep `space` tokens in the tree.
    pub retain_space: bool,
    /// Keep `html` tokens in the tree.
    pub allow_html: bool,
    /// Replace edges that close a cycle with the ancestor's path instead of deleting them.
    pub name_cycles: bool,
    /// Hooks run over the finished tree, in order.
    pub content_transforms: Vec<Arc<dyn ContentTransform>>,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retain_space(mut self, retain_space: bool) -> Self {
        self.retain_space = retain_space;
        self
    }

    pub fn with_allow_html(mut self, allow_html: bool) -> Self {
        self.allow_html = allow_html;
        self
    }

    pub fn with_name_cycles(mut self, name_cycles: bool) -> Self {
        self.name_cycles = name_cycles;
        self
    }

    pub fn with_content_transform(mut self, transform: impl ContentTransform + 'static) -> Self {
        self.content_transforms.push(Arc::new(transform));
        self
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        if self.name_cycles {
            CyclePolicy::Name
        } else {
            CyclePolicy::Delete
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            retain_space: false,
            allow_html: false,
            name_cycles: true,
            content_transforms: Vec::new(),
        }
    }
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("retain_space", &self.retain_space)
            .field("allow_html", &self.allow_html)
            .field("name_cycles", &self.name_cycles)
            .field("content_transforms", &self.content_transforms.len())
            .finish()
    }
}
