//! Storage for one clause: a fixed static part and an append-only dynamic part.

use std::slice;

/// Append-only, insertion-ordered buffer of fragments added after attach.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicList<F> {
    items: Vec<F>,
}

impl<F> DynamicList<F> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub(crate) fn append(&mut self, fragment: F) {
        self.items.push(fragment);
    }

    pub(crate) fn extend(&mut self, fragments: impl IntoIterator<Item = F>) {
        for fragment in fragments {
            self.append(fragment);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, F> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[F] {
        &self.items
    }
}

impl<F> Default for DynamicList<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Contents of an attached clause.
///
/// The static fragments are fixed when the clause is attached. The dynamic
/// buffer only ever grows, and only on backend-bound statements. Iteration
/// yields static fragments first, each half in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseData<F> {
    static_items: Box<[F]>,
    dynamic_items: DynamicList<F>,
}

impl<F> ClauseData<F> {
    pub fn new(static_items: Vec<F>) -> Self {
        Self {
            static_items: static_items.into_boxed_slice(),
            dynamic_items: DynamicList::new(),
        }
    }

    pub fn static_items(&self) -> &[F] {
        &self.static_items
    }

    pub fn dynamic_items(&self) -> &DynamicList<F> {
        &self.dynamic_items
    }

    pub(crate) fn dynamic_items_mut(&mut self) -> &mut DynamicList<F> {
        &mut self.dynamic_items
    }

    /// Static then dynamic fragments.
    pub fn iter(&self) -> impl Iterator<Item = &F> + '_ {
        self.static_items.iter().chain(self.dynamic_items.iter())
    }

    pub fn len(&self) -> usize {
        self.static_items.len() + self.dynamic_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F> Default for ClauseData<F> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
