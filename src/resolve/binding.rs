//! The binding context: analysis results keyed by fully-qualified name

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::resolve::descriptors::ClassDescriptor;
use crate::resolve::FqName;

/// Class descriptors recorded by one analysis pass, in analysis order
#[derive(Debug, Default)]
pub struct BindingContext {
    classes: IndexMap<FqName, ClassDescriptor>,
}

impl BindingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a class; the first record of a name wins
    pub(crate) fn record(&mut self, descriptor: ClassDescriptor) -> bool {
        match self.classes.entry(descriptor.fq_name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
                true
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &FqName> {
        self.classes.keys()
    }

    pub fn get(&self, fq_name: &FqName) -> Option<&ClassDescriptor> {
        self.classes.get(fq_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
