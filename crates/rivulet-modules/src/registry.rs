//! Module registry and factory.
//!
//! Lets patch files and the CLI instantiate modules by type ID and inspect
//! their connectors without constructing a graph.

use rivulet_core::{ConnectorSpec, Module};

use crate::{Accumulator, Counter, Scaler, Sum, ValueHolder};

/// Category of a module for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleCategory {
    /// Modules that hold or produce values.
    Source,
    /// Modules that map one value to another.
    Transform,
    /// Modules that combine many values or events.
    Aggregate,
}

impl ModuleCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Source",
            ModuleCategory::Transform => "Transform",
            ModuleCategory::Aggregate => "Aggregate",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Value holders and other graph entry points",
            ModuleCategory::Transform => "One-to-one mappings such as scaling",
            ModuleCategory::Aggregate => "Sums, accumulators and event counters",
        }
    }
}

/// Describes a module type in the registry.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Unique type ID (lowercase, no spaces), as reported by `Module::type_name`.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Category for organization.
    pub category: ModuleCategory,
}

/// Factory function type for creating modules.
type ModuleFactory = fn() -> Box<dyn Module + Send>;

struct RegistryEntry {
    descriptor: ModuleDescriptor,
    factory: ModuleFactory,
}

/// Registry of the available module types.
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Creates a registry with every built-in module registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(5),
        };
        registry.register_builtin_modules();
        registry
    }

    /// Creates a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn register_builtin_modules(&mut self) {
        self.register(
            ModuleDescriptor {
                id: "value",
                name: "Value Holder",
                description: "Stores one number and reads it back",
                category: ModuleCategory::Source,
            },
            || Box::new(ValueHolder::default()),
        );

        self.register(
            ModuleDescriptor {
                id: "scale",
                name: "Scaler",
                description: "Multiplies its input by a factor and adds an offset",
                category: ModuleCategory::Transform,
            },
            || Box::new(Scaler::default()),
        );

        self.register(
            ModuleDescriptor {
                id: "sum",
                name: "Sum",
                description: "Adds up any number of contributions",
                category: ModuleCategory::Aggregate,
            },
            || Box::new(Sum::new()),
        );

        self.register(
            ModuleDescriptor {
                id: "accumulator",
                name: "Accumulator",
                description: "Running total, count and mean of received values",
                category: ModuleCategory::Aggregate,
            },
            || Box::new(Accumulator::new()),
        );

        self.register(
            ModuleDescriptor {
                id: "counter",
                name: "Counter",
                description: "Counts trigger events",
                category: ModuleCategory::Aggregate,
            },
            || Box::new(Counter::new()),
        );
    }

    /// Registers a module type. Lookups return the first registration with a
    /// matching ID.
    pub fn register(&mut self, descriptor: ModuleDescriptor, factory: ModuleFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered modules.
    pub fn all_modules(&self) -> Vec<&ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for modules in a category.
    pub fn modules_in_category(&self, category: ModuleCategory) -> Vec<&ModuleDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Gets a descriptor by type ID.
    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.entry(id).map(|e| &e.descriptor)
    }

    /// Creates a module instance by type ID.
    pub fn create(&self, id: &str) -> Option<Box<dyn Module + Send>> {
        self.entry(id).map(|e| (e.factory)())
    }

    /// Connector declarations of a module type.
    ///
    /// Creates a temporary instance to read them.
    pub fn connectors(&self, id: &str) -> Option<Vec<ConnectorSpec>> {
        self.create(id).map(|m| m.connectors())
    }

    /// Returns the number of registered module types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.id == id)
    }
}
