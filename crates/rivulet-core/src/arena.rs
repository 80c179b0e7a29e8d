//! Module and connector arena shared by both runtime backends.
//!
//! The arena owns the modules and one slot per declared connector. A slot
//! records the static facts about a connector (owner, port, role, type, the
//! resolved dependent outputs) plus backend-specific state `S`. Slots are never
//! removed: destroying a module turns its slots into inert tombstones.

use crate::connector::{ConnectorId, ConnectorSpec, Role};
use crate::error::ConnectorError;
use crate::module::{Module, ModuleError, ModuleId};
use crate::value::{Value, ValueType};

pub(crate) struct ConnectorSlot<S> {
    pub owner: ModuleId,
    pub port: usize,
    pub name: &'static str,
    pub role: Role,
    pub value_type: ValueType,
    pub caching: bool,
    /// Outputs of the same module invalidated when this connector fires.
    pub dependents: Vec<ConnectorId>,
    pub destroyed: bool,
    pub state: S,
}

struct ModuleEntry {
    module: Box<dyn Module + Send>,
    connectors: Vec<ConnectorId>,
}

pub(crate) struct ModuleArena<S> {
    modules: Vec<Option<ModuleEntry>>,
    connectors: Vec<ConnectorSlot<S>>,
}

impl<S> ModuleArena<S> {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            connectors: Vec::new(),
        }
    }

    /// Adds a module, creating one slot per declared connector.
    ///
    /// Dependent names are resolved against the module's own outputs; nothing
    /// is inserted if any declaration is invalid.
    pub fn insert(
        &mut self,
        module: Box<dyn Module + Send>,
        mut make_state: impl FnMut(&ConnectorSpec) -> S,
    ) -> Result<ModuleId, ConnectorError> {
        let specs = module.connectors();
        let base = self.connectors.len() as u32;

        for (i, spec) in specs.iter().enumerate() {
            if specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(ConnectorError::DuplicateConnectorName(spec.name));
            }
        }

        let mut slots = Vec::with_capacity(specs.len());
        for (port, spec) in specs.iter().enumerate() {
            let mut dependents = Vec::with_capacity(spec.dependents.len());
            for &dependent in &spec.dependents {
                let target = specs
                    .iter()
                    .position(|s| s.name == dependent && s.role == Role::Output)
                    .ok_or(ConnectorError::UnknownDependent {
                        connector: spec.name,
                        dependent,
                    })?;
                dependents.push(ConnectorId(base + target as u32));
            }
            slots.push(ConnectorSlot {
                owner: ModuleId(self.modules.len() as u32),
                port,
                name: spec.name,
                role: spec.role,
                value_type: spec.value_type,
                caching: spec.caching,
                dependents,
                destroyed: false,
                state: make_state(spec),
            });
        }

        let id = ModuleId(self.modules.len() as u32);
        let connectors = (0..slots.len() as u32)
            .map(|i| ConnectorId(base + i))
            .collect();
        self.connectors.extend(slots);
        self.modules.push(Some(ModuleEntry { module, connectors }));
        Ok(id)
    }

    /// Takes a module out of the arena and turns its connectors into tombstones.
    pub fn retire(
        &mut self,
        owner: ModuleId,
    ) -> Result<(Box<dyn Module + Send>, Vec<ConnectorId>), ConnectorError> {
        let entry = self
            .modules
            .get_mut(owner.0 as usize)
            .and_then(Option::take)
            .ok_or(ConnectorError::ModuleNotFound(owner))?;
        for id in &entry.connectors {
            self.connectors[id.0 as usize].destroyed = true;
        }
        Ok((entry.module, entry.connectors))
    }

    pub fn module_count(&self) -> usize {
        self.modules.iter().filter(|m| m.is_some()).count()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn type_name(&self, owner: ModuleId) -> Result<&'static str, ConnectorError> {
        self.entry(owner).map(|e| e.module.type_name())
    }

    pub fn connectors_of(&self, owner: ModuleId) -> Result<&[ConnectorId], ConnectorError> {
        self.entry(owner).map(|e| e.connectors.as_slice())
    }

    /// Finds a connector of `owner` by name.
    pub fn lookup(&self, owner: ModuleId, name: &str) -> Result<ConnectorId, ConnectorError> {
        self.entry(owner)?
            .connectors
            .iter()
            .copied()
            .find(|id| self.connectors[id.0 as usize].name == name)
            .ok_or_else(|| ConnectorError::UnknownConnector {
                module: owner,
                name: name.to_string(),
            })
    }

    /// Returns a slot whether or not its module is still alive.
    pub fn raw(&self, id: ConnectorId) -> Result<&ConnectorSlot<S>, ConnectorError> {
        self.connectors
            .get(id.0 as usize)
            .ok_or(ConnectorError::ConnectorNotFound(id))
    }

    pub fn raw_mut(&mut self, id: ConnectorId) -> Result<&mut ConnectorSlot<S>, ConnectorError> {
        self.connectors
            .get_mut(id.0 as usize)
            .ok_or(ConnectorError::ConnectorNotFound(id))
    }

    /// Returns the slot of a live connector.
    pub fn slot(&self, id: ConnectorId) -> Result<&ConnectorSlot<S>, ConnectorError> {
        let slot = self.raw(id)?;
        if slot.destroyed {
            return Err(ConnectorError::UseAfterDestroy(id));
        }
        Ok(slot)
    }

    pub fn slot_mut(&mut self, id: ConnectorId) -> Result<&mut ConnectorSlot<S>, ConnectorError> {
        let slot = self.raw_mut(id)?;
        if slot.destroyed {
            return Err(ConnectorError::UseAfterDestroy(id));
        }
        Ok(slot)
    }

    /// Returns the slot of a live connector with the given role.
    pub fn expect_role(
        &self,
        id: ConnectorId,
        role: Role,
    ) -> Result<&ConnectorSlot<S>, ConnectorError> {
        let slot = self.slot(id)?;
        if slot.role != role {
            let expected = match role {
                Role::Input => "an input",
                Role::Trigger => "a trigger",
                Role::Output => "an output",
                Role::MultiInput => "a multi-input",
            };
            return Err(ConnectorError::wrong_role(id, expected, slot.role));
        }
        Ok(slot)
    }

    /// Fails with `TypeMismatch` if the connector's declared type rejects `value`.
    pub fn check_admits(&self, id: ConnectorId, value: &Value) -> Result<(), ConnectorError> {
        let slot = self.raw(id)?;
        if slot.value_type.admits(value) {
            Ok(())
        } else {
            Err(ConnectorError::TypeMismatch {
                connector: id,
                expected: slot.value_type.name(),
                found: value.type_name(),
            })
        }
    }

    /// Invokes the module method bound to a live connector.
    pub fn call<R>(
        &mut self,
        id: ConnectorId,
        f: impl FnOnce(&mut (dyn Module + Send), usize) -> Result<R, ModuleError>,
    ) -> Result<R, ConnectorError> {
        let (owner, port) = {
            let slot = self.slot(id)?;
            (slot.owner, slot.port)
        };
        let entry = self
            .modules
            .get_mut(owner.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(ConnectorError::ModuleNotFound(owner))?;
        f(entry.module.as_mut(), port).map_err(|source| ConnectorError::Module {
            connector: id,
            source,
        })
    }

    fn entry(&self, owner: ModuleId) -> Result<&ModuleEntry, ConnectorError> {
        self.modules
            .get(owner.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(ConnectorError::ModuleNotFound(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Declares(Vec<ConnectorSpec>);

    impl Module for Declares {
        fn type_name(&self) -> &'static str {
            "declares"
        }

        fn connectors(&self) -> Vec<ConnectorSpec> {
            self.0.clone()
        }
    }

    fn arena_with(specs: Vec<ConnectorSpec>) -> (ModuleArena<()>, Result<ModuleId, ConnectorError>) {
        let mut arena = ModuleArena::new();
        let result = arena.insert(Box::new(Declares(specs)), |_| ());
        (arena, result)
    }

    #[test]
    fn dependents_resolve_to_same_module_outputs() {
        let (arena, id) = arena_with(vec![
            ConnectorSpec::output("GetA", ValueType::Any),
            ConnectorSpec::input("SetX", ValueType::Any, &["GetA", "GetB"]),
            ConnectorSpec::output("GetB", ValueType::Any),
        ]);
        let id = id.unwrap();
        let set_x = arena.lookup(id, "SetX").unwrap();
        let deps = &arena.slot(set_x).unwrap().dependents;
        assert_eq!(
            deps,
            &vec![
                arena.lookup(id, "GetA").unwrap(),
                arena.lookup(id, "GetB").unwrap()
            ]
        );
    }

    #[test]
    fn unknown_dependent_is_rejected() {
        let (arena, result) = arena_with(vec![ConnectorSpec::input(
            "SetX",
            ValueType::Any,
            &["GetMissing"],
        )]);
        assert!(matches!(
            result,
            Err(ConnectorError::UnknownDependent {
                dependent: "GetMissing",
                ..
            })
        ));
        assert_eq!(arena.connector_count(), 0);
        assert_eq!(arena.module_count(), 0);
    }

    #[test]
    fn dependent_must_be_an_output() {
        let (_, result) = arena_with(vec![
            ConnectorSpec::input("SetX", ValueType::Any, &["SetY"]),
            ConnectorSpec::input("SetY", ValueType::Any, &[]),
        ]);
        assert!(matches!(result, Err(ConnectorError::UnknownDependent { .. })));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (_, result) = arena_with(vec![
            ConnectorSpec::output("Get", ValueType::Any),
            ConnectorSpec::output("Get", ValueType::Any),
        ]);
        assert!(matches!(
            result,
            Err(ConnectorError::DuplicateConnectorName("Get"))
        ));
    }

    #[test]
    fn retired_slots_become_tombstones() {
        let (mut arena, id) = arena_with(vec![ConnectorSpec::output("Get", ValueType::Any)]);
        let id = id.unwrap();
        let get = arena.lookup(id, "Get").unwrap();
        let (_, connectors) = arena.retire(id).unwrap();
        assert_eq!(connectors, vec![get]);
        assert!(matches!(
            arena.slot(get),
            Err(ConnectorError::UseAfterDestroy(c)) if c == get
        ));
        assert!(arena.raw(get).is_ok());
        assert!(matches!(
            arena.retire(id),
            Err(ConnectorError::ModuleNotFound(_))
        ));
    }

    #[test]
    fn expect_role_reports_actual_role() {
        let (arena, id) = arena_with(vec![ConnectorSpec::output("Get", ValueType::Any)]);
        let get = arena.lookup(id.unwrap(), "Get").unwrap();
        assert!(matches!(
            arena.expect_role(get, Role::Input),
            Err(ConnectorError::WrongRole {
                found: Role::Output,
                ..
            })
        ));
    }
}
