//! Opaque payloads that travel across connections.
//!
//! The runtime never looks inside a [`Value`]: it clones the handle, checks its
//! type against a connector's declared [`ValueType`], and hands it to a module.
//! Computation, equality and identity of payloads are the module's concern.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, cheaply clonable payload.
///
/// Cloning a `Value` clones the handle, not the payload. Values are `Send + Sync`
/// so a graph can be moved to another thread between propagation passes.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Wraps a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns a reference to the payload if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a copy of the payload if it is a `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Returns true if the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Concrete type of the payload.
    #[inline]
    pub fn value_type(&self) -> ValueType {
        ValueType::Of {
            id: self.type_id,
            name: self.type_name,
        }
    }

    /// Rust type name of the payload, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if both handles point at the same payload.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

/// Declared type of a connector.
///
/// `Any` accepts every payload. A concrete type accepts only payloads of exactly
/// that Rust type; there is no subtyping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Accepts anything.
    Any,
    /// A concrete Rust type.
    Of {
        /// Type identity.
        id: TypeId,
        /// Type name, for diagnostics.
        name: &'static str,
    },
}

impl ValueType {
    /// Declared type for payloads of type `T`.
    pub fn of<T: Any>() -> Self {
        Self::Of {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Of { name, .. } => *name,
        }
    }

    /// Returns true if a payload may be handed to a connector of this type.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Of { id, .. } => *id == value.type_id,
        }
    }

    /// Returns true if every value an output of type `provided` can produce is
    /// admitted by this type.
    ///
    /// An output declared `Any` only satisfies inputs that are also `Any`.
    pub fn accepts(&self, provided: ValueType) -> bool {
        match (self, provided) {
            (Self::Any, _) => true,
            (Self::Of { id: required, .. }, Self::Of { id, .. }) => *required == id,
            (Self::Of { .. }, Self::Any) => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_matches_wrapped_type() {
        let v = Value::new(2.5_f64);
        assert_eq!(v.downcast_ref::<f64>(), Some(&2.5));
        assert!(v.downcast_ref::<f32>().is_none());
        assert!(v.is::<f64>());
        assert_eq!(v.cloned::<f64>(), Some(2.5));
    }

    #[test]
    fn clones_share_payload() {
        let v = Value::new(vec![1.0_f64, 2.0]);
        let w = v.clone();
        assert!(Value::ptr_eq(&v, &w));
        assert!(!Value::ptr_eq(&v, &Value::new(vec![1.0_f64, 2.0])));
    }

    #[test]
    fn any_admits_everything() {
        assert!(ValueType::Any.admits(&Value::new("text")));
        assert!(ValueType::Any.admits(&Value::new(1_u8)));
    }

    #[test]
    fn concrete_type_admits_only_itself() {
        let ty = ValueType::of::<f64>();
        assert!(ty.admits(&Value::new(1.0_f64)));
        assert!(!ty.admits(&Value::new(1_i32)));
    }

    #[test]
    fn accepts_rules() {
        let f = ValueType::of::<f64>();
        let i = ValueType::of::<i64>();
        assert!(ValueType::Any.accepts(f));
        assert!(ValueType::Any.accepts(ValueType::Any));
        assert!(f.accepts(f));
        assert!(!f.accepts(i));
        assert!(!f.accepts(ValueType::Any));
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(ValueType::Any.to_string(), "any");
        assert_eq!(ValueType::of::<f64>().to_string(), "f64");
        assert_eq!(format!("{:?}", Value::new(1_u32)), "Value<u32>");
    }
}
