//! Lazy per-field resolution: a typed record's declared fields start out as
//! raw parsed values, and are promoted to their resolved form on first read.
//! This replaces dynamic attribute interception with an explicit enum and a
//! single dispatch table, so there is no runtime attribute hijacking.

use std::cell::RefCell;

use crate::error::Result;
use crate::object::Object;

/// One lazily-resolved field slot on a typed record.
#[derive(Debug, Clone)]
pub enum FieldRef<T> {
    Absent,
    Raw(Object),
    Resolved(T),
}

impl<T: Clone> FieldRef<T> {
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn raw(value: Option<Object>) -> Self {
        match value {
            Some(obj) => Self::Raw(obj),
            None => Self::Absent,
        }
    }
}

/// A field slot guarded by interior mutability so a `&self` accessor can
/// promote `Raw` to `Resolved` the first time it's read, per the
/// single-resolution-per-field invariant: subsequent reads return the
/// cached resolved value without re-invoking the resolver.
#[derive(Debug)]
pub struct LazyField<T>(RefCell<FieldRef<T>>);

impl<T: Clone> LazyField<T> {
    pub fn new(slot: FieldRef<T>) -> Self {
        Self(RefCell::new(slot))
    }

    pub fn is_absent(&self) -> bool {
        self.0.borrow().is_absent()
    }

    /// Resolves this field, calling `resolve` only on a `Raw` slot and only
    /// once: the outcome supersedes the raw value for every later read.
    pub fn get(&self, resolve: impl FnOnce(&Object) -> Result<T>) -> Result<Option<T>> {
        let raw_obj = {
            let slot = self.0.borrow();
            match &*slot {
                FieldRef::Absent => return Ok(None),
                FieldRef::Resolved(t) => return Ok(Some(t.clone())),
                FieldRef::Raw(obj) => obj.clone(),
            }
        };
        let resolved = resolve(&raw_obj)?;
        *self.0.borrow_mut() = FieldRef::Resolved(resolved.clone());
        Ok(Some(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Number;

    #[test]
    fn absent_field_short_circuits() {
        let field: LazyField<i64> = LazyField::new(FieldRef::Absent);
        let mut calls = 0;
        let result = field.get(|_| {
            calls += 1;
            Ok(0)
        });
        assert_eq!(result.unwrap(), None);
        assert_eq!(calls, 0);
    }

    #[test]
    fn raw_field_resolves_once() {
        let field: LazyField<i64> = LazyField::new(FieldRef::Raw(Object::Number(Number::Int(5))));
        let mut calls = 0;
        for _ in 0..3 {
            let result = field
                .get(|obj| {
                    calls += 1;
                    Ok(obj.as_i64().unwrap_or(0) * 2)
                })
                .unwrap();
            assert_eq!(result, Some(10));
        }
        assert_eq!(calls, 1);
    }
}
