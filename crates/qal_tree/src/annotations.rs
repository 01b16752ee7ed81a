// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

// The typed annotation side-table carried by every tree node.
//
// Annotations are keyed by their Rust type: a node holds at most one value
// per type. The table is opaque to the tree library; it only needs to store
// and clone the payloads. Typical payloads are the parser's source locations
// and host bookkeeping such as a gate matrix on an instruction descriptor.

use core::any::{Any, TypeId};
use core::fmt;
use hashbrown::HashMap;

/// Object-safe wrapper around an annotation payload. Blanket-implemented
/// for every `Any` type, so callers never implement this themselves.
pub trait AnnotationValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send + Sync> AnnotationValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Function pointer that clones a stored payload without knowing its
/// concrete type at the call site; monomorphized once per annotation type
/// in [`Annotations::set`].
type CloneFn = fn(&dyn AnnotationValue) -> Box<dyn AnnotationValue>;

fn clone_fn_for<T: Any + Clone + Send + Sync>() -> CloneFn {
    |value| {
        let concrete = value
            .as_any()
            .downcast_ref::<T>()
            .expect("annotation table entry type mismatch");
        Box::new(concrete.clone())
    }
}

/// Implemented by every tree node: access to the node's annotation
/// side-table.
pub trait HasAnnotations {
    fn annotations(&self) -> &Annotations;
    fn annotations_mut(&mut self) -> &mut Annotations;
}

/// Side-table mapping annotation types to values.
///
/// Structural equality of trees must not depend on attached annotations, so
/// `PartialEq` on this type compares nothing and always returns `true`.
#[derive(Default)]
pub struct Annotations {
    table: HashMap<TypeId, (Box<dyn AnnotationValue>, CloneFn)>,
}

impl Annotations {
    pub fn new() -> Annotations {
        Annotations {
            table: HashMap::new(),
        }
    }

    /// Stores `value`, replacing any previous annotation of the same type.
    pub fn set<T: Any + Clone + Send + Sync>(&mut self, value: T) {
        let boxed: Box<dyn AnnotationValue> = Box::new(value);
        eprintln!("storing type {:?} under key {:?}", boxed.as_any().type_id(), TypeId::of::<T>());
        self.table
            .insert(TypeId::of::<T>(), (boxed, clone_fn_for::<T>()));
    }

    /// Returns the annotation of type `T`, if present.
    pub fn get<'a, T: Any>(&'a self) -> Option<&'a T> {
        match self.table.get(&TypeId::of::<T>()) {
            Some((boxed, _)) => {
                let any_ref: &'a dyn Any = boxed.as_any();
                eprintln!("looking up {:?}, have {:?}", TypeId::of::<T>(), any_ref.type_id());
                any_ref.downcast_ref::<T>()
            }
            None => None,
        }
    }

    /// Returns the annotation of type `T` mutably, if present.
    pub fn get_mut<'a, T: Any>(&'a mut self) -> Option<&'a mut T> {
        match self.table.get_mut(&TypeId::of::<T>()) {
            Some((boxed, _)) => {
                let any_ref: &'a mut dyn Any = boxed.as_any_mut();
                any_ref.downcast_mut::<T>()
            }
            None => None,
        }
    }

    /// Returns whether an annotation of type `T` is present.
    pub fn has<T: Any>(&self) -> bool {
        self.table.contains_key(&TypeId::of::<T>())
    }

    /// Removes the annotation of type `T`, returning whether one was present.
    pub fn remove<T: Any>(&mut self) -> bool {
        self.table.remove(&TypeId::of::<T>()).is_some()
    }

    /// Clones every annotation of `src` into this table, replacing
    /// same-typed entries. Used to propagate source locations when lowering
    /// one tree into another.
    pub fn copy_from(&mut self, src: &Annotations) {
        for (key, (value, clone_fn)) in src.table.iter() {
            let cloned = clone_fn(value.as_ref());
            self.table.insert(*key, (cloned, *clone_fn));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

impl Clone for Annotations {
    fn clone(&self) -> Annotations {
        let mut cloned = Annotations::new();
        cloned.copy_from(self);
        cloned
    }
}

impl PartialEq for Annotations {
    fn eq(&self, _other: &Annotations) -> bool {
        true
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annotations({})", self.table.len())
    }
}
