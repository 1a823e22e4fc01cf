//! Static storage for field lists.
//!
//! A [`Serializable`](crate::Serializable) impl returns
//! `&'static FieldList<Self>`, built on first use and shared by every
//! instance afterwards.
//!
//! - [`NonGenericFieldListCell`] is a plain [`OnceLock`], for types without
//!   generic parameters.
//! - [`GenericFieldListCell`] is needed when the impl is generic: a `static`
//!   inside a generic function is shared by every instantiation, so lists are
//!   kept per [`TypeId`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::hash::{BuildHasher, Hasher};
use std::sync::{OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;

use crate::FieldList;

// -----------------------------------------------------------------------------
// NonGenericFieldListCell

/// Static storage of the field list of a non-generic type.
///
/// # Examples
///
/// ```
/// use fk_serial::{FieldList, NonGenericFieldListCell, Serializable};
///
/// #[derive(Clone)]
/// struct Size { w: u32, h: u32 }
///
/// impl Serializable for Size {
///     fn fields() -> &'static FieldList<Self> {
///         static CELL: NonGenericFieldListCell<Size> = NonGenericFieldListCell::new();
///         CELL.get_or_init(|| {
///             FieldList::new()
///                 .field("w", |s: &Size| &s.w, |s: &mut Size| &mut s.w)
///                 .field("h", |s: &Size| &s.h, |s: &mut Size| &mut s.h)
///         })
///     }
/// }
///
/// assert_eq!(Size { w: 2, h: 3 }.save().unwrap(), r#"{"w":"2","h":"3"}"#);
/// assert!(core::ptr::eq(Size::fields(), Size::fields()));
/// ```
pub struct NonGenericFieldListCell<O: 'static>(OnceLock<FieldList<O>>);

impl<O: 'static> NonGenericFieldListCell<O> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored list, building it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &FieldList<O>
    where
        F: FnOnce() -> FieldList<O>,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericFieldListCell

type ErasedList = &'static (dyn Any + Send + Sync);

/// Static storage of field lists for generic types.
///
/// Each list is leaked on first insertion and lives for the rest of the
/// program, one per concrete owner type.
///
/// # Examples
///
/// ```
/// use fk_serial::{FieldList, FieldValue, GenericFieldListCell, Serializable};
///
/// #[derive(Clone)]
/// struct Pair<T> { left: T, right: T }
///
/// impl<T: FieldValue> Serializable for Pair<T> {
///     fn fields() -> &'static FieldList<Self> {
///         static CELL: GenericFieldListCell = GenericFieldListCell::new();
///         CELL.get_or_insert::<Self>(|| {
///             FieldList::new()
///                 .field("left", |p: &Self| &p.left, |p: &mut Self| &mut p.left)
///                 .field("right", |p: &Self| &p.right, |p: &mut Self| &mut p.right)
///         })
///     }
/// }
///
/// let ints = Pair { left: 1_u8, right: 2 };
/// let words = Pair { left: String::from("a"), right: String::from("b") };
/// assert_eq!(ints.save().unwrap(), r#"{"left":"1","right":"2"}"#);
/// assert_eq!(words.save().unwrap(), r#"{"left":"a","right":"b"}"#);
/// ```
pub struct GenericFieldListCell(RwLock<HashMap<TypeId, ErasedList, TypeIdHashState>>);

impl GenericFieldListCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(TypeIdHashState)))
    }

    /// Returns the list stored for `O`, building it with `f` on first access.
    ///
    /// `f` runs outside the lock, so it may itself look up other lists in
    /// the same cell. If two threads race, the first insertion wins.
    #[inline]
    pub fn get_or_insert<O: 'static>(
        &self,
        f: impl FnOnce() -> FieldList<O>,
    ) -> &'static FieldList<O> {
        let type_id = TypeId::of::<O>();
        let erased = match self.get_by_type_id(type_id) {
            Some(erased) => erased,
            None => {
                let list: &'static FieldList<O> = Box::leak(Box::new(f()));
                self.insert_by_type_id(type_id, list)
            }
        };
        downcast(erased)
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<ErasedList> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, list: ErasedList) -> ErasedList {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert(list)
    }
}

fn downcast<O: 'static>(erased: ErasedList) -> &'static FieldList<O> {
    match erased.downcast_ref::<FieldList<O>>() {
        Some(list) => list,
        None => unreachable!("list stored under the `TypeId` of another type"),
    }
}

// Handles never hold an `O`, so a list is shareable for any owner type.
const _: () = {
    const fn assert_shareable<T: Send + Sync>() {}
    assert_shareable::<FieldList<core::cell::Cell<u8>>>();
};

// -----------------------------------------------------------------------------
// TypeIdHashState

/// `TypeId` is already a hash; pass it through unchanged.
#[derive(Clone, Copy, Default)]
struct TypeIdHashState;

#[derive(Default)]
struct TypeIdHasher {
    hash: u64,
}

impl BuildHasher for TypeIdHashState {
    type Hasher = TypeIdHasher;

    #[inline]
    fn build_hasher(&self) -> TypeIdHasher {
        TypeIdHasher { hash: 0 }
    }
}

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(u64::from(*byte));
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::thread;

    use super::{GenericFieldListCell, NonGenericFieldListCell};
    use crate::FieldList;

    struct Wrapper<T> {
        value: T,
    }

    fn wrapper_fields<T: crate::FieldValue>(
        cell: &GenericFieldListCell,
        name: &'static str,
    ) -> &'static FieldList<Wrapper<T>> {
        cell.get_or_insert::<Wrapper<T>>(|| {
            FieldList::new().field(
                name,
                |w: &Wrapper<T>| &w.value,
                |w: &mut Wrapper<T>| &mut w.value,
            )
        })
    }

    #[test]
    fn non_generic_builds_once() {
        static CELL: NonGenericFieldListCell<Wrapper<u8>> = NonGenericFieldListCell::new();

        let first = CELL.get_or_init(|| {
            FieldList::new().field("v", |w: &Wrapper<u8>| &w.value, |w: &mut Wrapper<u8>| {
                &mut w.value
            })
        });
        let second = CELL.get_or_init(|| unreachable!());
        assert!(core::ptr::eq(first, second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn generic_keeps_one_list_per_type() {
        static CELL: GenericFieldListCell = GenericFieldListCell::new();

        let ints = wrapper_fields::<i32>(&CELL, "int");
        let texts = wrapper_fields::<String>(&CELL, "text");
        let ints_again = wrapper_fields::<i32>(&CELL, "ignored");

        assert!(core::ptr::eq(ints, ints_again));
        assert_eq!(ints.names().collect::<Vec<_>>(), ["int"]);
        assert_eq!(texts.names().collect::<Vec<_>>(), ["text"]);
    }

    #[test]
    fn generic_is_shared_across_threads() {
        static CELL: GenericFieldListCell = GenericFieldListCell::new();

        let addresses: Vec<usize> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    core::ptr::from_ref(wrapper_fields::<u64>(&CELL, "value")) as usize
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
