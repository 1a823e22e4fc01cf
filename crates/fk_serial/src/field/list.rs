use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::slice;

use super::{Field, FieldHandle, GetFn, GetMutFn};
use crate::convert::{Conversion, FieldValue};

/// The ordered field inventory of an owner type.
///
/// Order of registration is the order of [`Serializable::save`] output.
/// Names are unique; registering a name twice panics.
///
/// A list is built once per type and kept in a static cell, see
/// [`NonGenericFieldListCell`] and [`GenericFieldListCell`].
///
/// # Examples
///
/// ```
/// use fk_serial::{Conversion, FieldList, ValueKind};
///
/// struct Item { id: u64, name: String, price: u32 }
///
/// fn cents(value: &u32) -> Result<String, fk_serial::ConversionError> {
///     Ok(format!("{}.{:02}", value / 100, value % 100))
/// }
///
/// let list = FieldList::<Item>::new()
///     .field("id", |i: &Item| &i.id, |i: &mut Item| &mut i.id)
///     .field("name", |i: &Item| &i.name, |i: &mut Item| &mut i.name)
///     .custom(
///         "price",
///         |i: &Item| &i.price,
///         |i: &mut Item| &mut i.price,
///         Conversion::resolve().with_serializer(cents),
///     );
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.names().collect::<Vec<_>>(), ["id", "name", "price"]);
/// assert_eq!(list.get("price").unwrap().kind(), ValueKind::Custom);
/// ```
///
/// [`Serializable::save`]: crate::Serializable::save
/// [`NonGenericFieldListCell`]: crate::NonGenericFieldListCell
/// [`GenericFieldListCell`]: crate::GenericFieldListCell
pub struct FieldList<O> {
    fields: Vec<Box<dyn FieldHandle<O>>>,
}

impl<O: 'static> FieldList<O> {
    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a handle.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same name is already registered.
    pub fn register(&mut self, handle: impl FieldHandle<O>) {
        self.register_boxed(Box::new(handle));
    }

    /// Appends an already boxed handle.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same name is already registered.
    pub fn register_boxed(&mut self, handle: Box<dyn FieldHandle<O>>) {
        assert!(
            self.get(handle.name()).is_none(),
            "field `{}` is registered twice on `{}`",
            handle.name(),
            core::any::type_name::<O>(),
        );
        self.fields.push(handle);
    }

    /// Builder form of [`register`](Self::register).
    #[inline]
    pub fn with(mut self, handle: impl FieldHandle<O>) -> Self {
        self.register(handle);
        self
    }

    /// Registers a field using the default conversion of `T`.
    #[inline]
    pub fn field<T: FieldValue>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: GetFn<O, T>,
        get_mut: GetMutFn<O, T>,
    ) -> Self {
        self.with(Field::new(name, get, get_mut))
    }

    /// Registers a field with an explicit conversion.
    #[inline]
    pub fn custom<T: Clone + 'static>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: GetFn<O, T>,
        get_mut: GetMutFn<O, T>,
        conversion: Conversion<T>,
    ) -> Self {
        self.with(Field::with_conversion(name, get, get_mut, conversion))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the handle registered under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn FieldHandle<O>> {
        self.fields
            .iter()
            .find(|handle| handle.name() == name)
            .map(Box::as_ref)
    }

    /// Iterates handles in registration order.
    #[inline]
    pub fn iter(&self) -> FieldListIter<'_, O> {
        FieldListIter {
            inner: self.fields.iter(),
        }
    }

    /// Field names in registration order.
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|handle| &**handle.name())
    }
}

impl<O: 'static> Default for FieldList<O> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<O: 'static> fmt::Debug for FieldList<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.fields
                    .iter()
                    .map(|handle| (handle.name(), handle.type_name())),
            )
            .finish()
    }
}

impl<'a, O: 'static> IntoIterator for &'a FieldList<O> {
    type Item = &'a dyn FieldHandle<O>;
    type IntoIter = FieldListIter<'a, O>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// -----------------------------------------------------------------------------
// FieldListIter

/// Iterator over the handles of a [`FieldList`].
pub struct FieldListIter<'a, O> {
    inner: slice::Iter<'a, Box<dyn FieldHandle<O>>>,
}

impl<'a, O: 'static> Iterator for FieldListIter<'a, O> {
    type Item = &'a dyn FieldHandle<O>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Box::as_ref)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<O: 'static> ExactSizeIterator for FieldListIter<'_, O> {}

impl<O: 'static> DoubleEndedIterator for FieldListIter<'_, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Box::as_ref)
    }
}

// -----------------------------------------------------------------------------
// Tests
