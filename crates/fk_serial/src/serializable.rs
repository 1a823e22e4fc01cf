use alloc::string::String;
use alloc::vec::Vec;
use core::any::type_name;

use crate::{Document, FieldList, LoadError, SaveError, StagedField};

// -----------------------------------------------------------------------------
// LoadMode

/// How [`Serializable::load_with`] treats registered fields that are absent
/// from the input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Every registered field must be present.
    #[default]
    Strict,
    /// Absent fields keep their current value.
    Lenient,
}

// -----------------------------------------------------------------------------
// Serializable

/// A type that saves to and loads from a flat document of its registered
/// fields.
///
/// Only [`fields`](Self::fields) has to be provided, usually through
/// `#[derive(Serializable)]`.
///
/// # Load is all or nothing
///
/// The input is parsed and every field is converted into a scratch value
/// before anything is written back. If any step fails, `self` is exactly as
/// it was before the call.
///
/// # Examples
///
/// ```
/// use fk_serial::{FieldList, LoadError, LoadMode, NonGenericFieldListCell, Serializable};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Window { title: String, width: u32, height: u32 }
///
/// impl Serializable for Window {
///     fn fields() -> &'static FieldList<Self> {
///         static CELL: NonGenericFieldListCell<Window> = NonGenericFieldListCell::new();
///         CELL.get_or_init(|| {
///             FieldList::new()
///                 .field("title", |w: &Window| &w.title, |w: &mut Window| &mut w.title)
///                 .field("width", |w: &Window| &w.width, |w: &mut Window| &mut w.width)
///                 .field("height", |w: &Window| &w.height, |w: &mut Window| &mut w.height)
///         })
///     }
/// }
///
/// let mut window = Window { title: "main".into(), width: 800, height: 600 };
///
/// let err = window.load(r#"{"title":"side","width":"1024"}"#).unwrap_err();
/// assert_eq!(err, LoadError::MissingField { field: "height".into() });
/// assert_eq!(window.title, "main");
///
/// window.load_with(r#"{"title":"side","width":"1024"}"#, LoadMode::Lenient).unwrap();
/// assert_eq!(window, Window { title: "side".into(), width: 1024, height: 600 });
/// ```
pub trait Serializable: Sized + 'static {
    /// The registered fields of this type, in save order.
    fn fields() -> &'static FieldList<Self>;

    /// Builds the document without encoding it.
    fn to_document(&self) -> Result<Document, SaveError> {
        save_document(self, Self::fields())
    }

    /// Encodes every registered field as a compact JSON object.
    ///
    /// Keys appear in registration order, so equal objects always produce
    /// identical text.
    fn save(&self) -> Result<String, SaveError> {
        self.to_document()?.to_json()
    }

    /// Like [`save`](Self::save), with indentation.
    fn save_pretty(&self) -> Result<String, SaveError> {
        self.to_document()?.to_json_pretty()
    }

    /// Strict load, see [`LoadMode::Strict`].
    fn load(&mut self, input: &str) -> Result<(), LoadError> {
        self.load_with(input, LoadMode::Strict)
    }

    /// Parses `input` and loads it with the given mode.
    fn load_with(&mut self, input: &str, mode: LoadMode) -> Result<(), LoadError> {
        let document = Document::parse(input)?;
        self.load_document(&document, mode)
    }

    /// Loads an already parsed document.
    fn load_document(&mut self, document: &Document, mode: LoadMode) -> Result<(), LoadError> {
        load_document(self, Self::fields(), document, mode)
    }
}

fn save_document<O: 'static>(owner: &O, fields: &FieldList<O>) -> Result<Document, SaveError> {
    log::trace!("saving {} fields of `{}`", fields.len(), type_name::<O>());

    let mut document = Document::new();
    for handle in fields {
        let text = handle.save(owner).map_err(|source| SaveError::Conversion {
            field: handle.name().clone(),
            source,
        })?;
        document.insert(&**handle.name(), text);
    }
    Ok(document)
}

fn load_document<O: 'static>(
    owner: &mut O,
    fields: &FieldList<O>,
    document: &Document,
    mode: LoadMode,
) -> Result<(), LoadError> {
    log::trace!(
        "loading {} fields of `{}` ({mode:?})",
        fields.len(),
        type_name::<O>(),
    );

    let mut staged: Vec<StagedField<O>> = Vec::with_capacity(fields.len());
    for handle in fields {
        let Some(text) = document.get(handle.name()) else {
            match mode {
                LoadMode::Strict => {
                    return Err(LoadError::MissingField {
                        field: handle.name().clone(),
                    });
                }
                LoadMode::Lenient => {
                    log::debug!(
                        "field `{}` of `{}` is absent, keeping current value",
                        handle.name(),
                        type_name::<O>(),
                    );
                    continue;
                }
            }
        };

        let value = handle
            .stage(owner, text)
            .map_err(|source| LoadError::Conversion {
                field: handle.name().clone(),
                source,
            })?;
        staged.push(value);
    }

    if log::log_enabled!(log::Level::Debug) {
        for key in document.keys().filter(|key| fields.get(key).is_none()) {
            log::debug!("ignoring unknown key `{key}` for `{}`", type_name::<O>());
        }
    }

    if mode == LoadMode::Lenient && staged.is_empty() && !fields.is_empty() {
        log::warn!(
            "lenient load of `{}` matched none of its {} fields",
            type_name::<O>(),
            fields.len(),
        );
    }

    for value in staged {
        value.apply(owner);
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
