//! `#[derive(Serializable)]` against the runtime.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::derive::Serializable;
use crate::{ConversionError, LoadError, LoadMode, Serializable as _, ValueKind};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
enum Role {
    Guest,
    Member,
    Admin,
}

mod role_code {
    use alloc::string::String;

    use super::Role;
    use crate::ConversionError;

    pub fn serialize(role: &Role) -> Result<String, ConversionError> {
        Ok(String::from(match role {
            Role::Guest => "g",
            Role::Member => "m",
            Role::Admin => "a",
        }))
    }

    pub fn deserialize(text: &str, role: &mut Role) -> Result<(), ConversionError> {
        *role = match text {
            "g" => Role::Guest,
            "m" => Role::Member,
            "a" => Role::Admin,
            _ => return Err(ConversionError::custom("unknown role code")),
        };
        Ok(())
    }
}

#[allow(clippy::ptr_arg, reason = "matches `SerializeFn<String>`")]
fn upper(text: &String) -> Result<String, ConversionError> {
    Ok(text.to_uppercase())
}

fn lower(text: &str, value: &mut String) -> Result<(), ConversionError> {
    *value = text.to_lowercase();
    Ok(())
}

#[derive(Serializable, Debug, Clone, PartialEq)]
struct Address {
    street: String,
    number: u16,
}

#[derive(Serializable, Debug, Clone, PartialEq)]
struct Account {
    #[serial(rename = "Id")]
    id: u64,
    name: String,
    #[serial(with = role_code)]
    role: Role,
    #[serial(json)]
    backup_role: Role,
    #[serial(json)]
    tags: Vec<String>,
    #[serial(serialize_with = upper)]
    nick: String,
    #[serial(deserialize_with = lower)]
    email: String,
    address: Address,
    active: bool,
    #[serial(skip)]
    session: Option<u32>,
}

fn account() -> Account {
    Account {
        id: 7,
        name: String::from("Ada"),
        role: Role::Admin,
        backup_role: Role::Member,
        tags: vec![String::from("ops"), String::from("dev")],
        nick: String::from("ada"),
        email: String::from("ada@example.com"),
        address: Address {
            street: String::from("Main"),
            number: 12,
        },
        active: true,
        session: Some(99),
    }
}

fn blank_account() -> Account {
    Account {
        id: 0,
        name: String::new(),
        role: Role::Guest,
        backup_role: Role::Guest,
        tags: Vec::new(),
        nick: String::new(),
        email: String::new(),
        address: Address {
            street: String::new(),
            number: 0,
        },
        active: false,
        session: None,
    }
}

#[derive(Serializable, Debug, Clone, PartialEq, Default)]
struct Tagged<T> {
    label: String,
    value: T,
}

#[derive(Serializable, Debug, Clone, PartialEq)]
struct Empty {}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn registration_follows_declaration() {
    let fields = Account::fields();
    assert_eq!(
        fields.names().collect::<Vec<_>>(),
        ["Id", "name", "role", "backup_role", "tags", "nick", "email", "address", "active"]
    );

    let kinds: Vec<ValueKind> = fields.iter().map(|field| field.kind()).collect();
    assert_eq!(
        kinds,
        [
            ValueKind::Fundamental,
            ValueKind::Text,
            ValueKind::Custom,
            ValueKind::Custom,
            ValueKind::Custom,
            ValueKind::Custom,
            ValueKind::Custom,
            ValueKind::Composite,
            ValueKind::Fundamental,
        ]
    );
}

#[test]
fn save_output() {
    assert_eq!(
        account().save().unwrap(),
        concat!(
            r#"{"Id":"7","name":"Ada","role":"a","backup_role":"\"Member\"","#,
            r#""tags":"[\"ops\",\"dev\"]","nick":"ADA","email":"ada@example.com","#,
            r#""address":"{\"street\":\"Main\",\"number\":\"12\"}","active":"1"}"#,
        )
    );
}

#[test]
fn round_trip_skips_skipped_fields() {
    let saved = account().save().unwrap();

    let mut loaded = blank_account();
    loaded.load(&saved).unwrap();

    // `serialize_with = upper` has no matching deserializer.
    assert_eq!(loaded.nick, "ADA");
    assert_eq!(loaded.session, None);

    let expected = Account {
        nick: String::from("ADA"),
        session: None,
        ..account()
    };
    assert_eq!(loaded, expected);
}

#[test]
fn custom_deserializer_is_used() {
    let mut value = account();
    let mut document = value.to_document().unwrap();
    document.insert("email", "ADA@EXAMPLE.ORG");

    value.load_document(&document, LoadMode::Strict).unwrap();
    assert_eq!(value.email, "ada@example.org");
}

#[test]
fn custom_conversion_errors_are_atomic() {
    let mut value = account();
    let mut document = value.to_document().unwrap();
    document.insert("name", "Grace");
    document.insert("role", "x");

    let err = value.load_document(&document, LoadMode::Strict).unwrap_err();
    assert_eq!(
        err,
        LoadError::Conversion {
            field: "role".into(),
            source: ConversionError::custom("unknown role code"),
        }
    );
    assert_eq!(value, account());
}

#[test]
fn renamed_key_is_required() {
    let mut value = account();
    let mut document = value.to_document().unwrap();
    document.insert("id", "8");

    let saved = document.to_json().unwrap().replace("\"Id\"", "\"Other\"");
    let err = value.load(&saved).unwrap_err();
    assert_eq!(err, LoadError::MissingField { field: "Id".into() });
    assert_eq!(value, account());
}

#[test]
fn lenient_partial_update() {
    let mut value = account();
    value
        .load_with(r#"{"name":"Grace","tags":"[]"}"#, LoadMode::Lenient)
        .unwrap();
    assert_eq!(value.name, "Grace");
    assert!(value.tags.is_empty());
    assert_eq!(value.address, account().address);
    assert_eq!(value.session, Some(99));
}

#[test]
fn generic_struct() {
    let number = Tagged {
        label: String::from("n"),
        value: -3_i16,
    };
    let nested = Tagged {
        label: String::from("outer"),
        value: Tagged {
            label: String::from("inner"),
            value: 'z',
        },
    };

    assert_eq!(number.save().unwrap(), r#"{"label":"n","value":"-3"}"#);
    assert_eq!(
        nested.save().unwrap(),
        r#"{"label":"outer","value":"{\"label\":\"inner\",\"value\":\"122\"}"}"#
    );

    let mut loaded = Tagged::<Tagged<char>>::default();
    loaded.load(&nested.save().unwrap()).unwrap();
    assert_eq!(loaded, nested);

    assert!(!core::ptr::addr_eq(
        Tagged::<i16>::fields(),
        Tagged::<char>::fields(),
    ));
}

#[test]
fn struct_without_fields() {
    assert!(Empty::fields().is_empty());
    assert_eq!(Empty {}.save().unwrap(), "{}");

    let mut empty = Empty {};
    empty.load("{}").unwrap();
    empty.load(r#"{"stale":"1"}"#).unwrap();
    assert!(matches!(
        empty.load("\"{}\""),
        Err(LoadError::MalformedDocument { .. })
    ));
}
