//! Interned construct names.
//!
//! Every declared name and every `type`/`base`/`ref` pointer read from a schema
//! is stored as a [`Name`], a string-interned symbol that is cheap to copy,
//! hash and compare.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all [`Name`] values.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`, so independent catalog builds may run on
/// separate threads.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An interned schema name such as `NX_CHAR` or `groupType`.
///
/// # Examples
///
/// ```
/// use nxschema_core::name::Name;
///
/// let a = Name::new("NX_BOOLEAN");
/// let b = Name::new("NX_BOOLEAN");
/// assert_eq!(a, b);
/// assert_eq!(a, "NX_BOOLEAN");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name(DefaultSymbol);

impl Name {
    /// Interns `name` and returns its symbol.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Interns a qualified name with its namespace prefix removed.
    ///
    /// Schema documents reference their own constructs through a prefix
    /// (`nx:NX_CHAR`); the cross-reference is keyed by the local part only.
    ///
    /// # Examples
    ///
    /// ```
    /// use nxschema_core::name::Name;
    ///
    /// assert_eq!(Name::local("nx:NX_CHAR"), "NX_CHAR");
    /// assert_eq!(Name::local("NX_CHAR"), "NX_CHAR");
    /// ```
    pub fn local(qualified: &str) -> Self {
        let local = qualified.rsplit(':').next().unwrap_or(qualified);
        Self::new(local)
    }

    /// Returns an owned copy of the interned string.
    pub fn as_string(&self) -> String {
        self.with_str(str::to_owned)
    }

    fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner();
        // Symbols are only ever produced by this interner.
        f(interner.resolve(self.0).unwrap_or_default())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_string();
        f.write_str(&value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_string();
        write!(f, "Name({value:?})")
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|value| value == other)
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new_interns_equal_strings() {
        let a = Name::new("NX_FLOAT");
        let b = Name::new("NX_FLOAT");
        let c = Name::new("NX_INT");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "NX_FLOAT");
    }

    #[test]
    fn test_local_strips_prefix() {
        assert_eq!(Name::local("nx:groupType"), "groupType");
        assert_eq!(Name::local("xs:string"), "string");
        assert_eq!(Name::local("plain"), "plain");
        assert_eq!(Name::local("nx:groupType"), Name::new("groupType"));
    }

    #[test]
    fn test_display_and_debug() {
        let name = Name::new("validItemName");
        assert_eq!(name.to_string(), "validItemName");
        assert_eq!(format!("{name:?}"), "Name(\"validItemName\")");
    }

    #[test]
    fn test_hash_and_eq() {
        let mut map = HashMap::new();
        map.insert(Name::new("key1"), 1);
        map.insert(Name::new("key2"), 2);

        assert_eq!(map.get(&Name::new("key1")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let name = Name::new("attributeType");
        let owned = String::from("attributeType");

        assert!(name == owned.as_str());
        assert!(name != "fieldType");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_local_ignores_prefix(prefix: &str, local: &str) -> Result<(), TestCaseError> {
        let qualified = format!("{prefix}:{local}");
        prop_assert_eq!(Name::local(&qualified), Name::new(local));
        prop_assert_eq!(Name::local(local), Name::new(local));
        Ok(())
    }

    proptest! {
        #[test]
        fn local_ignores_prefix(prefix in "[a-z]{1,6}", local in "[A-Za-z_][A-Za-z0-9_]{0,20}") {
            check_local_ignores_prefix(&prefix, &local)?;
        }
    }
}
