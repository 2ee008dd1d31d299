//! Namespace-path resolution for stored assets.
//!
//! Every asset lives under a deterministic relative directory derived from
//! its [`Category`] and the caller-supplied [`Identifiers`]. Resolution is
//! pure: it never touches the filesystem and identical inputs always yield
//! the identical path.

mod naming;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

pub use self::naming::{StoredName, sanitize_filename};
use crate::error::{Error, Result};

/// Classification of an asset's purpose, determining its namespace shape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Per-user avatar images, stored under `avatars/{user}`.
    Avatar,
    /// Supplier-scoped assets, stored under `suppliers/{user}/{supplier}`.
    Supplier,
    /// Product-scoped assets, stored under `products/{user}/{supplier}`.
    ///
    /// The product id does not shape the directory; it participates only
    /// in selective deletion via stored-name matching.
    Product,
    /// Uncategorized assets stored directly under the storage root.
    Raw,
}

impl Category {
    /// Returns the identifier roles this category requires.
    pub const fn required_roles(self) -> &'static [Role] {
        match self {
            Self::Avatar => &[Role::User],
            Self::Supplier | Self::Product => &[Role::User, Role::Supplier],
            Self::Raw => &[],
        }
    }

    /// Returns the fixed leading path segment for this category, if any.
    const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Avatar => Some("avatars"),
            Self::Supplier => Some("suppliers"),
            Self::Product => Some("products"),
            Self::Raw => None,
        }
    }
}

/// The role an identifier plays within a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// The owning user.
    User,
    /// The supplier below a user.
    Supplier,
    /// The product below a supplier.
    Product,
}

/// Caller-supplied identifiers keyed by [`Role`].
///
/// All values are opaque tokens; the only validation this crate performs
/// is non-emptiness and the path-traversal guard in [`validate_identifier`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use = "identifiers do nothing unless resolved"]
pub struct Identifiers {
    user: Option<String>,
    supplier: Option<String>,
    product: Option<String>,
}

impl Identifiers {
    /// Creates an empty identifier set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the user identifier.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the supplier identifier.
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Sets the product identifier.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Returns the identifier for the given role, if present and non-empty.
    pub fn get(&self, role: Role) -> Option<&str> {
        let value = match role {
            Role::User => self.user.as_deref(),
            Role::Supplier => self.supplier.as_deref(),
            Role::Product => self.product.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Deterministic relative directory path derived from a category and its
/// identifiers.
///
/// The root namespace ([`Category::Raw`]) resolves to an empty segment
/// list and displays as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "paths do nothing unless joined onto a storage root"]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// Returns the ordered path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns whether this path addresses the storage root itself.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the path as a relative [`PathBuf`].
    pub fn to_rel_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Joins a stored file name onto this path, yielding the asset's
    /// root-relative location as used in public URLs.
    pub fn join_name(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", self, name)
        }
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Resolves the namespace path for `(category, identifiers)`.
///
/// Resolution is deterministic and side-effect free. Distinct identifier
/// tuples never collide because every identifier occupies its own path
/// segment.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingIdentifier`] if a role required by the
/// category is absent or empty, and [`ErrorKind::InvalidIdentifier`] if a
/// required identifier fails the traversal guard.
///
/// [`ErrorKind::MissingIdentifier`]: crate::ErrorKind::MissingIdentifier
/// [`ErrorKind::InvalidIdentifier`]: crate::ErrorKind::InvalidIdentifier
pub fn resolve(category: Category, identifiers: &Identifiers) -> Result<NamespacePath> {
    let roles = category.required_roles();
    let mut segments = Vec::with_capacity(roles.len() + 1);

    if let Some(prefix) = category.prefix() {
        segments.push(prefix.to_string());
    }

    for &role in roles {
        let value = identifiers.get(role).ok_or_else(|| {
            Error::missing_identifier().with_message(format!("{role} id is required"))
        })?;
        validate_identifier(role, value)?;
        segments.push(value.to_string());
    }

    Ok(NamespacePath { segments })
}

/// Checks an identifier against the path-traversal guard.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingIdentifier`] for empty values and
/// [`ErrorKind::InvalidIdentifier`] for values containing path separators,
/// NUL bytes, or parent-directory sequences.
///
/// [`ErrorKind::MissingIdentifier`]: crate::ErrorKind::MissingIdentifier
/// [`ErrorKind::InvalidIdentifier`]: crate::ErrorKind::InvalidIdentifier
pub fn validate_identifier(role: Role, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::missing_identifier().with_message(format!("{role} id is required")));
    }

    if value.contains('/') || value.contains('\\') || value.contains('\0') {
        return Err(Error::invalid_identifier()
            .with_message(format!("{role} id contains path separator characters")));
    }

    if value == "." || value.contains("..") {
        return Err(Error::invalid_identifier()
            .with_message(format!("{role} id contains directory traversal sequences")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn full_identifiers() -> Identifiers {
        Identifiers::new()
            .with_user("u-1")
            .with_supplier("s-2")
            .with_product("p-3")
    }

    #[test]
    fn resolve_is_deterministic() {
        for category in Category::iter() {
            let first = resolve(category, &full_identifiers()).unwrap();
            let second = resolve(category, &full_identifiers()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn category_shapes() {
        let ids = full_identifiers();
        assert_eq!(resolve(Category::Avatar, &ids).unwrap().to_string(), "avatars/u-1");
        assert_eq!(
            resolve(Category::Supplier, &ids).unwrap().to_string(),
            "suppliers/u-1/s-2"
        );
        assert_eq!(
            resolve(Category::Product, &ids).unwrap().to_string(),
            "products/u-1/s-2"
        );
        assert_eq!(resolve(Category::Raw, &ids).unwrap().to_string(), "");
    }

    #[test]
    fn raw_resolves_to_root() {
        let path = resolve(Category::Raw, &Identifiers::new()).unwrap();
        assert!(path.is_root());
        assert_eq!(path.join_name("file.png"), "file.png");
    }

    #[test]
    fn distinct_identifiers_never_collide() {
        let a = resolve(
            Category::Supplier,
            &Identifiers::new().with_user("u1").with_supplier("s1"),
        )
        .unwrap();
        let b = resolve(
            Category::Supplier,
            &Identifiers::new().with_user("u2").with_supplier("s1"),
        )
        .unwrap();
        let c = resolve(
            Category::Supplier,
            &Identifiers::new().with_user("u1").with_supplier("s2"),
        )
        .unwrap();

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn missing_required_roles_are_rejected() {
        let err = resolve(Category::Avatar, &Identifiers::new()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MissingIdentifier);

        let err = resolve(
            Category::Supplier,
            &Identifiers::new().with_user("u1"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MissingIdentifier);

        // Empty strings count as missing, not invalid.
        let err = resolve(Category::Avatar, &Identifiers::new().with_user("")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MissingIdentifier);
    }

    #[test]
    fn traversal_identifiers_are_rejected() {
        for bad in ["../etc", "a/b", "a\\b", "..", "a..b", ".", "nul\0byte"] {
            let err = resolve(
                Category::Avatar,
                &Identifiers::new().with_user(bad.to_string()),
            )
            .unwrap_err();
            assert_eq!(
                err.kind(),
                crate::ErrorKind::InvalidIdentifier,
                "identifier {bad:?} should be invalid"
            );
        }
    }

    #[test]
    fn product_id_does_not_shape_the_path() {
        let with_product = resolve(Category::Product, &full_identifiers()).unwrap();
        let without_product = resolve(
            Category::Product,
            &Identifiers::new().with_user("u-1").with_supplier("s-2"),
        )
        .unwrap();
        assert_eq!(with_product, without_product);
    }

    #[test]
    fn join_name_builds_relative_locations() {
        let path = resolve(Category::Avatar, &full_identifiers()).unwrap();
        assert_eq!(path.join_name("x.png"), "avatars/u-1/x.png");
        assert_eq!(path.to_rel_path(), PathBuf::from("avatars/u-1"));
    }
}
