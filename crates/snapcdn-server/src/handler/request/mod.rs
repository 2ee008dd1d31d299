//! Request bodies for all handler routes.

use serde::Deserialize;
use snapcdn_core::namespace::Identifiers;

/// Body of a supplier subtree deletion.
///
/// Fields are optional at the wire level so that absence surfaces as a
/// `missing_identifier` validation error rather than a deserialization
/// failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSupplierRequest {
    /// The owning user.
    pub user_id: Option<String>,
    /// The supplier whose subtree is removed.
    pub supplier_id: Option<String>,
}

impl DeleteSupplierRequest {
    /// Builds the identifier set for namespace resolution.
    pub fn identifiers(&self) -> Identifiers {
        let mut identifiers = Identifiers::new();
        if let Some(user_id) = self.user_id.as_deref() {
            identifiers = identifiers.with_user(user_id);
        }
        if let Some(supplier_id) = self.supplier_id.as_deref() {
            identifiers = identifiers.with_supplier(supplier_id);
        }
        identifiers
    }
}

/// Body of a selective product deletion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    /// The owning user.
    pub user_id: Option<String>,
    /// The supplier whose product directory is swept.
    pub supplier_id: Option<String>,
    /// Product identifier matched as a substring of stored names.
    pub product_id: Option<String>,
}

impl DeleteProductRequest {
    /// Builds the identifier set for namespace resolution and matching.
    pub fn identifiers(&self) -> Identifiers {
        let mut identifiers = Identifiers::new();
        if let Some(user_id) = self.user_id.as_deref() {
            identifiers = identifiers.with_user(user_id);
        }
        if let Some(supplier_id) = self.supplier_id.as_deref() {
            identifiers = identifiers.with_supplier(supplier_id);
        }
        if let Some(product_id) = self.product_id.as_deref() {
            identifiers = identifiers.with_product(product_id);
        }
        identifiers
    }
}

#[cfg(test)]
mod tests {
    use snapcdn_core::namespace::Role;

    use super::*;

    #[test]
    fn delete_requests_deserialize_camel_case() {
        let request: DeleteProductRequest = serde_json::from_str(
            r#"{"userId":"u1","supplierId":"s1","productId":"p1"}"#,
        )
        .unwrap();

        let identifiers = request.identifiers();
        assert_eq!(identifiers.get(Role::User), Some("u1"));
        assert_eq!(identifiers.get(Role::Supplier), Some("s1"));
        assert_eq!(identifiers.get(Role::Product), Some("p1"));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let request: DeleteSupplierRequest = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        let identifiers = request.identifiers();
        assert_eq!(identifiers.get(Role::User), Some("u1"));
        assert_eq!(identifiers.get(Role::Supplier), None);
    }
}
