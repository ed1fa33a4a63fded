//! Storage namespace names.

use std::fmt;

use serde::{Deserialize, Serialize};
use tally_shared::types::TenantId;

use super::error::TenancyError;

/// Prefix shared by every tenant namespace.
pub const SCHEMA_PREFIX: &str = "tenant_";

/// `PostgreSQL` truncates identifiers longer than this.
const MAX_IDENTIFIER_LEN: usize = 63;

/// A validated schema name holding one tenant's tables.
///
/// Only lowercase ASCII letters, digits, and underscores are accepted, and the
/// name must start with a letter or underscore. This makes the name safe to
/// splice into DDL and `SET LOCAL search_path` statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaName(String);

impl SchemaName {
    /// Derives the namespace for a newly provisioned tenant.
    #[must_use]
    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self(format!("{SCHEMA_PREFIX}{}", tenant_id.into_inner().simple()))
    }

    /// Validates a stored schema name.
    ///
    /// # Errors
    ///
    /// Returns `TenancyError::InvalidSchemaName` if the name is not a safe identifier.
    pub fn parse(name: &str) -> Result<Self, TenancyError> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
            Ok(Self(name.to_string()))
        } else {
            Err(TenancyError::InvalidSchemaName(name.to_string()))
        }
    }

    /// Returns the bare schema name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name as a double-quoted SQL identifier.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SchemaName {
    type Error = TenancyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SchemaName> for String {
    fn from(value: SchemaName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[test]
    fn test_for_tenant_is_valid_identifier() {
        let id = TenantId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap());
        let schema = SchemaName::for_tenant(id);

        assert_eq!(schema.as_str(), "tenant_550e8400e29b41d4a716446655440000");
        assert!(SchemaName::parse(schema.as_str()).is_ok());
    }

    #[test]
    fn test_quoted() {
        let schema = SchemaName::parse("tenant_abc").unwrap();
        assert_eq!(schema.quoted(), "\"tenant_abc\"");
    }

    #[rstest]
    #[case("")]
    #[case("1tenant")]
    #[case("Tenant_abc")]
    #[case("tenant-abc")]
    #[case("tenant_abc\"; DROP SCHEMA public; --")]
    #[case("tenant abc")]
    fn test_parse_rejects_unsafe_names(#[case] name: &str) {
        assert!(matches!(
            SchemaName::parse(name),
            Err(TenancyError::InvalidSchemaName(_))
        ));
    }

    #[test]
    fn test_parse_rejects_overlong_names() {
        let name = format!("t{}", "a".repeat(MAX_IDENTIFIER_LEN));
        assert!(SchemaName::parse(&name).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<SchemaName, _> = serde_json::from_str("\"tenant_ok\"");
        assert!(ok.is_ok());

        let bad: Result<SchemaName, _> = serde_json::from_str("\"public; drop\"");
        assert!(bad.is_err());
    }
}
