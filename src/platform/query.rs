//! Directory queries
//!
//! Resolves named entities (user, permission set) to their record ids via
//! equality predicates over single fields.

use super::client::RestClient;
use super::errors::PlatformError;

/// Escape a value for inclusion in a SOQL single-quoted string literal.
///
/// Interpolated values are exact-match predicates; a username containing a
/// quote must not be able to close the literal early. Backslash first, then
/// quote, per SOQL escape rules.
pub(crate) fn escape_soql_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

impl RestClient {
    /// Return the id of the first record of `object` whose `field` exactly
    /// equals `value`. Zero matches is `NotFound`, which is fatal for the
    /// callers here since later steps need the id.
    pub async fn find_id_by_field(
        &self,
        object: &str,
        field: &str,
        value: &str,
        token: &str,
    ) -> Result<String, PlatformError> {
        let soql = format!(
            "SELECT Id FROM {} WHERE {} = '{}'",
            object,
            field,
            escape_soql_literal(value)
        );
        let result = self.run_query(object, soql, token).await?;

        result
            .records
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| PlatformError::NotFound {
                object: object.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            })
    }
}
