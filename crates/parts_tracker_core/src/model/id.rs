//! Identifier generation for suppliers and projects.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Supplier identifier. Legacy documents carry ids such as `supplier1`, so
/// ids are kept as opaque strings.
pub type SupplierId = String;
/// Project identifier.
pub type ProjectId = String;

const RANDOM_SUFFIX_LEN: usize = 7;

/// Generates an id of the form `id-<unix millis>-<7 random chars>`.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    format!("id-{millis}-{}", &random[..RANDOM_SUFFIX_LEN])
}
