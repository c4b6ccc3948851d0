use anyhow::Result;

use crate::store::SessionStore;

/// Resolve a tracking id to its redirect target.
///
/// Pure lookup; deleted and expired ids are indistinguishable from ids
/// that never existed.
pub async fn resolve(store: &dyn SessionStore, id: &str) -> Result<Option<String>> {
    Ok(store.get(id).await?.map(|session| session.target_url))
}
