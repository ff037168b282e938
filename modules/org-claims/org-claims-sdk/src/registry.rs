use std::collections::HashMap;
use std::sync::Arc;

use crate::api::TokenClaimMapper;
use crate::error::MapperError;
use crate::models::{ClaimSet, MapperModel, TokenKind, UserSession};

/// Registry of available claim mapper providers
#[derive(Default)]
pub struct MapperRegistry {
    mappers: HashMap<String, Arc<dyn TokenClaimMapper>>,
}

impl MapperRegistry {
    /// Register a provider under its own id, replacing any previous one
    pub fn register(&mut self, mapper: Arc<dyn TokenClaimMapper>) {
        let id = mapper.id().to_owned();
        if self.mappers.insert(id.clone(), mapper).is_some() {
            tracing::debug!(provider_id = %id, "replaced claim mapper provider");
        }
    }

    /// Get a provider by id
    ///
    /// # Errors
    ///
    /// Returns `MapperError::UnknownMapper` if nothing is registered under `id`.
    pub fn get(&self, id: &str) -> Result<&Arc<dyn TokenClaimMapper>, MapperError> {
        self.mappers
            .get(id)
            .ok_or_else(|| MapperError::UnknownMapper(id.to_owned()))
    }

    /// Check if a provider exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.mappers.contains_key(id)
    }

    /// All registered provider ids, sorted
    #[must_use]
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.mappers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Run every configured mapper instance against one token.
    ///
    /// Instances whose provider is not registered are skipped. Returns the
    /// number of mappers that ran.
    pub async fn apply(
        &self,
        kind: TokenKind,
        claims: &mut ClaimSet,
        models: &[MapperModel],
        session: &UserSession,
    ) -> usize {
        let mut applied = 0;
        for model in models {
            match self.get(&model.provider_id) {
                Ok(mapper) => {
                    if mapper.transform(kind, claims, model, session).await {
                        applied += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(mapper = %model.name, error = %e, "skipping claim mapper");
                }
            }
        }
        applied
    }
}
