//! The service object.

use crate::error::{ApiError, ApiResult};
use crate::token::TokenSigner;
use parish_core::{Entity, FieldMap, Kind, Store};
use serde_json::Value;
use std::sync::Arc;

/// The administrative service.
///
/// Wraps a shared [`Store`] and a [`TokenSigner`] and exposes one
/// method per operation of the surface; the route modules under this
/// crate each contribute an `impl` block. A web layer maps requests
/// onto these methods one-to-one.
#[derive(Debug, Clone)]
pub struct Service {
    store: Arc<Store>,
    tokens: TokenSigner,
}

impl Service {
    /// Creates a service with the default token lifetime.
    #[must_use]
    pub fn new(store: Arc<Store>, secret: Vec<u8>) -> Self {
        Self {
            store,
            tokens: TokenSigner::new(secret),
        }
    }

    /// Creates a service with a preconfigured signer.
    #[must_use]
    pub fn with_signer(store: Arc<Store>, tokens: TokenSigner) -> Self {
        Self { store, tokens }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn tokens(&self) -> &TokenSigner {
        &self.tokens
    }

    /// Decodes a request body into an entity of the route's kind.
    ///
    /// The route determines the kind; any client-supplied `type_tag`
    /// is overwritten. The decoded entity is validated.
    pub(crate) fn decode(&self, kind: Kind, mut body: FieldMap) -> ApiResult<Entity> {
        body.insert("type_tag".to_owned(), Value::String(kind.tag().to_owned()));
        let entity = Entity::from_map(body)?;
        entity.validate()?;
        Ok(entity)
    }

    /// Looks up an entity, converting absence into a 404.
    pub(crate) fn fetch(&self, kind: Kind, id: &str) -> ApiResult<Entity> {
        self.store
            .get(kind, id)
            .ok_or_else(|| ApiError::not_found(format!("{kind} {id}")))
    }

    /// Checks that a referenced id exists.
    pub(crate) fn require_exists(&self, kind: Kind, id: &str) -> ApiResult<()> {
        self.fetch(kind, id).map(|_| ())
    }

    /// Rejects when another entity of `kind` already has `value` in
    /// `field`.
    ///
    /// `exclude_id` skips the entity being updated so it may keep its
    /// own value.
    pub(crate) fn require_unique(
        &self,
        kind: Kind,
        field: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<()> {
        if let Some(existing) = self.store.query(kind).eq(field, value).first()? {
            if exclude_id != Some(existing.id()) {
                return Err(ApiError::conflict(format!(
                    "{kind} with {field} '{value}' already exists"
                )));
            }
        }
        Ok(())
    }

    /// Renders every entity of a kind as its wire map, in key order.
    pub(crate) fn render_all(&self, kind: Kind) -> ApiResult<Vec<FieldMap>> {
        self.store
            .all(Some(kind))
            .into_values()
            .map(|entity| Ok(entity.to_map()?))
            .collect()
    }

    /// Durably commits the pending mutations.
    pub(crate) fn commit(&self) -> ApiResult<()> {
        Ok(self.store.persist()?)
    }
}
