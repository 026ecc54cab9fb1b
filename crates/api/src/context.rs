//! Request-scoped context: one repository session per request.

use axum::async_trait;
use axum::extract::{Extension, FromRequestParts};
use axum::http::request::Parts;
use std::ops::{Deref, DerefMut};

use catalog_infra::{ProductRepository, ProductStore};

use crate::app::errors::ApiError;

/// Repository session opened for the current request.
///
/// Extracting it checks a connection out of the pool (persistent backend);
/// the connection is released when the handler returns, whatever the outcome.
pub struct RepoSession(Box<dyn ProductRepository>);

#[async_trait]
impl<S> FromRequestParts<S> for RepoSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(store) = Extension::<ProductStore>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Internal(format!("product store not wired: {e}")))?;

        let session = store.session().await?;
        Ok(Self(session))
    }
}

impl Deref for RepoSession {
    type Target = dyn ProductRepository;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for RepoSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
