use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use catalog_core::{DomainError, ProductId};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::context::RepoSession;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    Ok(raw.parse::<ProductId>()?)
}

pub async fn create_product(
    mut repo: RepoSession,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let product = body.validate()?;

    if repo.get(product.id()).await?.is_some() {
        return Err(DomainError::AlreadyExists.into());
    }
    repo.add(&product).await?;

    tracing::info!(product_id = %product.id(), "product created");
    Ok(StatusCode::CREATED)
}

pub async fn list_products(
    mut repo: RepoSession,
    params: Result<Query<dto::ListProductsParams>, QueryRejection>,
) -> Result<Json<Vec<dto::ProductResponse>>, ApiError> {
    let Query(params) = params?;
    let query = params.validate()?;

    let items = repo
        .list(&query)
        .await?
        .iter()
        .map(dto::ProductResponse::from)
        .collect();
    Ok(Json(items))
}

pub async fn get_product(
    mut repo: RepoSession,
    Path(id): Path<String>,
) -> Result<Json<dto::ProductResponse>, ApiError> {
    let id = parse_id(&id)?;
    match repo.get(id).await? {
        Some(p) => Ok(Json(p.into())),
        None => Err(DomainError::NotFound.into()),
    }
}

pub async fn update_product(
    mut repo: RepoSession,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateProductRequest>, JsonRejection>,
) -> Result<Json<dto::ProductResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let patch = body.validate()?;

    match repo.update_partial(id, &patch).await? {
        Some(p) => {
            tracing::info!(product_id = %id, "product updated");
            Ok(Json(p.into()))
        }
        None => Err(DomainError::NotFound.into()),
    }
}

pub async fn delete_product(
    mut repo: RepoSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !repo.delete(id).await? {
        return Err(DomainError::NotFound.into());
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
