//! Protected resource endpoints backed by the cached upstream.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::api::dto::{PaginationParams, PokemonDetailResponse, PokemonListResponse};
use crate::error::AppResult;
use crate::state::AppState;

/// Creates the resource routes
///
/// # Routes
/// - `GET /pokemons` - Paginated list
/// - `GET /pokemons/{id}` - Detail by numeric id or name
pub fn pokemon_routes() -> Router<AppState> {
    Router::new()
        .route("/pokemons", get(index))
        .route("/pokemons/{id}", get(show))
}

async fn index(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PokemonListResponse>> {
    let page = params.page_request()?;
    let resources = state.pokemon.list_resources(page).await?;
    Ok(Json(resources.into()))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PokemonDetailResponse>> {
    let detail = state.pokemon.get_resource(&id).await?;
    Ok(Json(detail.into()))
}
