use crate::auth::{require_permission, Claims};
use crate::errors::ApiError;
use crate::models::{
    DeleteResponse, DrinkPayload, DrinksResponse, Ingredient, LongDrink, RecipeInput, ShortDrink,
};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use crate::store::DrinkChanges;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json, Path, State,
    },
    handler::Handler,
    middleware,
    routing::{get, patch},
    Extension, Router,
};
use log::info;

pub(crate) const READ_DETAIL: &str = "get:drinks-detail";
pub(crate) const CREATE_DRINKS: &str = "post:drinks";
pub(crate) const UPDATE_DRINKS: &str = "patch:drinks";
pub(crate) const DELETE_DRINKS: &str = "delete:drinks";

/// Drink routes; every route except the public listing is wrapped in a permission gate
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list_drinks).post(create_drink.layer(middleware::from_fn_with_state(
                state.gate(CREATE_DRINKS),
                require_permission,
            ))),
        )
        .route(
            "/drinks-detail",
            get(list_drinks_detail.layer(middleware::from_fn_with_state(
                state.gate(READ_DETAIL),
                require_permission,
            ))),
        )
        .route(
            "/drinks/{id}",
            patch(update_drink.layer(middleware::from_fn_with_state(
                state.gate(UPDATE_DRINKS),
                require_permission,
            )))
            .delete(delete_drink.layer(middleware::from_fn_with_state(
                state.gate(DELETE_DRINKS),
                require_permission,
            ))),
        )
}

fn required_title(title: Option<String>) -> Result<String, ApiError> {
    title
        .filter(|title| !title.trim().is_empty())
        .ok_or(ApiError::BadRequest)
}

fn required_recipe(recipe: Option<RecipeInput>) -> Result<Vec<Ingredient>, ApiError> {
    recipe
        .and_then(RecipeInput::into_recipe)
        .ok_or(ApiError::BadRequest)
}

/// List all drinks without ingredient names
#[utoipa::path(
    get,
    path = "/drinks",
    tag = DRINKS_TAG,
    responses(
        (status = 200, description = "All drinks in short form", body = DrinksResponse<ShortDrink>)
    )
)]
pub(crate) async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<ShortDrink>>, ApiError> {
    let drinks = state.store.all().await?;
    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(ShortDrink::from).collect(),
    )))
}

/// List all drinks with full recipes
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = DRINKS_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer token with the get:drinks-detail permission"),
    ),
    responses(
        (status = 200, description = "All drinks in long form", body = DrinksResponse<LongDrink>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted")
    )
)]
pub(crate) async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<LongDrink>>, ApiError> {
    let drinks = state.store.all().await?;
    Ok(Json(DrinksResponse::new(drinks)))
}

/// Create a drink
#[utoipa::path(
    post,
    path = "/drinks",
    tag = DRINKS_TAG,
    request_body = DrinkPayload,
    params(
        ("Authorization" = String, Header, description = "Bearer token with the post:drinks permission"),
    ),
    responses(
        (status = 200, description = "The created drink", body = DrinksResponse<LongDrink>),
        (status = 400, description = "Missing or empty title or recipe"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 422, description = "Store rejected the drink, e.g. duplicate title")
    )
)]
pub(crate) async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, ApiError> {
    let Json(payload) = payload?;
    let title = required_title(payload.title.flatten())?;
    let recipe = required_recipe(payload.recipe.flatten())?;

    let drink = state
        .store
        .insert(&title, &recipe)
        .await
        .map_err(ApiError::unprocessable)?;

    info!("Drink {} '{}' created by {}", drink.id, drink.title, claims.subject());
    Ok(Json(DrinksResponse::new(vec![drink])))
}

/// Replace the title and/or recipe of a drink
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    request_body = DrinkPayload,
    params(
        ("id" = i32, Path, description = "Drink id"),
        ("Authorization" = String, Header, description = "Bearer token with the patch:drinks permission"),
    ),
    responses(
        (status = 200, description = "The updated drink", body = DrinksResponse<LongDrink>),
        (status = 400, description = "Malformed body or empty field"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "No drink with this id"),
        (status = 422, description = "Store rejected the update")
    )
)]
pub(crate) async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, ApiError> {
    let Path(id) = id?;
    let drink = state.store.find(id).await?.ok_or(ApiError::NotFound)?;

    let Json(payload) = payload?;
    let changes = DrinkChanges {
        title: payload.title.map(required_title).transpose()?,
        recipe: payload.recipe.map(required_recipe).transpose()?,
    };

    let drink = state
        .store
        .update(drink, changes)
        .await
        .map_err(ApiError::unprocessable)?;

    info!("Drink {} updated by {}", drink.id, claims.subject());
    Ok(Json(DrinksResponse::new(vec![drink])))
}

/// Permanently delete a drink
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(
        ("id" = i32, Path, description = "Drink id"),
        ("Authorization" = String, Header, description = "Bearer token with the delete:drinks permission"),
    ),
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeleteResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "No drink with this id"),
        (status = 422, description = "Store rejected the delete")
    )
)]
pub(crate) async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    let drink = state.store.find(id).await?.ok_or(ApiError::NotFound)?;

    state
        .store
        .delete(drink)
        .await
        .map_err(ApiError::unprocessable)?;

    info!("Drink {} deleted by {}", id, claims.subject());
    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
