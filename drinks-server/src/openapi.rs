use crate::api::{drinks, health};
use crate::models::{
    DeleteResponse, DrinkPayload, Ingredient, LongDrink, RecipeInput, ShortDrink,
    ShortIngredient,
};
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const DRINKS_TAG: &str = "Drinks API";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::ready_check,
        drinks::list_drinks,
        drinks::list_drinks_detail,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
    ),
    components(schemas(
        Ingredient,
        ShortIngredient,
        RecipeInput,
        DrinkPayload,
        ShortDrink,
        LongDrink,
        DeleteResponse,
        health::Health,
    )),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = DRINKS_TAG, description = "Drink menu endpoints"),
    ),
    info(
        title = "Drinks API",
        description = "Drink menu with permission gated management",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
