use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A single recipe entry
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Ingredient {
    /// Display color of the ingredient layer
    pub color: String,
    /// Ingredient name, hidden from the public short form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Relative amount of the ingredient
    pub parts: u32,
}

/// Ingredient as exposed to unauthenticated clients
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

impl From<&Ingredient> for ShortIngredient {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            color: ingredient.color.clone(),
            parts: ingredient.parts,
        }
    }
}

/// Recipe as accepted in request bodies: a single ingredient or a list of them
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    /// Normalise into a list, rejecting empty recipes and zero parts
    pub fn into_recipe(self) -> Option<Vec<Ingredient>> {
        let recipe = match self {
            Self::Many(ingredients) => ingredients,
            Self::One(ingredient) => vec![ingredient],
        };
        if recipe.is_empty() || recipe.iter().any(|i| i.parts == 0) {
            return None;
        }
        Some(recipe)
    }
}

/// Body of POST /drinks and PATCH /drinks/{id}.
///
/// The outer `Option` is `None` when a field is absent and `Some(None)` when
/// it is sent as `null`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
pub struct DrinkPayload {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<RecipeInput>)]
    pub recipe: Option<Option<RecipeInput>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Public representation of a drink, ingredient names omitted
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ShortDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full representation of a drink
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct LongDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<LongDrink> for ShortDrink {
    fn from(drink: LongDrink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe.iter().map(ShortIngredient::from).collect(),
        }
    }
}

/// Response body of the list, create and update endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// Response body of the delete endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i32,
}
