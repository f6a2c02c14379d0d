//! Persistence for drinks on top of SeaORM.
//!
//! The store never checks for existence itself: `update` and `delete` take a
//! row the caller already resolved with `find`.

pub mod entity;

use crate::config::DatabaseConfig;
use crate::models::{Ingredient, LongDrink};
use entity::{ActiveModel, Entity as Drink, Model};
use log::{debug, info};
use sea_orm::{
    sea_query::Table, ActiveModelTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityName, EntityTrait, QueryOrder, Schema, Set,
};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Persistence(#[from] DbErr),
    #[error("Stored recipe for drink {id} is not valid JSON: {source}")]
    CorruptRecipe {
        id: i32,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode recipe: {0}")]
    Encoding(#[source] serde_json::Error),
}

/// Fields to replace on an existing drink; `None` leaves the column untouched
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

#[derive(Clone)]
pub struct DrinkStore {
    db: DatabaseConnection,
}

impl DrinkStore {
    /// Connect to the configured database and make sure the drink table exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .sqlx_logging(false);
        let db = Database::connect(options).await?;

        let store = Self { db };
        if config.reset {
            store.drop_and_create_all().await?;
        } else {
            store.create_all().await?;
        }
        Ok(store)
    }

    /// Create the drink table if it does not exist yet
    pub async fn create_all(&self) -> Result<(), StoreError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let mut create = schema.create_table_from_entity(Drink);
        create.if_not_exists();
        self.db.execute(backend.build(&create)).await?;
        debug!("Ensured drink table exists");
        Ok(())
    }

    /// Drop the drink table, recreate it and seed a sample drink
    pub async fn drop_and_create_all(&self) -> Result<(), StoreError> {
        let backend = self.db.get_database_backend();
        let mut statement = Table::drop();
        statement.table(Drink.table_ref()).if_exists();
        self.db.execute(backend.build(&statement)).await?;
        self.create_all().await?;

        let water = vec![Ingredient {
            color: "blue".to_string(),
            name: Some("water".to_string()),
            parts: 1,
        }];
        self.insert("water", &water).await?;
        info!("Drink table reset and seeded");
        Ok(())
    }

    /// All drinks ordered by id
    pub async fn all(&self) -> Result<Vec<LongDrink>, StoreError> {
        Drink::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_drink)
            .collect()
    }

    pub async fn find(&self, id: i32) -> Result<Option<Model>, StoreError> {
        Ok(Drink::find_by_id(id).one(&self.db).await?)
    }

    pub async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<LongDrink, StoreError> {
        let drink = ActiveModel {
            title: Set(title.to_string()),
            recipe: Set(encode_recipe(recipe)?),
            ..Default::default()
        };
        to_drink(drink.insert(&self.db).await?)
    }

    pub async fn update(&self, drink: Model, changes: DrinkChanges) -> Result<LongDrink, StoreError> {
        if changes == DrinkChanges::default() {
            return to_drink(drink);
        }
        let mut active: ActiveModel = drink.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(recipe) = changes.recipe {
            active.recipe = Set(encode_recipe(&recipe)?);
        }
        to_drink(active.update(&self.db).await?)
    }

    pub async fn delete(&self, drink: Model) -> Result<(), StoreError> {
        Drink::delete_by_id(drink.id).exec(&self.db).await?;
        Ok(())
    }

    /// Round trip to the database
    pub async fn ping(&self) -> Result<(), StoreError> {
        Ok(self.db.ping().await?)
    }

    pub async fn close(self) -> Result<(), StoreError> {
        Ok(self.db.close().await?)
    }
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, StoreError> {
    serde_json::to_string(recipe).map_err(StoreError::Encoding)
}

/// Decode a stored row into its long form
pub fn to_drink(model: Model) -> Result<LongDrink, StoreError> {
    let recipe = serde_json::from_str(&model.recipe).map_err(|source| StoreError::CorruptRecipe {
        id: model.id,
        source,
    })?;
    Ok(LongDrink {
        id: model.id,
        title: model.title,
        recipe,
    })
}
