//! Database module for theme persistence using SeaORM

pub mod entities;
pub mod themes;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, Schema, Set,
};

use entities::{theme, user};

pub use themes::{ThemeRow, ThemeStore};

/// Connect to the database and create tables that are missing
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", redact_url(database_url));

    let mut options = ConnectOptions::new(database_url.to_string());
    options.sqlx_logging(false);
    // Every connection to an in-memory SQLite database is a separate database
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    create_tables(&db).await?;

    Ok(db)
}

/// Create the users and themes tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let users = schema
        .create_table_from_entity(user::Entity)
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&users)).await?;

    // Themes reference users, so users must exist first
    let themes = schema
        .create_table_from_entity(theme::Entity)
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&themes)).await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

/// Make sure a user with `login` exists, returning its id
pub async fn ensure_user(db: &DatabaseConnection, login: &str) -> Result<i32, DbErr> {
    if let Some(existing) = user::Entity::find()
        .filter(user::Column::Login.eq(login))
        .one(db)
        .await?
    {
        return Ok(existing.id);
    }

    let created = user::ActiveModel {
        login: Set(login.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Created user '{}' with id {}", login, created.id);
    Ok(created.id)
}

/// Hide the password part of a connection URL for logging
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            if credentials.contains(':') {
                format!("{}://{}:***@{}", scheme, user, host)
            } else {
                url.to_string()
            }
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
pub(crate) async fn test_database() -> DatabaseConnection {
    init_database("sqlite::memory:")
        .await
        .expect("in-memory database")
}
