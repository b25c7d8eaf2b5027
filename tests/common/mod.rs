use gridtables::{ColumnCatalog, DeclaredType, GridColumn, GridOrder, GridRequest, GridSearch};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

/// In-memory database with a small people/orders schema and seed data.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    db.execute_unprepared(
        "CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            active BOOLEAN NOT NULL,
            secret TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .await?;

    db.execute_unprepared(
        "CREATE TABLE orders (
            id INTEGER PRIMARY KEY,
            person_id INTEGER NOT NULL,
            amount INTEGER NOT NULL
        )",
    )
    .await?;

    db.execute_unprepared(
        "INSERT INTO people (id, name, age, active, secret, created_at) VALUES
            (1, 'Alice Smith',  34, 1, 'hush-1', '2024-01-10'),
            (2, 'Bob Jones',    28, 0, 'hush-2', '2024-02-14'),
            (3, 'Carol Smith',  34, 1, 'hush-3', '2024-03-01'),
            (4, 'Dan Brown',    51, 1, 'hush-4', '2024-03-15'),
            (5, 'Erin Oliveira', 28, 0, 'hush-5', '2024-04-02')",
    )
    .await?;

    db.execute_unprepared(
        "INSERT INTO orders (id, person_id, amount) VALUES
            (1, 1, 10), (2, 1, 25), (3, 2, 5), (4, 3, 40), (5, 3, 8), (6, 3, 2)",
    )
    .await?;

    Ok(db)
}

pub fn people_catalog() -> ColumnCatalog {
    ColumnCatalog::from_columns([
        ("id", DeclaredType::Integer),
        ("name", DeclaredType::Other),
        ("age", DeclaredType::Integer),
        ("active", DeclaredType::Boolean),
        ("secret", DeclaredType::Other),
        ("created_at", DeclaredType::Other),
    ])
}

pub fn orders_catalog() -> ColumnCatalog {
    ColumnCatalog::from_columns([("person_id", DeclaredType::Integer)])
}

/// Request with the given per-column searches and no ordering.
pub fn request_with_searches(searches: &[(&str, Option<&str>)]) -> GridRequest {
    GridRequest {
        draw: Some(1),
        start: Some(0),
        length: Some(50),
        columns: searches
            .iter()
            .map(|(key, value)| GridColumn {
                data: Some((*key).to_owned()),
                search: value.map(|value| GridSearch {
                    value: Some(value.to_owned()),
                }),
            })
            .collect(),
        order: vec![],
    }
}

/// Request ordering by the first listed column in the given direction.
pub fn request_ordered_by(columns: &[&str], dir: &str) -> GridRequest {
    GridRequest {
        draw: Some(1),
        start: Some(0),
        length: Some(50),
        columns: columns
            .iter()
            .map(|key| GridColumn {
                data: Some((*key).to_owned()),
                search: None,
            })
            .collect(),
        order: vec![GridOrder {
            column: Some(0),
            dir: Some(dir.to_owned()),
        }],
    }
}
