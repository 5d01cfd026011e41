//! Artwork gallery rows

use anyhow::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One gallery entry pointing at a stored image file
#[derive(Debug, Clone, Serialize)]
pub struct Artwork {
    pub guid: Uuid,
    pub person: String,
    pub title: Option<String>,
    pub filename: String,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
}

impl Artwork {
    pub fn new(person: &str, filename: &str) -> Self {
        Self {
            guid: Uuid::new_v4(),
            person: person.to_string(),
            title: None,
            filename: filename.to_string(),
            original_name: None,
            mime_type: None,
        }
    }
}

/// Insert a new artwork row
pub async fn save_artwork(pool: &SqlitePool, artwork: &Artwork) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO artworks (guid, person, title, filename, original_name, mime_type)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(artwork.guid.to_string())
    .bind(&artwork.person)
    .bind(&artwork.title)
    .bind(&artwork.filename)
    .bind(&artwork.original_name)
    .bind(&artwork.mime_type)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all of one person's artworks, newest first
pub async fn list_artworks(pool: &SqlitePool, person: &str) -> Result<Vec<Artwork>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, person, title, filename, original_name, mime_type
        FROM artworks
        WHERE person = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(person)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let guid_str: String = row.get("guid");

            Ok(Artwork {
                guid: Uuid::parse_str(&guid_str)?,
                person: row.get("person"),
                title: row.get("title"),
                filename: row.get("filename"),
                original_name: row.get("original_name"),
                mime_type: row.get("mime_type"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_common::db::create_schema;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        create_schema(&pool).await.expect("Failed to create schema");
        pool
    }

    #[tokio::test]
    async fn test_save_and_list_artwork() {
        let pool = test_pool().await;

        let mut artwork = Artwork::new("mira", "a1b2c3.png");
        artwork.title = Some("Sandworm in crayon".to_string());
        artwork.original_name = Some("worm.png".to_string());
        artwork.mime_type = Some("image/png".to_string());

        save_artwork(&pool, &artwork).await.expect("Failed to save");

        let listed = list_artworks(&pool, "mira").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "a1b2c3.png");
        assert_eq!(listed[0].title.as_deref(), Some("Sandworm in crayon"));
    }

    #[tokio::test]
    async fn test_list_scoped_to_person() {
        let pool = test_pool().await;

        save_artwork(&pool, &Artwork::new("mira", "one.png"))
            .await
            .unwrap();
        save_artwork(&pool, &Artwork::new("jasper", "two.png"))
            .await
            .unwrap();

        let mira = list_artworks(&pool, "mira").await.unwrap();
        assert_eq!(mira.len(), 1);
        assert_eq!(mira[0].filename, "one.png");
    }
}
