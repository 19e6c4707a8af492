use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::models::{MemberRecord, Position, Rank, Result, TierScoreError};
use super::MemberStore;

const CREATE_MEMBERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    rank TEXT NOT NULL,
    tier_score INTEGER,
    main_position TEXT,
    sub_positions TEXT NOT NULL DEFAULT '[]',
    total_wins INTEGER NOT NULL DEFAULT 0,
    total_losses INTEGER NOT NULL DEFAULT 0,
    main_games INTEGER NOT NULL DEFAULT 0,
    main_wins INTEGER NOT NULL DEFAULT 0,
    sub_games INTEGER NOT NULL DEFAULT 0,
    sub_wins INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1
)
"#;

/// Member store backed by a SQLite `members` table.
#[derive(Clone)]
pub struct SqliteMemberStore {
    pool: SqlitePool,
}

impl SqliteMemberStore {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .connect_with(options)
            .await?;

        info!("Connected to member store at {}", settings.url);
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_MEMBERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a member or overwrite every column of an existing one.
    pub async fn upsert_member(&self, member: &MemberRecord) -> Result<()> {
        let sub_positions = serde_json::to_string(&member.sub_positions)?;

        sqlx::query(
            r#"
            INSERT INTO members (
                id, name, rank, tier_score, main_position, sub_positions,
                total_wins, total_losses, main_games, main_wins, sub_games, sub_wins, active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                rank = excluded.rank,
                tier_score = excluded.tier_score,
                main_position = excluded.main_position,
                sub_positions = excluded.sub_positions,
                total_wins = excluded.total_wins,
                total_losses = excluded.total_losses,
                main_games = excluded.main_games,
                main_wins = excluded.main_wins,
                sub_games = excluded.sub_games,
                sub_wins = excluded.sub_wins,
                active = 1
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(member.rank.as_str())
        .bind(member.tier_score)
        .bind(member.main_position.map(|p| p.as_str()))
        .bind(sub_positions)
        .bind(member.total_wins)
        .bind(member.total_losses)
        .bind(member.main_games)
        .bind(member.main_wins)
        .bind(member.sub_games)
        .bind(member.sub_wins)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_active(&self, id: &str, active: bool) -> Result<()> {
        let result = sqlx::query("UPDATE members SET active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TierScoreError::MemberNotFound(id.to_string()));
        }
        Ok(())
    }

    pub async fn get_member(&self, id: &str) -> Result<Option<MemberRecord>> {
        let row = sqlx::query("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(member_from_row).transpose()
    }
}

fn member_from_row(row: &SqliteRow) -> Result<MemberRecord> {
    let rank: String = row.try_get("rank")?;
    let main_position: Option<String> = row.try_get("main_position")?;
    let sub_positions: String = row.try_get("sub_positions")?;

    Ok(MemberRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        rank: rank.parse::<Rank>()?,
        tier_score: row.try_get("tier_score")?,
        main_position: main_position.as_deref().map(Position::from_str).transpose()?,
        sub_positions: serde_json::from_str(&sub_positions)?,
        total_wins: row.try_get("total_wins")?,
        total_losses: row.try_get("total_losses")?,
        main_games: row.try_get("main_games")?,
        main_wins: row.try_get("main_wins")?,
        sub_games: row.try_get("sub_games")?,
        sub_wins: row.try_get("sub_wins")?,
    })
}

#[async_trait]
impl MemberStore for SqliteMemberStore {
    async fn fetch_active_members(&self) -> Result<Vec<MemberRecord>> {
        let rows = sqlx::query("SELECT * FROM members WHERE active = 1 ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let members = rows.iter().map(member_from_row).collect::<Result<Vec<_>>>()?;
        debug!("Fetched {} active members", members.len());
        Ok(members)
    }

    async fn update_tier_score(&self, id: &str, expected: i64, new_score: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE members SET tier_score = ? WHERE id = ? AND IFNULL(tier_score, 0) = ?",
        )
        .bind(new_score)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM members WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .is_some();

            return Err(if exists {
                TierScoreError::StaleRecord { id: id.to_string() }
            } else {
                TierScoreError::MemberNotFound(id.to_string())
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteMemberStore {
        // A single connection keeps every query on the same in-memory database.
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_seconds: 5,
        };
        let store = SqliteMemberStore::connect(&settings).await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn sample(id: &str) -> MemberRecord {
        let mut member = MemberRecord::new(id, format!("Player {id}"), Rank::EmeraldII);
        member.main_position = Some(Position::Jungle);
        member.sub_positions = vec![Position::Top, Position::Support];
        member.total_wins = 12;
        member.total_losses = 8;
        member.main_games = 15;
        member.main_wins = 10;
        member.sub_games = 5;
        member.sub_wins = 2;
        member
    }

    #[tokio::test]
    async fn test_upsert_and_fetch_round_trip() {
        let store = memory_store().await;
        store.upsert_member(&sample("b")).await.unwrap();
        store.upsert_member(&sample("a")).await.unwrap();

        let members = store.fetch_active_members().await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, "a");
        assert_eq!(members[1], sample("b"));
    }

    #[tokio::test]
    async fn test_inactive_members_are_skipped() {
        let store = memory_store().await;
        store.upsert_member(&sample("a")).await.unwrap();
        store.upsert_member(&sample("b")).await.unwrap();
        store.set_active("a", false).await.unwrap();

        let members = store.fetch_active_members().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "b");
    }

    #[tokio::test]
    async fn test_conditional_update_treats_null_as_zero() {
        let store = memory_store().await;
        store.upsert_member(&sample("a")).await.unwrap();

        store.update_tier_score("a", 0, 2215).await.unwrap();
        assert_eq!(store.get_member("a").await.unwrap().unwrap().tier_score, Some(2215));

        let stale = store.update_tier_score("a", 0, 2300).await;
        assert!(matches!(stale, Err(TierScoreError::StaleRecord { .. })));

        let missing = store.update_tier_score("zz", 0, 1).await;
        assert!(matches!(missing, Err(TierScoreError::MemberNotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_rank_in_row_is_reported() {
        let store = memory_store().await;
        store.upsert_member(&sample("a")).await.unwrap();
        sqlx::query("UPDATE members SET rank = 'wood_iv' WHERE id = 'a'")
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store.fetch_active_members().await;
        assert!(matches!(result, Err(TierScoreError::InvalidRank(_))));
    }
}
