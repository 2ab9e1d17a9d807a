use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::database::models::{Coach, Credential, League, Player, Team};
use crate::database::repository::{CredentialStore, PlayerLookup, Repository, StoreError};

/// sqlx-backed datastore. Constraint enforcement is left to the schema.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn teams_of(&self, league_ids: &[i64]) -> Result<HashMap<i64, Vec<Team>>, StoreError> {
        if league_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let teams = sqlx::query_as::<_, Team>(
            "SELECT id, name, city, coach_id, league_id FROM teams \
             WHERE league_id = ANY($1) ORDER BY id",
        )
        .bind(league_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Team>> = HashMap::new();
        for team in teams {
            if let Some(league_id) = team.league_id {
                grouped.entry(league_id).or_default().push(team);
            }
        }
        Ok(grouped)
    }

    async fn with_teams(&self, mut league: League) -> Result<League, StoreError> {
        if let Some(id) = league.id {
            league.teams = self.teams_of(&[id]).await?.remove(&id).unwrap_or_default();
        }
        Ok(league)
    }

    async fn delete_from(&self, table: &'static str, id: i64) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<League> for PgStore {
    async fn find_all(&self) -> Result<Vec<League>, StoreError> {
        let mut leagues = sqlx::query_as::<_, League>(
            "SELECT id, name, country, current_season FROM leagues ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = leagues.iter().filter_map(|l| l.id).collect();
        let mut teams = self.teams_of(&ids).await?;
        for league in &mut leagues {
            if let Some(id) = league.id {
                league.teams = teams.remove(&id).unwrap_or_default();
            }
        }
        Ok(leagues)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<League>, StoreError> {
        let league = sqlx::query_as::<_, League>(
            "SELECT id, name, country, current_season FROM leagues WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match league {
            Some(league) => Ok(Some(self.with_teams(league).await?)),
            None => Ok(None),
        }
    }

    async fn save(&self, league: League) -> Result<League, StoreError> {
        let saved = match league.id {
            None => sqlx::query_as::<_, League>(
                "INSERT INTO leagues (name, country, current_season) VALUES ($1, $2, $3) \
                 RETURNING id, name, country, current_season",
            )
            .bind(&league.name)
            .bind(&league.country)
            .bind(&league.current_season)
            .fetch_one(&self.pool)
            .await?,
            Some(id) => sqlx::query_as::<_, League>(
                "UPDATE leagues SET name = $1, country = $2, current_season = $3 WHERE id = $4 \
                 RETURNING id, name, country, current_season",
            )
            .bind(&league.name)
            .bind(&league.country)
            .bind(&league.current_season)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?,
        };
        self.with_teams(saved).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.delete_from("leagues", id).await
    }
}

#[async_trait]
impl Repository<Team> for PgStore {
    async fn find_all(&self) -> Result<Vec<Team>, StoreError> {
        Ok(sqlx::query_as::<_, Team>(
            "SELECT id, name, city, coach_id, league_id FROM teams ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Team>, StoreError> {
        Ok(sqlx::query_as::<_, Team>(
            "SELECT id, name, city, coach_id, league_id FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save(&self, team: Team) -> Result<Team, StoreError> {
        match team.id {
            None => Ok(sqlx::query_as::<_, Team>(
                "INSERT INTO teams (name, city, coach_id, league_id) VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, city, coach_id, league_id",
            )
            .bind(&team.name)
            .bind(&team.city)
            .bind(team.coach_id)
            .bind(team.league_id)
            .fetch_one(&self.pool)
            .await?),
            Some(id) => sqlx::query_as::<_, Team>(
                "UPDATE teams SET name = $1, city = $2, coach_id = $3, league_id = $4 \
                 WHERE id = $5 \
                 RETURNING id, name, city, coach_id, league_id",
            )
            .bind(&team.name)
            .bind(&team.city)
            .bind(team.coach_id)
            .bind(team.league_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.delete_from("teams", id).await
    }
}

#[async_trait]
impl Repository<Player> for PgStore {
    async fn find_all(&self) -> Result<Vec<Player>, StoreError> {
        Ok(sqlx::query_as::<_, Player>(
            "SELECT id, name, position, nationality, team_id FROM players ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, StoreError> {
        Ok(sqlx::query_as::<_, Player>(
            "SELECT id, name, position, nationality, team_id FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save(&self, player: Player) -> Result<Player, StoreError> {
        match player.id {
            None => Ok(sqlx::query_as::<_, Player>(
                "INSERT INTO players (name, position, nationality, team_id) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, position, nationality, team_id",
            )
            .bind(&player.name)
            .bind(&player.position)
            .bind(&player.nationality)
            .bind(player.team_id)
            .fetch_one(&self.pool)
            .await?),
            Some(id) => sqlx::query_as::<_, Player>(
                "UPDATE players SET name = $1, position = $2, nationality = $3, team_id = $4 \
                 WHERE id = $5 \
                 RETURNING id, name, position, nationality, team_id",
            )
            .bind(&player.name)
            .bind(&player.position)
            .bind(&player.nationality)
            .bind(player.team_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.delete_from("players", id).await
    }
}

#[async_trait]
impl PlayerLookup for PgStore {
    async fn find_by_team(&self, team_id: i64) -> Result<Vec<Player>, StoreError> {
        Ok(sqlx::query_as::<_, Player>(
            "SELECT id, name, position, nationality, team_id FROM players \
             WHERE team_id = $1 ORDER BY id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl Repository<Coach> for PgStore {
    async fn find_all(&self) -> Result<Vec<Coach>, StoreError> {
        Ok(sqlx::query_as::<_, Coach>(
            "SELECT id, name, experience, nationality FROM coaches ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Coach>, StoreError> {
        Ok(sqlx::query_as::<_, Coach>(
            "SELECT id, name, experience, nationality FROM coaches WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save(&self, coach: Coach) -> Result<Coach, StoreError> {
        match coach.id {
            None => Ok(sqlx::query_as::<_, Coach>(
                "INSERT INTO coaches (name, experience, nationality) VALUES ($1, $2, $3) \
                 RETURNING id, name, experience, nationality",
            )
            .bind(&coach.name)
            .bind(coach.experience)
            .bind(&coach.nationality)
            .fetch_one(&self.pool)
            .await?),
            Some(id) => sqlx::query_as::<_, Coach>(
                "UPDATE coaches SET name = $1, experience = $2, nationality = $3 WHERE id = $4 \
                 RETURNING id, name, experience, nationality",
            )
            .bind(&coach.name)
            .bind(coach.experience)
            .bind(&coach.nationality)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.delete_from("coaches", id).await
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(sqlx::query_as::<_, Credential>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Credential, StoreError> {
        Ok(sqlx::query_as::<_, Credential>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?)
    }
}
