use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::models::{Coach, Credential, League, Player, Team};
use crate::database::repository::{CredentialStore, PlayerLookup, Repository, StoreError};

#[derive(Default)]
struct Tables {
    next_id: i64,
    leagues: BTreeMap<i64, League>,
    teams: BTreeMap<i64, Team>,
    players: BTreeMap<i64, Player>,
    coaches: BTreeMap<i64, Coach>,
    users: BTreeMap<i64, Credential>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn league_with_teams(&self, league: &League) -> League {
        let mut league = league.clone();
        league.teams = self
            .teams
            .values()
            .filter(|t| t.league_id.is_some() && t.league_id == league.id)
            .cloned()
            .collect();
        league
    }

    fn check_team(&self, team: &Team) -> Result<(), StoreError> {
        if self.teams.values().any(|t| t.name == team.name && t.id != team.id) {
            return Err(StoreError::Duplicate);
        }
        if let Some(coach_id) = team.coach_id {
            if !self.coaches.contains_key(&coach_id) {
                return Err(missing_reference());
            }
            if self.teams.values().any(|t| t.coach_id == Some(coach_id) && t.id != team.id) {
                return Err(StoreError::Duplicate);
            }
        }
        if let Some(league_id) = team.league_id {
            if !self.leagues.contains_key(&league_id) {
                return Err(missing_reference());
            }
        }
        Ok(())
    }
}

fn missing_reference() -> StoreError {
    StoreError::Constraint("El registro referenciado no existe o sigue en uso".to_string())
}

fn still_referenced() -> StoreError {
    StoreError::Constraint("El registro sigue referenciado por otros registros".to_string())
}

/// Insert-or-update into one table, enforcing "update requires existing id".
fn upsert<T: Clone>(
    table: &mut BTreeMap<i64, T>,
    id: i64,
    is_new: bool,
    row: T,
) -> Result<T, StoreError> {
    if !is_new && !table.contains_key(&id) {
        return Err(StoreError::NotFound);
    }
    table.insert(id, row.clone());
    Ok(row)
}

/// Process-local datastore mirroring the Postgres schema's constraints:
/// unique league/team names, one team per coach, existing foreign keys and
/// restricted deletes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<League> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<League>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.leagues.values().map(|l| tables.league_with_teams(l)).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<League>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.leagues.get(&id).map(|l| tables.league_with_teams(l)))
    }

    async fn save(&self, mut league: League) -> Result<League, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.leagues.values().any(|l| l.name == league.name && l.id != league.id) {
            return Err(StoreError::Duplicate);
        }

        let is_new = league.id.is_none();
        let id = match league.id {
            Some(id) => id,
            None => tables.allocate_id(),
        };
        league.id = Some(id);
        league.teams = Vec::new();

        let saved = upsert(&mut tables.leagues, id, is_new, league)?;
        Ok(tables.league_with_teams(&saved))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.leagues.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.teams.values().any(|t| t.league_id == Some(id)) {
            return Err(still_referenced());
        }
        tables.leagues.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Team> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self.tables.read().await.teams.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Team>, StoreError> {
        Ok(self.tables.read().await.teams.get(&id).cloned())
    }

    async fn save(&self, mut team: Team) -> Result<Team, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_team(&team)?;

        let is_new = team.id.is_none();
        let id = match team.id {
            Some(id) => id,
            None => tables.allocate_id(),
        };
        team.id = Some(id);
        upsert(&mut tables.teams, id, is_new, team)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.teams.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.players.values().any(|p| p.team_id == Some(id)) {
            return Err(still_referenced());
        }
        tables.teams.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Player> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.tables.read().await.players.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, StoreError> {
        Ok(self.tables.read().await.players.get(&id).cloned())
    }

    async fn save(&self, mut player: Player) -> Result<Player, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(team_id) = player.team_id {
            if !tables.teams.contains_key(&team_id) {
                return Err(missing_reference());
            }
        }

        let is_new = player.id.is_none();
        let id = match player.id {
            Some(id) => id,
            None => tables.allocate_id(),
        };
        player.id = Some(id);
        upsert(&mut tables.players, id, is_new, player)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.players.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl PlayerLookup for MemoryStore {
    async fn find_by_team(&self, team_id: i64) -> Result<Vec<Player>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .players
            .values()
            .filter(|p| p.team_id == Some(team_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Repository<Coach> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Coach>, StoreError> {
        Ok(self.tables.read().await.coaches.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Coach>, StoreError> {
        Ok(self.tables.read().await.coaches.get(&id).cloned())
    }

    async fn save(&self, mut coach: Coach) -> Result<Coach, StoreError> {
        let mut tables = self.tables.write().await;
        let is_new = coach.id.is_none();
        let id = match coach.id {
            Some(id) => id,
            None => tables.allocate_id(),
        };
        coach.id = Some(id);
        upsert(&mut tables.coaches, id, is_new, coach)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.coaches.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.teams.values().any(|t| t.coach_id == Some(id)) {
            return Err(still_referenced());
        }
        tables.coaches.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Credential, StoreError> {
        let mut tables = self.tables.write().await;
        if username.is_empty() {
            return Err(StoreError::Constraint("El nombre de usuario es requerido".to_string()));
        }
        if tables.users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate);
        }

        let id = tables.allocate_id();
        let credential = Credential {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(id, credential.clone());
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league(name: &str) -> League {
        League {
            id: None,
            name: name.to_string(),
            country: "México".to_string(),
            current_season: None,
            teams: Vec::new(),
        }
    }

    fn team(name: &str, league_id: Option<i64>) -> Team {
        Team {
            id: None,
            name: name.to_string(),
            city: None,
            coach_id: None,
            league_id,
        }
    }

    fn coach(name: &str) -> Coach {
        Coach {
            id: None,
            name: name.to_string(),
            experience: Some(10),
            nationality: None,
        }
    }

    #[tokio::test]
    async fn duplicate_league_name_is_rejected() {
        let store = MemoryStore::new();
        let first = Repository::<League>::save(&store, league("Liga MX")).await;
        let second = Repository::<League>::save(&store, league("Liga MX")).await;

        assert!(first.is_ok());
        assert!(matches!(second, Err(StoreError::Duplicate)));
    }

    #[tokio::test]
    async fn renaming_onto_itself_is_not_a_duplicate() {
        let store = MemoryStore::new();
        let saved = Repository::<League>::save(&store, league("Liga MX")).await.unwrap();

        let mut update = saved.clone();
        update.country = "Mexico".to_string();
        let updated = Repository::<League>::save(&store, update).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.country, "Mexico");
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let store = MemoryStore::new();
        let mut ghost = coach("Pep");
        ghost.id = Some(42);
        let result = Repository::<Coach>::save(&store, ghost).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn league_embeds_its_teams() {
        let store = MemoryStore::new();
        let liga = Repository::<League>::save(&store, league("Premier")).await.unwrap();
        Repository::<Team>::save(&store, team("Arsenal", liga.id)).await.unwrap();
        Repository::<Team>::save(&store, team("Libre", None)).await.unwrap();

        let found = Repository::<League>::find_by_id(&store, liga.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.teams.len(), 1);
        assert_eq!(found.teams[0].name, "Arsenal");
    }

    #[tokio::test]
    async fn foreign_keys_must_exist() {
        let store = MemoryStore::new();
        let result = Repository::<Team>::save(&store, team("Huérfano", Some(99))).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn coach_leads_at_most_one_team() {
        let store = MemoryStore::new();
        let pep = Repository::<Coach>::save(&store, coach("Pep")).await.unwrap();

        let mut city = team("City", None);
        city.coach_id = pep.id;
        let mut bayern = team("Bayern", None);
        bayern.coach_id = pep.id;

        assert!(Repository::<Team>::save(&store, city).await.is_ok());
        assert!(matches!(
            Repository::<Team>::save(&store, bayern).await,
            Err(StoreError::Duplicate)
        ));
    }

    #[tokio::test]
    async fn referenced_rows_cannot_be_deleted() {
        let store = MemoryStore::new();
        let liga = Repository::<League>::save(&store, league("Serie A")).await.unwrap();
        let roma = Repository::<Team>::save(&store, team("Roma", liga.id)).await.unwrap();

        let blocked = Repository::<League>::delete_by_id(&store, liga.id.unwrap()).await;
        assert!(matches!(blocked, Err(StoreError::Constraint(_))));

        Repository::<Team>::delete_by_id(&store, roma.id.unwrap()).await.unwrap();
        Repository::<League>::delete_by_id(&store, liga.id.unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            Repository::<Player>::delete_by_id(&store, 7).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn players_by_team() {
        let store = MemoryStore::new();
        let roma = Repository::<Team>::save(&store, team("Roma", None)).await.unwrap();
        let player = Player {
            id: None,
            name: "Totti".to_string(),
            position: Some("Delantero".to_string()),
            nationality: None,
            team_id: roma.id,
        };
        Repository::<Player>::save(&store, player).await.unwrap();

        let found = store.find_by_team(roma.id.unwrap()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.find_by_team(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        store.insert("ana", "hash").await.unwrap();
        assert!(matches!(store.insert("ana", "hash").await, Err(StoreError::Duplicate)));
        assert!(store.find_by_username("ana").await.unwrap().is_some());
        assert!(store.find_by_username("luis").await.unwrap().is_none());
    }
}
