pub mod coach;
pub mod league;
pub mod player;
pub mod team;
pub mod user;

use serde::{de::DeserializeOwned, Serialize};

pub use coach::Coach;
pub use league::League;
pub use player::Player;
pub use team::Team;
pub use user::Credential;

/// Spanish wording used in client-facing messages for one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    /// Collection name, e.g. "ligas".
    pub plural: &'static str,
    /// "una liga", "un equipo".
    pub indefinite: &'static str,
    /// "la liga", "el equipo".
    pub definite: &'static str,
}

/// A persisted record addressed by a numeric id.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const LABELS: Labels;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);
}
