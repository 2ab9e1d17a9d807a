use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, Labels, Team};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct League {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "temporadaActual", default)]
    pub current_season: Option<String>,
    /// Owned side of league/team: teams are nested here, never the reverse.
    #[serde(rename = "equipos", default, skip_deserializing)]
    #[sqlx(skip)]
    pub teams: Vec<Team>,
}

impl Entity for League {
    const LABELS: Labels = Labels {
        plural: "ligas",
        indefinite: "una liga",
        definite: "la liga",
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_and_read_only_teams() {
        let league: League = serde_json::from_value(json!({
            "nombre": "Liga MX",
            "pais": "México",
            "temporadaActual": "2025",
            "equipos": [{ "nombre": "ignored" }]
        }))
        .unwrap();

        assert_eq!(league.id, None);
        assert_eq!(league.name, "Liga MX");
        assert!(league.teams.is_empty());

        let out = serde_json::to_value(&league).unwrap();
        assert_eq!(out["pais"], "México");
        assert_eq!(out["equipos"], json!([]));
    }

    #[test]
    fn country_is_required() {
        let parsed = serde_json::from_value::<League>(json!({ "nombre": "Liga MX" }));
        assert!(parsed.is_err());
    }
}
