use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::Snapshot;

pub const TITLE: &str = "🚀 Docker Containers Monitor";

/// The only status value classified as healthy. Compared case-sensitively.
pub const RUNNING: &str = "running";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Unhealthy,
}

impl Health {
    pub fn classify(status: &str) -> Self {
        if status == RUNNING {
            Health::Healthy
        } else {
            Health::Unhealthy
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Health::Healthy => "#e8f5e8",
            Health::Unhealthy => "#f5e8e8",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Healthy => "healthy",
            Health::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Row {
    /// Stable identity across re-renders. Equals `name` unless the name
    /// repeats within the snapshot, in which case later rows get `name#N`.
    pub key: String,
    pub name: String,
    pub status: String,
    pub health: Health,
}

impl Row {
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct View {
    pub title: String,
    pub rows: Vec<Row>,
}

/// Projects a snapshot into the dashboard view, one row per entity in
/// snapshot order.
pub fn render(snapshot: &Snapshot) -> View {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();

    let rows = snapshot
        .entities()
        .iter()
        .map(|e| {
            let n = occurrences.entry(e.name.as_str()).or_insert(0);
            *n += 1;
            let key = if *n == 1 {
                e.name.clone()
            } else {
                format!("{}#{}", e.name, n)
            };

            Row {
                key,
                name: e.name.clone(),
                status: e.status.clone(),
                health: Health::classify(&e.status),
            }
        })
        .collect();

    View {
        title: TITLE.to_owned(),
        rows,
    }
}
