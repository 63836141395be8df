//! Reference tables: policy sectors and data import sources.

use crate::error::Policy360Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

pub static SECTORS: &[Sector] = &[
    Sector {
        id: "education",
        name: "Education",
        icon: "🏫",
        color: "#4CAF50",
        description: "Educational policies, curriculum development, learning outcomes",
    },
    Sector {
        id: "health",
        name: "Health",
        icon: "🏥",
        color: "#F44336",
        description: "Healthcare policies, public health, medical services",
    },
    Sector {
        id: "agriculture",
        name: "Agriculture",
        icon: "🌾",
        color: "#FF9800",
        description: "Agricultural policies, food security, rural development",
    },
    Sector {
        id: "urbanization",
        name: "Urbanization",
        icon: "🏙️",
        color: "#2196F3",
        description: "Urban planning, housing policies, infrastructure",
    },
    Sector {
        id: "technology",
        name: "ICT & Technology",
        icon: "💻",
        color: "#9C27B0",
        description: "Tech policies, digital transformation, innovation",
    },
];

pub fn sector(id: &str) -> Option<&'static Sector> {
    SECTORS.iter().find(|s| s.id == id)
}

/// Where imported data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Document,
    Manual,
    Scraping,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Document => "document",
            DataSourceKind::Manual => "manual",
            DataSourceKind::Scraping => "scraping",
        }
    }

    pub fn info(&self) -> &'static DataSource {
        match self {
            DataSourceKind::Document => &DATA_SOURCES[0],
            DataSourceKind::Manual => &DATA_SOURCES[1],
            DataSourceKind::Scraping => &DATA_SOURCES[2],
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataSourceKind {
    type Err = Policy360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(DataSourceKind::Document),
            "manual" => Ok(DataSourceKind::Manual),
            "scraping" => Ok(DataSourceKind::Scraping),
            _ => Err(Policy360Error::InvalidConfig(format!(
                "unknown data source: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSource {
    pub kind: DataSourceKind,
    pub name: &'static str,
    pub icon: &'static str,
    pub formats: &'static [&'static str],
}

pub static DATA_SOURCES: [DataSource; 3] = [
    DataSource {
        kind: DataSourceKind::Document,
        name: "Document Upload",
        icon: "📄",
        formats: &["PDF", "Excel", "CSV", "Word"],
    },
    DataSource {
        kind: DataSourceKind::Manual,
        name: "Manual Entry",
        icon: "✏️",
        formats: &["Forms", "Text Input", "Data Tables"],
    },
    DataSource {
        kind: DataSourceKind::Scraping,
        name: "Web Scraping",
        icon: "🌐",
        formats: &["Websites", "APIs", "Databases"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_find_sector_by_id() {
        assert_eq!(sector("health").map(|s| s.name), Some("Health"));
        assert!(sector("defence").is_none());
    }

    #[test]
    fn test_should_map_source_kinds_to_table() {
        for source in &DATA_SOURCES {
            assert_eq!(source.kind.info(), source);
            assert_eq!(source.kind.as_str().parse::<DataSourceKind>().unwrap(), source.kind);
        }
        assert!("fax".parse::<DataSourceKind>().is_err());
    }
}
