use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Inscription year of a site. Source data is not always numeric, so a
/// failed coercion is kept as `Unknown` instead of dropping the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearInscribed {
    Known(i32),
    Unknown,
}

impl fmt::Display for YearInscribed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearInscribed::Known(year) => write!(f, "{}", year),
            YearInscribed::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for YearInscribed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            YearInscribed::Known(year) => serializer.serialize_i32(*year),
            YearInscribed::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for YearInscribed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i32),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(year) => YearInscribed::Known(year),
            Raw::Text(text) => text
                .trim()
                .parse()
                .map(YearInscribed::Known)
                .unwrap_or(YearInscribed::Unknown),
        })
    }
}

/// One heritage location. `name` doubles as the visited-state key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub year_inscribed: YearInscribed,
    pub criteria: String,
}

impl Site {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        lat: f64,
        lng: f64,
        year_inscribed: YearInscribed,
        criteria: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            lat,
            lng,
            year_inscribed,
            criteria: criteria.into(),
        }
    }
}

/// Which stage of the fallback chain produced a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrigin {
    Remote,
    Local,
    Fallback,
}

impl fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CatalogOrigin::Remote => "remote",
            CatalogOrigin::Local => "local",
            CatalogOrigin::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

/// The site catalog for one session. Replaced wholesale on every load.
#[derive(Debug, Clone)]
pub struct Catalog {
    sites: Vec<Site>,
    origin: CatalogOrigin,
}

impl Catalog {
    pub fn new(sites: Vec<Site>, origin: CatalogOrigin) -> Self {
        Self { sites, origin }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.sites.iter().any(|site| site.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Unrecognised stored values fall back to the default.
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

/// User-initiated, one-way export of the visited state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub visited_sites: Vec<String>,
    pub theme: Theme,
    pub last_updated: DateTime<Utc>,
    pub total_sites: usize,
}

impl ExportSnapshot {
    pub fn new(visited: &BTreeSet<String>, theme: Theme, last_updated: DateTime<Utc>) -> Self {
        Self {
            visited_sites: visited.iter().cloned().collect(),
            theme,
            last_updated,
            total_sites: visited.len(),
        }
    }

    pub fn default_file_name(&self) -> String {
        format!(
            "heritage-atlas-data-{}.json",
            self.last_updated.format("%Y-%m-%d")
        )
    }
}

/// How a fetched remote snapshot is combined with the in-memory visited set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcilePolicy {
    /// The remote list becomes the visited set; local-only marks are dropped.
    #[default]
    Replace,
    /// The remote list is unioned into the visited set.
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub visited: usize,
    pub remaining: usize,
}
