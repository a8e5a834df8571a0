use crate::error::SprigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Image path stored for plants that never had a photo uploaded.
pub const DEFAULT_PLANT_IMAGE: &str = "icon.png";

/// Numeric plant identifier.
///
/// Stored and displayed as a decimal string (`"12"`), handled as an integer
/// everywhere else so id arithmetic never goes through string parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlantId(u64);

impl PlantId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The following id, or `None` past `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlantId {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // u64::from_str accepts a leading '+', ids never carry one
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SprigError::InvalidId(s.to_string()));
        }
        trimmed
            .parse()
            .map(PlantId)
            .map_err(|_| SprigError::InvalidId(s.to_string()))
    }
}

impl TryFrom<String> for PlantId {
    type Error = SprigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlantId> for String {
    fn from(id: PlantId) -> Self {
        id.to_string()
    }
}

/// One plant as persisted in the data file.
///
/// The id is not part of the record: it is the key of the surrounding
/// [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(default)]
    pub last_watered: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_image_path", deserialize_with = "null_as_default_image")]
    pub image_path: String,
}

fn default_image_path() -> String {
    DEFAULT_PLANT_IMAGE.to_string()
}

fn null_as_default_image<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_else(default_image_path))
}

impl PlantRecord {
    /// A freshly registered plant: never watered, default image.
    pub fn new(id: PlantId, name: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(id));
        Self {
            last_watered: None,
            name,
            image_path: default_image_path(),
        }
    }

    /// True when the record points at an uploaded photo rather than the default.
    pub fn has_custom_image(&self) -> bool {
        !self.image_path.is_empty() && self.image_path != DEFAULT_PLANT_IMAGE
    }

    /// Fills in values that older or hand-edited documents may lack.
    pub(crate) fn normalize(&mut self, id: PlantId) {
        if self.name.trim().is_empty() {
            self.name = default_name(id);
        }
        if self.image_path.is_empty() {
            self.image_path = default_image_path();
        }
        if self.last_watered.as_deref().is_some_and(|d| d.is_empty()) {
            self.last_watered = None;
        }
    }
}

pub fn default_name(id: PlantId) -> String {
    format!("Plant {}", id)
}

/// All plants, keyed and ordered by id.
pub type Collection = BTreeMap<PlantId, PlantRecord>;

/// Id for the next plant: one past the highest id ever kept, starting at 1.
///
/// Fails once the highest id is `u64::MAX`; ids are never wrapped or reused.
pub fn next_id(plants: &Collection) -> Result<PlantId, SprigError> {
    let highest = plants.keys().next_back().copied().unwrap_or(PlantId(0));
    highest
        .next()
        .ok_or_else(|| SprigError::Store(format!("no plant id left after {}", highest)))
}
