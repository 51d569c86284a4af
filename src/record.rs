use serde::{Deserialize, Serialize};

/// Sentinel used for any text field whose value could not be resolved.
pub const UNKNOWN: &str = "unknown";

/// Primary category of an extracted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Nature,
    HumanAccident,
    HumanDeliberate,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Nature => "nature",
            EventType::HumanAccident => "human_accident",
            EventType::HumanDeliberate => "human_deliberate",
        }
    }
}

/// Subcategory, scoped to its parent [`EventType`] by the event classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSubtype {
    Other,
    // nature
    Earthquake,
    Tsunami,
    Flood,
    TropicalCyclone,
    Tornado,
    VolcanicEruption,
    Avalanche,
    Landslide,
    Drought,
    Pandemic,
    Wildfire,
    Blizzard,
    HeatWave,
    ColdWave,
    // human_deliberate
    Terrorism,
    MassShooting,
    Arson,
    Sabotage,
    Genocide,
    // human_accident
    Explosion,
    Fire,
    TransportAccident,
    TrainAccident,
    MaritimeAccident,
    CrowdCrush,
    IndustrialAccident,
    MiningAccident,
    ChemicalAccident,
    NuclearAccident,
    EnvironmentalDisaster,
}

impl EventSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSubtype::Other => "other",
            EventSubtype::Earthquake => "earthquake",
            EventSubtype::Tsunami => "tsunami",
            EventSubtype::Flood => "flood",
            EventSubtype::TropicalCyclone => "tropical_cyclone",
            EventSubtype::Tornado => "tornado",
            EventSubtype::VolcanicEruption => "volcanic_eruption",
            EventSubtype::Avalanche => "avalanche",
            EventSubtype::Landslide => "landslide",
            EventSubtype::Drought => "drought",
            EventSubtype::Pandemic => "pandemic",
            EventSubtype::Wildfire => "wildfire",
            EventSubtype::Blizzard => "blizzard",
            EventSubtype::HeatWave => "heat_wave",
            EventSubtype::ColdWave => "cold_wave",
            EventSubtype::Terrorism => "terrorism",
            EventSubtype::MassShooting => "mass_shooting",
            EventSubtype::Arson => "arson",
            EventSubtype::Sabotage => "sabotage",
            EventSubtype::Genocide => "genocide",
            EventSubtype::Explosion => "explosion",
            EventSubtype::Fire => "fire",
            EventSubtype::TransportAccident => "transport_accident",
            EventSubtype::TrainAccident => "train_accident",
            EventSubtype::MaritimeAccident => "maritime_accident",
            EventSubtype::CrowdCrush => "crowd_crush",
            EventSubtype::IndustrialAccident => "industrial_accident",
            EventSubtype::MiningAccident => "mining_accident",
            EventSubtype::ChemicalAccident => "chemical_accident",
            EventSubtype::NuclearAccident => "nuclear_accident",
            EventSubtype::EnvironmentalDisaster => "environmental_disaster",
        }
    }
}

/// One normalized disaster event, fully populated in a single pass by the
/// assembler that produced it. Serde renames match the CSV column set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRecord {
    /// `None` means the toll could not be resolved; such records are
    /// dropped at the merge step before the dataset is written.
    #[serde(rename = "Death toll")]
    pub death_toll: Option<u32>,
    #[serde(rename = "Event")]
    pub event_name: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Country")]
    pub country: String,
    /// Canonical `YYYY-MM-DD`, or the `"unknown"` sentinel.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "Event Type")]
    pub event_type: EventType,
    #[serde(rename = "Event Subtype")]
    pub event_subtype: EventSubtype,
    #[serde(rename = "URL")]
    pub source_url: String,
}
