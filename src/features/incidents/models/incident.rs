use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

/// Incident category; the fixed set accepted at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
pub enum IncidentCategory {
    Fire,
    Flood,
    Accident,
    Electricity,
}

impl std::fmt::Display for IncidentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentCategory::Fire => write!(f, "Fire"),
            IncidentCategory::Flood => write!(f, "Flood"),
            IncidentCategory::Accident => write!(f, "Accident"),
            IncidentCategory::Electricity => write!(f, "Electricity"),
        }
    }
}

impl FromStr for IncidentCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fire" => Ok(IncidentCategory::Fire),
            "Flood" => Ok(IncidentCategory::Flood),
            "Accident" => Ok(IncidentCategory::Accident),
            "Electricity" => Ok(IncidentCategory::Electricity),
            _ => Err(()),
        }
    }
}

/// Handling state. The four values form a validity set, not a forward-only
/// graph: any member may be written at any time by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
pub enum IncidentStatus {
    Reported,
    Verified,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Reported => write!(f, "Reported"),
            IncidentStatus::Verified => write!(f, "Verified"),
            IncidentStatus::InProgress => write!(f, "In Progress"),
            IncidentStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reported" => Ok(IncidentStatus::Reported),
            "Verified" => Ok(IncidentStatus::Verified),
            "In Progress" => Ok(IncidentStatus::InProgress),
            "Resolved" => Ok(IncidentStatus::Resolved),
            _ => Err(()),
        }
    }
}

/// Fixed-schema structured address. Produced by exactly one provider per
/// incident; a field the provider does not supply stays an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressBundle {
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub city: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

/// Address bundle plus the map link derived for it
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EnrichedLocation {
    #[serde(flatten)]
    pub address: AddressBundle,
    pub maps_link: String,
}

/// Database model for a stored incident
#[derive(Debug, Clone, FromRow)]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: IncidentCategory,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: IncidentStatus,
    pub image_url: String,
    pub user_id: String,
    pub department: Option<String>,
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub city: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub maps_link: String,
    pub photo_analysis: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Both values or neither; a half-set pair is never stored.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn address(&self) -> AddressBundle {
        AddressBundle {
            place_name: self.place_name.clone(),
            full_address: self.full_address.clone(),
            nearest_landmark: self.nearest_landmark.clone(),
            area: self.area.clone(),
            city: self.city.clone(),
            taluk: self.taluk.clone(),
            district: self.district.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
            country: self.country.clone(),
        }
    }
}

/// Data for inserting a fully enriched incident
#[derive(Debug)]
pub struct NewIncident {
    pub title: String,
    pub description: Option<String>,
    pub category: IncidentCategory,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: String,
    pub user_id: String,
    pub address: AddressBundle,
    pub maps_link: String,
    pub photo_analysis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_the_four_values() {
        assert_eq!(
            "In Progress".parse::<IncidentStatus>(),
            Ok(IncidentStatus::InProgress)
        );
        assert_eq!("Resolved".parse::<IncidentStatus>(), Ok(IncidentStatus::Resolved));
        assert!("Closed".parse::<IncidentStatus>().is_err());
        assert!("resolved".parse::<IncidentStatus>().is_err());
    }

    #[test]
    fn category_display_roundtrip() {
        for category in [
            IncidentCategory::Fire,
            IncidentCategory::Flood,
            IncidentCategory::Accident,
            IncidentCategory::Electricity,
        ] {
            assert_eq!(category.to_string().parse::<IncidentCategory>(), Ok(category));
        }
        assert!("Earthquake".parse::<IncidentCategory>().is_err());
    }
}
