pub mod incident;
pub mod upload;

pub use incident::{
    AddressBundle, EnrichedLocation, Incident, IncidentCategory, IncidentStatus, NewIncident,
};
pub use upload::ImageUpload;
