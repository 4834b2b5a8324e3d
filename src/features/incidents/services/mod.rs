pub mod coordinate_resolver;
pub mod enrichment_service;
pub mod incident_service;
pub mod nearby;

pub use enrichment_service::{EnrichmentService, IncidentSubmission};
pub use incident_service::{IncidentFilters, IncidentService};
