//! Safety assessment: hazard detection, standards compliance, and the
//! score/risk reduction.

pub mod compliance;
pub mod hazards;
pub mod score;
pub mod standards;

pub use compliance::check_all as check_compliance;
pub use hazards::{detect as detect_hazards, incident_energy, ppe_category};
pub use score::assess;
pub use standards::SafetyStandards;
