//! Domain types for SwimSampler.

pub mod division;
pub mod ids;
pub mod swimmer;

pub use division::{DivisionSurvey, SurveyedTeam, TeamAllocation, TeamEntry};
pub use ids::{SwimmerId, TeamId};
pub use swimmer::{BestTime, SwimRecord, Swimmer};

/// Event name type alias (e.g. "100 Breast").
pub type Event = String;
