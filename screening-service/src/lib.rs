pub mod config;
pub mod engine;
pub mod error;
pub mod restricted;
pub mod types;

pub use config::ScreeningConfig;
pub use engine::ScreeningEngine;
pub use error::{Error, Result};
pub use restricted::{IndexedList, NameMatch, RestrictedPartyRegistry};
pub use types::{
    MatchType, RestrictedPartyEntry, RiskLevel, ScanMatch, ScanPhase, ScanResult,
};
