pub mod app_config;
pub mod candidates;
pub mod config;
pub mod machine;
pub mod normalize;

pub use app_config::{AppConfig, Environment};
pub use candidates::CandidateGenerator;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use machine::{Coordinates, DetailUpdate, GeoLocation, MachineDetails, MachineRecord, Region};
pub use normalize::{normalize_line, strip_annotation};
