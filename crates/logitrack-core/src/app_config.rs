use std::net::SocketAddr;
use std::path::PathBuf;

use crate::coordinate::Coordinate;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sheet_url: Option<String>,
    pub geolocate_url: String,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub high_accuracy_timeout_secs: u64,
    pub low_accuracy_timeout_secs: u64,
    pub max_position_age_secs: u64,
    pub max_position_attempts: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub pickup_point: Coordinate,
    pub pickup_name: String,
}
