use crate::app_config::AppConfig;
use crate::coordinate::{self, Coordinate};
use crate::ConfigError;

/// Positioning service used when `LOGITRACK_GEOLOCATE_URL` is unset.
pub const DEFAULT_GEOLOCATE_URL: &str = "https://api.beacondb.net/v1/geolocate";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Applies the "unconfigured remote" rule to a raw sheet endpoint value.
///
/// Deployments ship with placeholder values until the sheet endpoint is
/// provisioned, so anything empty or not an absolute http(s) URL means no
/// remote channel is configured.
#[must_use]
pub fn configured_sheet_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_ascii_lowercase();
    if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
        return None;
    }
    Some(trimmed.to_string())
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let sheet_url = lookup("LOGITRACK_SHEET_URL")
        .ok()
        .and_then(|raw| configured_sheet_url(&raw));
    let geolocate_url = or_default("LOGITRACK_GEOLOCATE_URL", DEFAULT_GEOLOCATE_URL);
    let data_dir = PathBuf::from(or_default("LOGITRACK_DATA_DIR", "./data"));

    let bind_addr = parse("LOGITRACK_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("LOGITRACK_LOG_LEVEL", "info");

    let high_accuracy_timeout_secs = parse_u64("LOGITRACK_HIGH_ACCURACY_TIMEOUT_SECS", "10")?;
    let low_accuracy_timeout_secs = parse_u64("LOGITRACK_LOW_ACCURACY_TIMEOUT_SECS", "20")?;
    let max_position_age_secs = parse_u64("LOGITRACK_MAX_POSITION_AGE_SECS", "60")?;
    let max_position_attempts = parse_u32("LOGITRACK_MAX_POSITION_ATTEMPTS", "2")?;

    let request_timeout_secs = parse_u64("LOGITRACK_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default(
        "LOGITRACK_USER_AGENT",
        "logitrack/0.1 (package-registration)",
    );

    let pickup_point = match lookup("LOGITRACK_PICKUP_POINT") {
        Ok(raw) => parse_coordinate_pair("LOGITRACK_PICKUP_POINT", &raw)?,
        Err(_) => coordinate::default_pickup_point(),
    };
    let pickup_name = or_default("LOGITRACK_PICKUP_NAME", coordinate::PICKUP_NAME);

    Ok(AppConfig {
        sheet_url,
        geolocate_url,
        data_dir,
        bind_addr,
        log_level,
        high_accuracy_timeout_secs,
        low_accuracy_timeout_secs,
        max_position_age_secs,
        max_position_attempts,
        request_timeout_secs,
        user_agent,
        pickup_point,
        pickup_name,
    })
}

/// Parse a `"lat,lng"` pair into a validated [`Coordinate`].
fn parse_coordinate_pair(var: &str, raw: &str) -> Result<Coordinate, ConfigError> {
    let mut parts = raw.splitn(2, ',');
    let component = |part: Option<&str>| part.map(str::trim).and_then(|v| v.parse::<f64>().ok());

    match (component(parts.next()), component(parts.next())) {
        (Some(lat), Some(lng)) => {
            Coordinate::new(lat, lng).map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
        }
        _ => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected \"lat,lng\", got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert!(cfg.sheet_url.is_none());
        assert_eq!(cfg.geolocate_url, DEFAULT_GEOLOCATE_URL);
        assert_eq!(cfg.data_dir.to_string_lossy(), "./data");
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.high_accuracy_timeout_secs, 10);
        assert_eq!(cfg.low_accuracy_timeout_secs, 20);
        assert_eq!(cfg.max_position_age_secs, 60);
        assert_eq!(cfg.max_position_attempts, 2);
        assert_eq!(cfg.request_timeout_secs, 15);
        assert_eq!(cfg.user_agent, "logitrack/0.1 (package-registration)");
        assert_eq!(cfg.pickup_point, coordinate::default_pickup_point());
        assert_eq!(cfg.pickup_name, coordinate::PICKUP_NAME);
    }

    #[test]
    fn build_app_config_accepts_a_real_sheet_url() {
        let mut map = HashMap::new();
        map.insert("LOGITRACK_SHEET_URL", "https://sheets.example.com/exec");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.sheet_url.as_deref(),
            Some("https://sheets.example.com/exec")
        );
    }

    #[test]
    fn build_app_config_treats_placeholder_sheet_url_as_unset() {
        let mut map = HashMap::new();
        map.insert("LOGITRACK_SHEET_URL", "TU_SHEET_ID_AQUI");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.sheet_url.is_none());
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("LOGITRACK_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOGITRACK_BIND_ADDR"),
            "expected InvalidEnvVar(LOGITRACK_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_ladder_overrides() {
        let mut map = HashMap::new();
        map.insert("LOGITRACK_HIGH_ACCURACY_TIMEOUT_SECS", "5");
        map.insert("LOGITRACK_LOW_ACCURACY_TIMEOUT_SECS", "30");
        map.insert("LOGITRACK_MAX_POSITION_ATTEMPTS", "3");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.high_accuracy_timeout_secs, 5);
        assert_eq!(cfg.low_accuracy_timeout_secs, 30);
        assert_eq!(cfg.max_position_attempts, 3);
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = HashMap::new();
        map.insert("LOGITRACK_HIGH_ACCURACY_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOGITRACK_HIGH_ACCURACY_TIMEOUT_SECS"),
            "expected InvalidEnvVar(LOGITRACK_HIGH_ACCURACY_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_parses_pickup_point_override() {
        let mut map = HashMap::new();
        map.insert("LOGITRACK_PICKUP_POINT", "-12.5, -76.9");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.pickup_point, Coordinate::new(-12.5, -76.9).unwrap());
    }

    #[test]
    fn build_app_config_rejects_malformed_pickup_point() {
        for raw in ["-12.5", "lat,lng", "-12.5,-200.0"] {
            let mut map = HashMap::new();
            map.insert("LOGITRACK_PICKUP_POINT", raw);
            let result = build_app_config(lookup_from_map(&map));
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOGITRACK_PICKUP_POINT"),
                "expected InvalidEnvVar(LOGITRACK_PICKUP_POINT) for {raw:?}, got: {result:?}"
            );
        }
    }

    #[test]
    fn configured_sheet_url_filters_placeholders() {
        assert_eq!(configured_sheet_url(""), None);
        assert_eq!(configured_sheet_url("   "), None);
        assert_eq!(configured_sheet_url("TU_SHEET_ID_AQUI"), None);
        assert_eq!(configured_sheet_url("sheets.example.com"), None);
        assert_eq!(
            configured_sheet_url(" https://sheets.example.com/exec "),
            Some("https://sheets.example.com/exec".to_string())
        );
        assert_eq!(
            configured_sheet_url("http://localhost:5000/api/registrations"),
            Some("http://localhost:5000/api/registrations".to_string())
        );
    }
}
