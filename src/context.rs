//! Ambient context for rule evaluation.
//!
//! Context is the slowly-changing, non-frame input to the decision engine:
//! the time-of-day bucket and the resolved location. Location is resolved
//! once at provider construction and cached for the process lifetime; the
//! nighttime flag is recomputed from the local clock on every call.

use chrono::{Local, Timelike};

/// City name used when location resolution fails or is disabled.
pub const UNKNOWN_CITY: &str = "Unknown";

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// (latitude, longitude) when resolution succeeded.
    pub coordinates: Option<(f64, f64)>,
    pub city: String,
}

impl Location {
    pub fn unknown() -> Self {
        Self {
            coordinates: None,
            city: UNKNOWN_CITY.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    pub nighttime: bool,
    pub location: Location,
}

/// Nighttime bucket: local hour before 06:00 or from 18:00 onward.
pub fn is_nighttime_at(hour: u32) -> bool {
    hour < 6 || hour >= 18
}

/// Supplies ambient facts to the decision loop.
pub trait ContextProvider {
    fn context(&self) -> Context;
}

/// Provider backed by the system clock and a location resolved at startup.
pub struct SystemContextProvider {
    location: Location,
}

impl SystemContextProvider {
    /// Resolve location once and cache it. Resolution failure degrades to
    /// an unknown location and is logged, never propagated.
    pub fn new(geolocate: bool) -> Self {
        let location = if geolocate {
            resolve_location()
        } else {
            Location::unknown()
        };
        if location.coordinates.is_none() {
            log::info!("location unresolved, incidents will record city={}", location.city);
        } else {
            log::info!("location resolved: city={}", location.city);
        }
        Self { location }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl ContextProvider for SystemContextProvider {
    fn context(&self) -> Context {
        Context {
            nighttime: is_nighttime_at(Local::now().hour()),
            location: self.location.clone(),
        }
    }
}

/// Test double returning a preset context.
pub struct FixedContextProvider {
    context: Context,
}

impl FixedContextProvider {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub fn nighttime(nighttime: bool) -> Self {
        Self {
            context: Context {
                nighttime,
                location: Location::unknown(),
            },
        }
    }
}

impl ContextProvider for FixedContextProvider {
    fn context(&self) -> Context {
        self.context.clone()
    }
}

#[cfg(feature = "geolocate")]
fn resolve_location() -> Location {
    match query_ip_geolocation() {
        Ok(location) => location,
        Err(e) => {
            log::warn!("ip geolocation failed: {}", e);
            Location::unknown()
        }
    }
}

#[cfg(feature = "geolocate")]
fn query_ip_geolocation() -> anyhow::Result<Location> {
    let body: serde_json::Value = ureq::get("http://ip-api.com/json/")
        .timeout(std::time::Duration::from_secs(5))
        .call()?
        .into_json()?;

    if body.get("status").and_then(|s| s.as_str()) != Some("success") {
        anyhow::bail!("geolocation endpoint returned non-success status");
    }

    let city = body
        .get("city")
        .and_then(|c| c.as_str())
        .unwrap_or(UNKNOWN_CITY)
        .to_string();
    let coordinates = match (
        body.get("lat").and_then(|v| v.as_f64()),
        body.get("lon").and_then(|v| v.as_f64()),
    ) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    };

    Ok(Location { coordinates, city })
}

#[cfg(not(feature = "geolocate"))]
fn resolve_location() -> Location {
    log::debug!("geolocate feature disabled, using unknown location");
    Location::unknown()
}
