use crate::generator::template::find_template;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use firecore::detection::Confidence;
use firecore::math::destination_point;
use firecore::{GeoPoint, RawDetection};
use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Separation between the origins of consecutive synthetic fires.
const FIRE_SPACING_M: f64 = 60_000.0;
/// Nearest distance of scattered noise hotspots beyond the last fire.
const NOISE_STANDOFF_M: f64 = 150_000.0;

const DEFAULT_ORIGIN: (f64, f64) = (34.05, -118.24);
const DEFAULT_START: (i32, u32, u32) = (2025, 1, 7);

/// Configuration for generating synthetic hotspot detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub fires: usize,
    pub detections_per_fire: usize,
    pub spread_m_per_hour: f64,
    pub heading_deg: f64,
    pub interval_minutes: i64,
    /// Positional noise added to each detection, in degrees.
    pub jitter_deg: f64,
    pub brightness: f64,
    pub noise_points: usize,
    pub seed: u64,
    pub template: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fires: 3,
            detections_per_fire: 8,
            spread_m_per_hour: 400.0,
            heading_deg: 45.0,
            interval_minutes: 90,
            jitter_deg: 0.002,
            brightness: 330.0,
            noise_points: 5,
            seed: 0,
            template: None,
        }
    }
}

/// Where and when a scenario begins, plus the last day of its template.
struct ScenarioAnchor {
    origin: GeoPoint,
    start: DateTime<Utc>,
    last_day: Option<NaiveDate>,
}

impl GeneratorConfig {
    fn anchor(&self) -> anyhow::Result<ScenarioAnchor> {
        match self.template.as_deref() {
            Some(name) => {
                let template = find_template(name)
                    .ok_or_else(|| anyhow!("unknown fire template '{}'", name))?;
                Ok(ScenarioAnchor {
                    origin: template.bounds()?.center(),
                    start: midnight(template.start()?)?,
                    last_day: Some(template.end()?),
                })
            }
            None => {
                let (year, month, day) = DEFAULT_START;
                let start = NaiveDate::from_ymd_opt(year, month, day)
                    .context("default scenario start date")?;
                Ok(ScenarioAnchor {
                    origin: GeoPoint::new(DEFAULT_ORIGIN.0, DEFAULT_ORIGIN.1),
                    start: midnight(start)?,
                    last_day: None,
                })
            }
        }
    }
}

fn midnight(date: NaiveDate) -> anyhow::Result<DateTime<Utc>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .context("midnight of scenario start")?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn symmetric(rng: &mut StdRng, half_width: f64) -> f64 {
    if half_width > 0.0 {
        rng.gen_range(-half_width..half_width)
    } else {
        0.0
    }
}

/// FIRMS-style row: date as `YYYY-MM-DD`, time as `HHMM` without leading zeros.
fn firms_row(
    point: GeoPoint,
    at: DateTime<Utc>,
    brightness: f64,
    confidence: &str,
) -> RawDetection {
    let time = at.format("%H%M").to_string();
    let trimmed = time.trim_start_matches('0');
    RawDetection {
        latitude: Some(point.latitude),
        longitude: Some(point.longitude),
        brightness: Some(brightness),
        confidence: Some(Confidence::Label(confidence.to_string())),
        satellite: Some("N".to_string()),
        instrument: Some("VIIRS".to_string()),
        acq_date: Some(at.format("%Y-%m-%d").to_string()),
        acq_time: Some(if trimmed.is_empty() { "0" } else { trimmed }.to_string()),
        timestamp: None,
    }
}

/// Generates `fires` advancing fire fronts plus scattered noise hotspots.
/// Output is deterministic for a given seed.
pub fn build_detections(config: &GeneratorConfig) -> anyhow::Result<Vec<RawDetection>> {
    let ScenarioAnchor {
        origin,
        start,
        last_day,
    } = config.anchor()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let interval = Duration::minutes(config.interval_minutes.max(1));
    let final_step = config.detections_per_fire.saturating_sub(1) as i32;
    if let Some(last_day) = last_day {
        if (start + interval * final_step).date_naive() > last_day {
            warn!("synthetic fire fronts run past the template end date {}", last_day);
        }
    }
    let mut rows =
        Vec::with_capacity(config.fires * config.detections_per_fire + config.noise_points);

    for fire_index in 0..config.fires {
        let fire_origin = destination_point(
            origin.latitude,
            origin.longitude,
            90.0,
            fire_index as f64 * FIRE_SPACING_M,
        );
        let heading = (config.heading_deg + fire_index as f64 * 30.0).rem_euclid(360.0);

        for step in 0..config.detections_per_fire {
            let at = start + interval * step as i32;
            let hours = (at - start).num_minutes() as f64 / 60.0;
            let front = destination_point(
                fire_origin.latitude,
                fire_origin.longitude,
                heading,
                config.spread_m_per_hour * hours,
            );
            let point = GeoPoint::new(
                front.latitude + symmetric(&mut rng, config.jitter_deg),
                front.longitude + symmetric(&mut rng, config.jitter_deg),
            );
            let brightness = config.brightness + symmetric(&mut rng, 15.0);
            rows.push(firms_row(point, at, brightness, "n"));
        }
    }

    let standoff = NOISE_STANDOFF_M + config.fires as f64 * FIRE_SPACING_M;
    for _ in 0..config.noise_points {
        let bearing = rng.gen_range(0.0..360.0);
        let distance = standoff + rng.gen_range(0.0..standoff);
        let point = destination_point(origin.latitude, origin.longitude, bearing, distance);
        let offset = Duration::minutes(rng.gen_range(0..24 * 60));
        rows.push(firms_row(point, start + offset, config.brightness - 20.0, "l"));
    }

    Ok(rows)
}
