use anyhow::{bail, Context};
use chrono::NaiveDate;
use firecore::GeoPoint;

/// Axis-aligned lon/lat box in the provider's `minLon,minLat,maxLon,maxLat`
/// order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let values = text
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .with_context(|| format!("bounding box component '{}'", part))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let [min_lon, min_lat, max_lon, max_lat] = values[..] else {
            bail!("bounding box needs four components, got {}", values.len());
        };
        if min_lon > max_lon || min_lat > max_lat {
            bail!("bounding box '{}' has inverted corners", text);
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// A named historical fire used to seed synthetic scenarios.
#[derive(Debug, Clone, Copy)]
pub struct FireTemplate {
    pub name: &'static str,
    pub bounding_box: &'static str,
    pub start_date: &'static str,
    pub end_date: &'static str,
}

impl FireTemplate {
    pub fn bounds(&self) -> anyhow::Result<BoundingBox> {
        BoundingBox::parse(self.bounding_box)
    }

    pub fn start(&self) -> anyhow::Result<NaiveDate> {
        NaiveDate::parse_from_str(self.start_date, "%Y-%m-%d")
            .with_context(|| format!("start date of {}", self.name))
    }

    pub fn end(&self) -> anyhow::Result<NaiveDate> {
        NaiveDate::parse_from_str(self.end_date, "%Y-%m-%d")
            .with_context(|| format!("end date of {}", self.name))
    }
}

pub const HISTORICAL_FIRES: [FireTemplate; 2] = [
    FireTemplate {
        name: "Eaton",
        bounding_box: "-118.176917,34.114582,-118.004912,34.273324",
        start_date: "2025-01-07",
        end_date: "2025-01-31",
    },
    FireTemplate {
        name: "Palisades",
        bounding_box: "-118.654052,33.987455,-118.450805,34.171152",
        start_date: "2025-01-07",
        end_date: "2025-01-31",
    },
];

pub fn find_template(name: &str) -> Option<&'static FireTemplate> {
    HISTORICAL_FIRES
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(name))
}
