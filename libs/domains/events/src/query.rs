//! Normalization of the raw query string into typed search parameters.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{EventError, EventResult};
use crate::models::EventQuery;

/// Result cap applied when `limit` is absent or unusable.
pub const DEFAULT_LIMIT: i64 = 5;

/// Fully normalized search parameters, ready to be turned into a
/// storage filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub geo: Option<GeoFilter>,
    pub dates: Option<DateFilter>,
    pub limit: i64,
}

/// Proximity constraint around a point, GeoJSON axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub lon: f64,
    pub lat: f64,
    /// Maximum distance from the center in meters, unbounded if absent.
    pub max_distance: Option<f64>,
}

/// Date-range constraint on the event's start and end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateFilter {
    /// Events overlapping the inclusive window: start or end falls
    /// within `[from, to]`.
    Between {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// Events starting at or after the bound.
    From(DateTime<Utc>),
    /// Events ending at or before the bound.
    Until(DateTime<Utc>),
}

impl SearchParams {
    /// Normalizes a raw query. Recoverable oddities (absent or garbage
    /// `limit`, an unpaired coordinate) fall back to defaults; values
    /// that are present but out of range are rejected.
    pub fn from_query(query: &EventQuery) -> EventResult<Self> {
        Ok(Self {
            geo: parse_geo(query)?,
            dates: parse_dates(query)?,
            limit: parse_limit(query.limit.as_deref()),
        })
    }
}

// Empty strings in the query string count as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_limit(raw: Option<&str>) -> i64 {
    let Some(raw) = non_empty(raw) else {
        return DEFAULT_LIMIT;
    };
    match raw.parse::<f64>() {
        Ok(n) if n.floor() >= 1.0 => n.floor() as i64,
        _ => DEFAULT_LIMIT,
    }
}

// A coordinate on its own cannot center a search, so a lone lat or lon
// is ignored rather than rejected.
fn parse_geo(query: &EventQuery) -> EventResult<Option<GeoFilter>> {
    let (Some(lat_raw), Some(lon_raw)) = (
        non_empty(query.lat.as_deref()),
        non_empty(query.lon.as_deref()),
    ) else {
        return Ok(None);
    };

    let lat: f64 = lat_raw
        .parse()
        .map_err(|_| EventError::InvalidParameter("lat"))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(EventError::InvalidParameter("lat"));
    }

    let lon: f64 = lon_raw
        .parse()
        .map_err(|_| EventError::InvalidParameter("lon"))?;
    if !(-180.0..=180.0).contains(&lon) {
        return Err(EventError::InvalidParameter("lon"));
    }

    let max_distance = match non_empty(query.distance.as_deref()) {
        Some(raw) => {
            let distance: f64 = raw
                .parse()
                .map_err(|_| EventError::InvalidParameter("distance"))?;
            if !distance.is_finite() || distance < 0.0 {
                return Err(EventError::InvalidParameter("distance"));
            }
            Some(distance)
        }
        None => None,
    };

    Ok(Some(GeoFilter {
        lon,
        lat,
        max_distance,
    }))
}

fn parse_dates(query: &EventQuery) -> EventResult<Option<DateFilter>> {
    let from = non_empty(query.from_date.as_deref())
        .map(|raw| parse_date(raw, "from_date"))
        .transpose()?;
    let to = non_empty(query.to_date.as_deref())
        .map(|raw| parse_date(raw, "to_date"))
        .transpose()?;

    match (from, to) {
        (Some(from), Some(to)) => {
            if to <= from {
                return Err(EventError::InvalidDateRange);
            }
            Ok(Some(DateFilter::Between { from, to }))
        }
        (Some(from), None) => Ok(Some(DateFilter::From(from))),
        (None, Some(to)) => Ok(Some(DateFilter::Until(to))),
        (None, None) => Ok(None),
    }
}

// Calendar dates anchor at midnight UTC.
fn parse_date(raw: &str, field: &'static str) -> EventResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| EventError::InvalidDate(field))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or(EventError::InvalidDate(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> EventQuery {
        EventQuery::default()
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let params = SearchParams::from_query(&query()).unwrap();
        assert_eq!(params.geo, None);
        assert_eq!(params.dates, None);
        assert_eq!(params.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_is_floored() {
        let mut q = query();
        q.limit = Some("7.9".to_string());
        assert_eq!(SearchParams::from_query(&q).unwrap().limit, 7);
    }

    #[test]
    fn test_unusable_limit_falls_back_to_default() {
        for raw in ["abc", "0", "-3", ""] {
            let mut q = query();
            q.limit = Some(raw.to_string());
            assert_eq!(
                SearchParams::from_query(&q).unwrap().limit,
                DEFAULT_LIMIT,
                "limit={raw:?}"
            );
        }
    }

    #[test]
    fn test_geo_pair_with_distance() {
        let mut q = query();
        q.lat = Some("37.7".to_string());
        q.lon = Some("-122.4".to_string());
        q.distance = Some("5000".to_string());
        let geo = SearchParams::from_query(&q).unwrap().geo.unwrap();
        assert_eq!(geo.lat, 37.7);
        assert_eq!(geo.lon, -122.4);
        assert_eq!(geo.max_distance, Some(5000.0));
    }

    #[test]
    fn test_lone_coordinate_is_ignored() {
        let mut q = query();
        q.lat = Some("37.7".to_string());
        assert_eq!(SearchParams::from_query(&q).unwrap().geo, None);

        let mut q = query();
        q.lon = Some("-122.4".to_string());
        assert_eq!(SearchParams::from_query(&q).unwrap().geo, None);
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let mut q = query();
        q.lat = Some("91".to_string());
        q.lon = Some("0".to_string());
        assert!(matches!(
            SearchParams::from_query(&q),
            Err(EventError::InvalidParameter("lat"))
        ));

        let mut q = query();
        q.lat = Some("0".to_string());
        q.lon = Some("-181".to_string());
        assert!(matches!(
            SearchParams::from_query(&q),
            Err(EventError::InvalidParameter("lon"))
        ));
    }

    #[test]
    fn test_negative_distance_is_rejected() {
        let mut q = query();
        q.lat = Some("0".to_string());
        q.lon = Some("0".to_string());
        q.distance = Some("-1".to_string());
        assert!(matches!(
            SearchParams::from_query(&q),
            Err(EventError::InvalidParameter("distance"))
        ));
    }

    #[test]
    fn test_distance_without_coordinates_is_ignored() {
        let mut q = query();
        q.distance = Some("5000".to_string());
        assert_eq!(SearchParams::from_query(&q).unwrap().geo, None);
    }

    #[test]
    fn test_date_window() {
        let mut q = query();
        q.from_date = Some("2026-03-01".to_string());
        q.to_date = Some("2026-03-31".to_string());
        let dates = SearchParams::from_query(&q).unwrap().dates.unwrap();
        match dates {
            DateFilter::Between { from, to } => {
                assert_eq!(from.to_rfc3339(), "2026-03-01T00:00:00+00:00");
                assert_eq!(to.to_rfc3339(), "2026-03-31T00:00:00+00:00");
            }
            other => panic!("expected a window, got {other:?}"),
        }
    }

    #[test]
    fn test_single_bounds() {
        let mut q = query();
        q.from_date = Some("2026-03-01".to_string());
        assert!(matches!(
            SearchParams::from_query(&q).unwrap().dates,
            Some(DateFilter::From(_))
        ));

        let mut q = query();
        q.to_date = Some("2026-03-31".to_string());
        assert!(matches!(
            SearchParams::from_query(&q).unwrap().dates,
            Some(DateFilter::Until(_))
        ));
    }

    #[test]
    fn test_inverted_or_empty_window_is_rejected() {
        for (from, to) in [("2026-03-31", "2026-03-01"), ("2026-03-01", "2026-03-01")] {
            let mut q = query();
            q.from_date = Some(from.to_string());
            q.to_date = Some(to.to_string());
            assert!(matches!(
                SearchParams::from_query(&q),
                Err(EventError::InvalidDateRange)
            ));
        }
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let mut q = query();
        q.from_date = Some("03/01/2026".to_string());
        assert!(matches!(
            SearchParams::from_query(&q),
            Err(EventError::InvalidDate("from_date"))
        ));
    }
}
