//! Map viewport and the projection between terminal cells and coordinates.
//!
//! The map is plate carrée: longitude runs linearly across the columns,
//! latitude linearly down the rows.

use ratatui::layout::Rect;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Coordinate;

pub const MAX_ZOOM: u8 = 4;

/// Longitude/latitude rectangle visible on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Bounds {
    pub const WORLD: Bounds = Bounds {
        west: -180.0,
        east: 180.0,
        south: -90.0,
        north: 90.0,
    };

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.west..=self.east).contains(&coord.lon)
            && (self.south..=self.north).contains(&coord.lat)
    }
}

/// Which part of the world the map shows. Each zoom level halves both spans.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapViewport {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::world()
    }
}

impl MapViewport {
    pub const fn world() -> Self {
        Self {
            center: Coordinate::new(0.0, 0.0),
            zoom: 0,
        }
    }

    /// (longitude span, latitude span) in degrees
    pub fn span(&self) -> (f64, f64) {
        let scale = f64::from(1u32 << self.zoom.min(MAX_ZOOM));
        (360.0 / scale, 180.0 / scale)
    }

    /// Visible rectangle, slid back inside the globe when the center is
    /// too close to an edge.
    pub fn bounds(&self) -> Bounds {
        let (lon_span, lat_span) = self.span();
        let half_lon = lon_span / 2.0;
        let half_lat = lat_span / 2.0;
        let lon = self.center.lon.clamp(-180.0 + half_lon, 180.0 - half_lon);
        let lat = self.center.lat.clamp(-90.0 + half_lat, 90.0 - half_lat);
        Bounds {
            west: lon - half_lon,
            east: lon + half_lon,
            south: lat - half_lat,
            north: lat + half_lat,
        }
    }

    pub fn zoomed_in(&self, focus: Coordinate) -> Self {
        Self {
            center: focus,
            zoom: self.zoom.saturating_add(1).min(MAX_ZOOM),
        }
    }

    pub fn zoomed_out(&self) -> Self {
        let zoom = self.zoom.min(MAX_ZOOM);
        if zoom <= 1 {
            return Self::world();
        }
        Self {
            center: self.center,
            zoom: zoom - 1,
        }
    }

    /// Crosshair step for one key press: 1/40 of the width, 1/20 of the
    /// height.
    pub fn cursor_step(&self) -> (f64, f64) {
        let (lon_span, lat_span) = self.span();
        (lat_span / 20.0, lon_span / 40.0)
    }
}

/// Maps cells of a rendered map area to coordinates and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub area: Rect,
    pub bounds: Bounds,
}

impl Projection {
    pub fn new(area: Rect, bounds: Bounds) -> Self {
        Self { area, bounds }
    }

    /// Coordinate under the center of the cell at (`column`, `row`), in
    /// absolute terminal positions. `None` outside the area.
    pub fn coordinate_at(&self, column: u16, row: u16) -> Option<Coordinate> {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        let Bounds {
            west,
            east,
            south,
            north,
        } = self.bounds;
        Some(Coordinate::new(
            round_coord(north - fy * (north - south)),
            round_coord(west + fx * (east - west)),
        ))
    }

    /// Cell containing `coord`, or `None` when it is outside the viewport.
    pub fn cell_for(&self, coord: Coordinate) -> Option<(u16, u16)> {
        let area = self.area;
        if area.width == 0 || area.height == 0 || !self.bounds.contains(coord) {
            return None;
        }

        let Bounds {
            west,
            east,
            south,
            north,
        } = self.bounds;
        let fx = (coord.lon - west) / (east - west);
        let fy = (north - coord.lat) / (north - south);
        let col = ((fx * f64::from(area.width)).floor() as u16).min(area.width - 1);
        let row = ((fy * f64::from(area.height)).floor() as u16).min(area.height - 1);
        Some((area.x + col, area.y + row))
    }
}

/// Round to the 2-decimal grid used for map picks.
pub fn round_coord(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
