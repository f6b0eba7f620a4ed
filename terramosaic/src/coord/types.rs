//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Slippy map zoom range
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Tile coordinates in the Web Mercator / Slippy Map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// X coordinate (east-west), 0 at 180°W
    pub x: u32,
    /// Y coordinate (north-south), 0 at the northern Mercator limit
    pub y: u32,
    /// Zoom level (0-22)
    pub z: u8,
}

impl TileCoord {
    /// Creates a tile coordinate, checking it lies inside the grid for its zoom.
    pub fn new(x: u32, y: u32, z: u8) -> Result<Self, CoordError> {
        if z > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(z));
        }
        let n = tiles_per_axis(z);
        if u64::from(x) >= n || u64::from(y) >= n {
            return Err(CoordError::OutOfGrid { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Geographic extent covered by this tile.
    pub fn bounds(&self) -> BoundingBox {
        let (max_lat, min_lng) = super::tile_to_lat_lon(self);
        let (min_lat, max_lng) = super::tile_to_lat_lon(&TileCoord {
            x: self.x + 1,
            y: self.y + 1,
            z: self.z,
        });

        BoundingBox {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of tiles along one axis of the grid at `zoom`.
#[inline]
pub fn tiles_per_axis(zoom: u8) -> u64 {
    1u64 << zoom
}

/// Rectangular geographic area in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting inverted or out-of-range edges.
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Result<Self, CoordError> {
        for lat in [min_lat, max_lat] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(CoordError::InvalidLatitude(lat));
            }
        }
        for lng in [min_lng, max_lng] {
            if !(MIN_LON..=MAX_LON).contains(&lng) {
                return Err(CoordError::InvalidLongitude(lng));
            }
        }
        if min_lat >= max_lat || min_lng >= max_lng {
            return Err(CoordError::EmptyBoundingBox {
                min_lat,
                max_lat,
                min_lng,
                max_lng,
            });
        }

        Ok(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Check if a coordinate is within the bounds (edges inclusive).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lat, self.max_lat, self.min_lng, self.max_lng
        )
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 22)
    InvalidZoom(u8),
    /// Tile index does not exist at this zoom
    OutOfGrid { x: u32, y: u32, z: u8 },
    /// Bounding box edges are inverted or collapsed
    EmptyBoundingBox {
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::OutOfGrid { x, y, z } => {
                write!(f, "Tile x={} y={} does not exist at zoom {}", x, y, z)
            }
            CoordError::EmptyBoundingBox {
                min_lat,
                max_lat,
                min_lng,
                max_lng,
            } => {
                write!(
                    f,
                    "Invalid bounding box: latitude {}..{}, longitude {}..{} \
                     (minimum must be less than maximum)",
                    min_lat, max_lat, min_lng, max_lng
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
