use crate::engine::LayerKind;
use crate::model::GeoBounds;
use geojson::{Geometry, Position, Value as GeoValue};

// Pure geometry helpers used for layer classification and bounds

pub const position_to_coordinate: fn(&Position) -> Option<(f64, f64)> = |position| {
    match position.as_slice() {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some((*x, *y)),
        _ => None,
    }
};

pub const positions_to_coordinates: fn(&[Position]) -> Vec<(f64, f64)> =
    |positions| positions.iter().filter_map(position_to_coordinate).collect();

pub const layer_kind: fn(&GeoValue) -> LayerKind = |value| match value {
    GeoValue::Point(_) | GeoValue::MultiPoint(_) => LayerKind::Marker,
    GeoValue::LineString(_) | GeoValue::MultiLineString(_) => LayerKind::Polyline,
    GeoValue::Polygon(_) | GeoValue::MultiPolygon(_) => LayerKind::Polygon,
    GeoValue::GeometryCollection(_) => LayerKind::Collection,
};

/// Flattens every coordinate of a geometry, descending into collections.
pub fn collect_coordinates(geometry: &Geometry) -> Vec<(f64, f64)> {
    match &geometry.value {
        GeoValue::Point(position) => position_to_coordinate(position).into_iter().collect(),
        GeoValue::MultiPoint(positions) | GeoValue::LineString(positions) => {
            positions_to_coordinates(positions)
        }
        GeoValue::MultiLineString(lines) | GeoValue::Polygon(lines) => lines
            .iter()
            .flat_map(|line| positions_to_coordinates(line))
            .collect(),
        GeoValue::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flat_map(|ring| positions_to_coordinates(ring))
            .collect(),
        GeoValue::GeometryCollection(geometries) => {
            geometries.iter().flat_map(collect_coordinates).collect()
        }
    }
}

pub fn geometry_bounds(geometry: &Geometry) -> Option<GeoBounds> {
    GeoBounds::from_coordinates(&collect_coordinates(geometry))
}
