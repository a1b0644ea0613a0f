#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial join between accident points and zone polygons.
//!
//! Containment is decided against the polygon's minimum bounding rectangle,
//! not the polygon itself. Zone risk thresholds were tuned against this
//! approximation, so an exact point-in-polygon test would change every
//! aggregate count. Keep it.
//!
//! [`ZoneIndex`] stores those rectangles in an R-tree so a point is only
//! checked against zones whose envelope can contain it.

use geo::{BoundingRect, Geometry, MultiPolygon};
use rstar::{AABB, Envelope, RTree, RTreeObject};

/// Computes the bounding envelope of a geometry as `[lng, lat]` corners.
///
/// Returns `None` for empty geometries and for geometries with non-finite
/// coordinates, which is how malformed boundaries are excluded from the
/// join.
#[must_use]
pub fn envelope_of(geometry: &Geometry<f64>) -> Option<AABB<[f64; 2]>> {
    let rect = geometry.bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());

    if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(AABB::from_corners([min.x, min.y], [max.x, max.y]))
}

/// Returns `true` if the point falls inside the geometry's bounding box.
///
/// Edges are inclusive. A geometry whose bounding box cannot be computed
/// contains nothing.
#[must_use]
pub fn contains(lng: f64, lat: f64, geometry: &Geometry<f64>) -> bool {
    if !lng.is_finite() || !lat.is_finite() {
        return false;
    }
    envelope_of(geometry).is_some_and(|envelope| envelope.contains_point(&[lng, lat]))
}

/// A zone envelope stored in the R-tree, tagged with the caller's key.
struct ZoneEntry<K> {
    key: K,
    envelope: AABB<[f64; 2]>,
}

impl<K> RTreeObject for ZoneEntry<K> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over zone bounding boxes.
///
/// Built once per aggregation pass from the loaded boundaries.
pub struct ZoneIndex<K> {
    tree: RTree<ZoneEntry<K>>,
    skipped: usize,
}

impl<K> ZoneIndex<K> {
    /// Builds an index from `(key, geometry)` pairs.
    ///
    /// Geometries with no computable bounding box are skipped and counted
    /// in [`ZoneIndex::skipped`].
    pub fn build<'a, I>(zones: I) -> Self
    where
        I: IntoIterator<Item = (K, &'a Geometry<f64>)>,
    {
        let mut skipped = 0;
        let mut entries = Vec::new();

        for (key, geometry) in zones {
            if let Some(envelope) = envelope_of(geometry) {
                entries.push(ZoneEntry { key, envelope });
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} zone(s) with malformed geometry");
        }

        Self {
            tree: RTree::bulk_load(entries),
            skipped,
        }
    }

    /// Returns the keys of every zone whose bounding box contains the point.
    pub fn zones_at(&self, lng: f64, lat: f64) -> impl Iterator<Item = &K> {
        let finite = lng.is_finite() && lat.is_finite();
        let query = AABB::from_point([
            if finite { lng } else { 0.0 },
            if finite { lat } else { 0.0 },
        ]);

        self.tree
            .locate_in_envelope_intersecting(&query)
            .filter(move |_| finite)
            .map(|entry| &entry.key)
    }

    /// Number of zones in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if no zone made it into the index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Number of zones dropped for malformed geometry.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
///
/// Handles both `Polygon` and `MultiPolygon` geometry types; anything else
/// is not a zone boundary.
#[must_use]
pub fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        Geometry::MultiPolygon(mp) => Some(mp),
        Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon, polygon};

    fn parse_geometry(json: &str) -> geojson::Geometry {
        match json.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::Geometry(geometry) => geometry,
            other => panic!("expected a geometry, got {other:?}"),
        }
    }

    fn square(min: f64, max: f64) -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
            (x: min, y: min),
        ])
    }

    /// An L-shaped polygon whose bounding box is `[0,2]x[0,2]` but which
    /// does not cover the top-right quadrant.
    fn l_shape() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 2.0),
            (x: 0.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ])
    }

    #[test]
    fn contains_point_inside_box() {
        assert!(contains(0.5, 0.5, &square(0.0, 1.0)));
        assert!(!contains(1.5, 0.5, &square(0.0, 1.0)));
    }

    #[test]
    fn box_edges_are_inclusive() {
        assert!(contains(1.0, 1.0, &square(0.0, 1.0)));
        assert!(contains(0.0, 0.5, &square(0.0, 1.0)));
    }

    #[test]
    fn concave_corner_counts_as_inside() {
        // Outside the polygon but inside its bounding box.
        assert!(contains(1.5, 1.5, &l_shape()));
    }

    #[test]
    fn empty_geometry_contains_nothing() {
        let empty = Geometry::Polygon(Polygon::new(LineString::new(vec![]), vec![]));
        assert!(envelope_of(&empty).is_none());
        assert!(!contains(0.0, 0.0, &empty));
    }

    #[test]
    fn non_finite_coordinates_are_malformed() {
        let broken = square(0.0, f64::INFINITY);
        assert!(!contains(0.0, 0.0, &broken));
        assert!(!contains(f64::NAN, 0.5, &square(0.0, 1.0)));
    }

    #[test]
    fn index_finds_overlapping_boxes() {
        let a = square(0.0, 2.0);
        let b = square(1.0, 3.0);
        let c = square(10.0, 11.0);
        let index = ZoneIndex::build([("a", &a), ("b", &b), ("c", &c)]);

        let mut hits: Vec<&str> = index.zones_at(1.5, 1.5).copied().collect();
        hits.sort_unstable();
        assert_eq!(hits, vec!["a", "b"]);
        assert_eq!(index.zones_at(5.0, 5.0).count(), 0);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn index_skips_malformed_geometry() {
        let good = square(0.0, 1.0);
        let empty = Geometry::Polygon(Polygon::new(LineString::new(vec![]), vec![]));
        let index = ZoneIndex::build([(1, &good), (2, &empty)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 1);
    }

    #[test]
    fn index_ignores_non_finite_points() {
        let good = square(-1.0, 1.0);
        let index = ZoneIndex::build([(1, &good)]);
        assert_eq!(index.zones_at(f64::NAN, 0.0).count(), 0);
    }

    #[test]
    fn converts_geojson_polygon() {
        let geometry = parse_geometry(
            r#"{
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }"#,
        );
        let mp = to_multipolygon(geometry).unwrap();
        assert_eq!(mp.0.len(), 1);
    }

    #[test]
    fn rejects_non_polygon_geojson() {
        let geometry = parse_geometry(r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#);
        assert!(to_multipolygon(geometry).is_none());
    }
}
