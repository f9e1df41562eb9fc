use crate::core::geo::{LatLng, LatLngBounds};

use rstar::{RTree, RTreeObject, AABB};

/// A spatial item that can be indexed via an R-tree.
/// Envelopes are `[lng, lat]` boxes in degrees.
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub bounds: LatLngBounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(bounds: LatLngBounds, data: T) -> Self {
        Self { bounds, data }
    }

    pub fn from_lat_lng(lat_lng: LatLng, data: T) -> Self {
        Self::new(LatLngBounds::new(lat_lng, lat_lng), data)
    }
}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_envelope(&self.bounds)
    }
}

fn to_envelope(bounds: &LatLngBounds) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.south_west.lng, bounds.south_west.lat],
        [bounds.north_east.lng, bounds.north_east.lat],
    )
}

/// R-tree over geographic bounding boxes
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
    bounds: Option<LatLngBounds>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
            bounds: None,
        }
    }

    pub fn insert(&mut self, item: SpatialItem<T>) {
        self.bounds = Some(match self.bounds.take() {
            Some(b) => b.union(&item.bounds),
            None => item.bounds.clone(),
        });
        self.rtree.insert(item);
    }

    /// Items whose bounds intersect `bounds`
    pub fn query(&self, bounds: &LatLngBounds) -> Vec<&SpatialItem<T>> {
        self.rtree
            .locate_in_envelope_intersecting(&to_envelope(bounds))
            .collect()
    }

    /// Items whose bounds contain `lat_lng`
    pub fn query_point(&self, lat_lng: &LatLng) -> Vec<&SpatialItem<T>> {
        self.query(&LatLngBounds::new(*lat_lng, *lat_lng))
    }

    /// Union of every indexed item's bounds
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
        self.bounds = None;
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_query() {
        let mut index = SpatialIndex::new();
        index.insert(SpatialItem::new(
            LatLngBounds::from_coords(34.0, -119.0, 36.0, -117.0),
            0usize,
        ));
        index.insert(SpatialItem::from_lat_lng(LatLng::new(61.2, -149.9), 1usize));

        assert_eq!(index.len(), 2);

        let hits = index.query_point(&LatLng::new(35.0, -118.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].data, 0);

        let alaska = index.query(&LatLngBounds::from_coords(60.0, -151.0, 62.0, -148.0));
        assert_eq!(alaska.len(), 1);
        assert_eq!(alaska[0].data, 1);
    }

    #[test]
    fn test_bounds_track_inserts() {
        let mut index = SpatialIndex::new();
        assert!(index.bounds().is_none());

        index.insert(SpatialItem::from_lat_lng(LatLng::new(10.0, 20.0), ()));
        index.insert(SpatialItem::from_lat_lng(LatLng::new(-5.0, 40.0), ()));

        let bounds = index.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-5.0, 20.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 40.0));

        index.clear();
        assert!(index.is_empty());
        assert!(index.bounds().is_none());
    }
}
