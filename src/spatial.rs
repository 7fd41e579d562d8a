// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Resolving raw coordinates (e.g. map clicks) into network entities.
//!
//! Apart from [nearest_node_haversine], all functions here treat latitude and longitude
//! as planar coordinates. This is good enough for picking the closest node or edge
//! within a city, but the error grows with distance from the equator and the size
//! of the covered area.

use crate::{earth_distance, EdgeRecord, GeoPoint, NetworkSnapshot, Node};

/// Squared planar distance between two points, in degrees².
fn planar_distance_sq(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = a.lat - b.lat;
    let dlon = a.lon - b.lon;
    dlat * dlat + dlon * dlon
}

/// Squared planar distance between `p` and the segment `a`-`b`, in degrees².
///
/// The projection of `p` onto the line through `a` and `b` is clamped to the segment.
/// Zero-length segments degrade to the distance between `p` and `a`.
pub fn segment_distance_sq(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = b.lat - a.lat;
    let dlon = b.lon - a.lon;
    let len_sq = dlat * dlat + dlon * dlon;

    if len_sq == 0.0 {
        return planar_distance_sq(p, a);
    }

    let t = (((p.lat - a.lat) * dlat + (p.lon - a.lon) * dlon) / len_sq).clamp(0.0, 1.0);
    let projected = GeoPoint::new(a.lat + t * dlat, a.lon + t * dlon);
    planar_distance_sq(p, projected)
}

fn min_node_by<'a, F>(nodes: &'a [Node], mut distance: F) -> Option<&'a Node>
where
    F: FnMut(&Node) -> f64,
{
    let mut best: Option<(&Node, f64)> = None;
    for node in nodes {
        let d = distance(node);
        // Strict comparison keeps the first of equally close nodes
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((node, d));
        }
    }
    best.map(|(node, _)| node)
}

/// Finds the id of the node closest to `point`, using planar distance.
///
/// Ties are resolved in favor of the node appearing first in `nodes`.
/// Returns `None` if `nodes` is empty.
///
/// This function requires computing the distance to every [Node],
/// and is not suitable for large networks.
pub fn nearest_node(point: GeoPoint, nodes: &[Node]) -> Option<i64> {
    min_node_by(nodes, |n| planar_distance_sq(point, n.point())).map(|n| n.id)
}

/// Like [nearest_node], but compares great-circle distances.
/// Use this for networks spanning more than a few kilometers.
pub fn nearest_node_haversine(point: GeoPoint, nodes: &[Node]) -> Option<i64> {
    min_node_by(nodes, |n| earth_distance(point.lat, point.lon, n.lat, n.lon)).map(|n| n.id)
}

/// Finds the edge closest to `point` together with its squared planar distance.
fn nearest_edge_with_distance(
    point: GeoPoint,
    network: &NetworkSnapshot,
) -> Option<(&EdgeRecord, f64)> {
    let mut best: Option<(&EdgeRecord, f64)> = None;

    for edge in network.edges() {
        let (Some(a), Some(b)) = (network.get_node(edge.from), network.get_node(edge.to)) else {
            continue;
        };

        let d = segment_distance_sq(point, a.point(), b.point());
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((edge, d));
        }
    }

    best
}

/// Finds the edge closest to `point`, measured as the planar distance between
/// the point and the straight segment joining the edge's endpoints.
///
/// Conditions are ignored - blocked edges may be returned as well, so that they
/// can be unblocked. Edges with unknown endpoints are skipped. Ties are resolved
/// in favor of the edge appearing first in the network.
///
/// Returns `None` if there are no candidate edges.
pub fn nearest_edge(point: GeoPoint, network: &NetworkSnapshot) -> Option<&EdgeRecord> {
    nearest_edge_with_distance(point, network).map(|(edge, _)| edge)
}

/// Like [nearest_edge], but returns `None` if the closest edge is further than
/// `max_distance` degrees from `point`.
pub fn nearest_edge_within(
    point: GeoPoint,
    network: &NetworkSnapshot,
    max_distance: f64,
) -> Option<&EdgeRecord> {
    nearest_edge_with_distance(point, network)
        .filter(|&(_, d)| d <= max_distance * max_distance)
        .map(|(edge, _)| edge)
}
