//! Tests for hotspot grid aggregation.

use geo_common::{rank_cells, BoundingBox, FeatureCollection, GridSpec};
use test_utils::fixtures;
use test_utils::{bbox_from, cell_center, point_collection as points, points_in_cell};

fn cotonou() -> BoundingBox {
    bbox_from(fixtures::bbox::COTONOU)
}

fn unit_grid() -> BoundingBox {
    bbox_from(fixtures::bbox::UNIT_GRID)
}

// ============================================================================
// Cell count and truncation
// ============================================================================

#[test]
fn test_grid_produces_rows_times_cols_cells() {
    let spec = GridSpec::default();
    assert_eq!(spec.cells(&cotonou()).len(), 36);

    let spec = GridSpec::new(3, 4);
    assert_eq!(spec.cells(&cotonou()).len(), 12);
}

#[test]
fn test_result_truncated_to_top_n() {
    let empty = FeatureCollection::new();

    let ranked = rank_cells(&cotonou(), &empty, &empty, GridSpec::default(), 10);
    assert_eq!(ranked.len(), 10);

    // Fewer cells than top_n
    let ranked = rank_cells(&cotonou(), &empty, &empty, GridSpec::new(2, 2), 10);
    assert_eq!(ranked.len(), 4);
}

#[test]
fn test_various_bboxes_always_full_grid() {
    let boxes = [
        BoundingBox::new(-90.0, -180.0, 90.0, 180.0),
        bbox_from(fixtures::bbox::PARIS),
        bbox_from(fixtures::bbox::LONDON),
        BoundingBox::new(-23.70, -46.80, -23.40, -46.50),
        BoundingBox::new(0.0, 0.0, 1e-6, 1e-6),
    ];
    for bbox in boxes {
        assert_eq!(GridSpec::default().cells(&bbox).len(), 36);
        let empty = FeatureCollection::new();
        assert_eq!(
            rank_cells(&bbox, &empty, &empty, GridSpec::default(), 10).len(),
            10
        );
    }
}

// ============================================================================
// Scoring and ordering
// ============================================================================

#[test]
fn test_empty_inputs_score_zero() {
    let empty = FeatureCollection::new();
    let ranked = rank_cells(&cotonou(), &empty, &empty, GridSpec::default(), 36);

    assert_eq!(ranked.len(), 36);
    assert!(ranked.iter().all(|c| c.need_score == 0.0));
    assert!(ranked
        .iter()
        .all(|c| c.facility_count == 0 && c.air_quality_point_count == 0));
}

#[test]
fn test_empty_inputs_keep_row_major_order() {
    let empty = FeatureCollection::new();
    let ranked = rank_cells(&cotonou(), &empty, &empty, GridSpec::default(), 10);
    let ids: Vec<_> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["0-0", "0-1", "0-2", "0-3", "0-4", "0-5", "1-0", "1-1", "1-2", "1-3"]
    );
}

#[test]
fn test_sorted_descending_by_need_score() {
    let (lon_a, lat_a) = cell_center(&cotonou(), GridSpec::default(), 2, 3);
    let (lon_b, lat_b) = cell_center(&cotonou(), GridSpec::default(), 5, 0);
    let (lon_c, lat_c) = cell_center(&cotonou(), GridSpec::default(), 0, 0);

    let mut air = points_in_cell(&cotonou(), GridSpec::default(), 2, 3, 3);
    air.push((lon_b, lat_b));
    let air = points(&air);
    let facilities = points(&[(lon_c, lat_c), (lon_a, lat_a)]);

    let ranked = rank_cells(&cotonou(), &facilities, &air, GridSpec::default(), 10);

    assert_eq!(ranked[0].id, "2-3");
    assert_eq!(ranked[0].need_score, 2.5);
    assert_eq!(ranked[1].id, "5-0");
    assert_eq!(ranked[1].need_score, 1.0);
    // 0-0 has one facility and no pollution, so it sinks below every zero cell
    assert!(ranked.iter().all(|c| c.id != "0-0"));

    for pair in ranked.windows(2) {
        assert!(pair[0].need_score >= pair[1].need_score);
    }
    for cell in &ranked {
        let expected =
            cell.air_quality_point_count as f64 - 0.5 * cell.facility_count as f64;
        assert_eq!(cell.need_score, expected);
    }
}

#[test]
fn test_ties_are_stable() {
    // Two cells with identical score: 4-4 appears after 1-2 in row-major order
    let (lon_a, lat_a) = cell_center(&cotonou(), GridSpec::default(), 4, 4);
    let (lon_b, lat_b) = cell_center(&cotonou(), GridSpec::default(), 1, 2);
    let air = points(&[(lon_a, lat_a), (lon_b, lat_b)]);

    let ranked = rank_cells(
        &cotonou(),
        &FeatureCollection::new(),
        &air,
        GridSpec::default(),
        10,
    );

    assert_eq!(ranked[0].id, "1-2");
    assert_eq!(ranked[1].id, "4-4");
    assert_eq!(ranked[0].need_score, ranked[1].need_score);
}

// ============================================================================
// Boundary policy
// ============================================================================

#[test]
fn test_north_and_east_edges_excluded() {
    let bbox = unit_grid();
    let air = points(&[
        (3.0, 6.0), // on the north edge
        (6.0, 3.0), // on the east edge
        (6.0, 6.0), // north-east corner
    ]);

    let ranked = rank_cells(&bbox, &FeatureCollection::new(), &air, GridSpec::default(), 36);
    assert!(ranked.iter().all(|c| c.air_quality_point_count == 0));
}

#[test]
fn test_south_and_west_edges_included() {
    let bbox = unit_grid();
    let air = points(&[(0.0, 0.0), (3.5, 0.0), (0.0, 3.5)]);

    let ranked = rank_cells(&bbox, &FeatureCollection::new(), &air, GridSpec::default(), 36);
    let total: u32 = ranked.iter().map(|c| c.air_quality_point_count).sum();
    assert_eq!(total, 3);

    let corner = ranked.iter().find(|c| c.id == "0-0").unwrap();
    assert_eq!(corner.air_quality_point_count, 1);
}

#[test]
fn test_interior_edge_counts_once() {
    // A point on the boundary between rows 2 and 3 belongs to row 3 only
    let bbox = unit_grid();
    let air = points(&[(0.5, 3.0)]);

    let ranked = rank_cells(&bbox, &FeatureCollection::new(), &air, GridSpec::default(), 36);
    let hits: Vec<_> = ranked
        .iter()
        .filter(|c| c.air_quality_point_count > 0)
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3-0");
}

#[test]
fn test_points_outside_bbox_ignored() {
    let air = points(&[(0.0, 0.0), (2.40, 7.0), (3.0, 6.40)]);
    let ranked = rank_cells(&cotonou(), &FeatureCollection::new(), &air, GridSpec::default(), 36);
    assert!(ranked.iter().all(|c| c.air_quality_point_count == 0));
}

#[test]
fn test_overall_edges_excluded_on_inexact_bbox() {
    // 0.10 - -0.20 does not split into six exact binary steps
    let bbox = bbox_from(fixtures::bbox::LONDON);
    let mid_lat = (bbox.south + bbox.north) / 2.0;
    let mid_lon = (bbox.west + bbox.east) / 2.0;
    let air = points(&[
        (bbox.east, mid_lat),
        (mid_lon, bbox.north),
        (bbox.east, bbox.north),
    ]);

    let ranked = rank_cells(&bbox, &FeatureCollection::new(), &air, GridSpec::default(), 36);
    assert!(ranked.iter().all(|c| c.air_quality_point_count == 0));
}

#[test]
fn test_every_preset_like_bbox_excludes_its_edges() {
    for t in [fixtures::bbox::COTONOU, fixtures::bbox::PARIS, fixtures::bbox::LONDON] {
        let bbox = bbox_from(t);
        let air = points(&[(bbox.east, bbox.south), (bbox.west, bbox.north)]);
        let ranked = rank_cells(&bbox, &FeatureCollection::new(), &air, GridSpec::default(), 36);
        let total: u32 = ranked.iter().map(|c| c.air_quality_point_count).sum();
        assert_eq!(total, 0, "edge point counted for {:?}", t);
    }
}
