use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

// =============================================================
// Helpers
// =============================================================

fn c(x: i64, y: i64) -> Coord {
    Coord::new(x, y)
}

fn coords(graph: &PointGraph) -> Vec<(i64, i64)> {
    graph.points().iter().map(|p| (p.x, p.y)).collect()
}

fn graph_with(points: &[(i64, i64)]) -> PointGraph {
    let mut graph = PointGraph::default();
    for &(x, y) in points {
        graph.add_point(x, y).unwrap();
    }
    graph
}

fn moved(graph: &PointGraph, from: Coord, to: Coord) -> Point {
    graph.point(from).unwrap().moved_to(to)
}

fn state(graph: &PointGraph) -> (Vec<Point>, Vec<Line>) {
    (graph.points().to_vec(), graph.lines().to_vec())
}

// =============================================================
// add_point
// =============================================================

#[test]
fn add_point_appends_in_order() {
    let graph = graph_with(&[(1, 1), (2, 2)]);
    assert_eq!(coords(&graph), vec![(1, 1), (2, 2)]);
}

#[test]
fn add_point_assigns_increasing_timestamps() {
    let graph = graph_with(&[(5, 5), (1, 1), (3, 3)]);
    let stamps: Vec<u64> = graph.points().iter().map(|p| p.timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn add_point_rejects_negative() {
    let mut graph = PointGraph::default();
    assert_eq!(graph.add_point(-1, 0), Err(GridError::InvalidCoordinate { x: -1, y: 0 }));
    assert_eq!(graph.add_point(0, -3), Err(GridError::InvalidCoordinate { x: 0, y: -3 }));
    assert!(graph.points().is_empty());
    assert!(!graph.can_undo());
}

#[test]
fn add_point_rejects_out_of_bounds() {
    let mut graph = PointGraph::new(GridSize::new(10, 10));
    assert!(graph.add_point(10, 10).is_ok());
    assert_eq!(graph.add_point(11, 0), Err(GridError::InvalidCoordinate { x: 11, y: 0 }));
}

#[test]
fn add_point_rejects_duplicate() {
    let mut graph = graph_with(&[(4, 4)]);
    assert_eq!(graph.add_point(4, 4), Err(GridError::DuplicatePoint { x: 4, y: 4 }));
    assert_eq!(graph.points().len(), 1);
}

#[test]
fn add_point_starts_unselected_and_ungrouped() {
    let graph = graph_with(&[(1, 2)]);
    let p = graph.point(c(1, 2)).unwrap();
    assert!(p.group_id.is_none());
    assert!(!graph.is_selected(c(1, 2)));
}

// =============================================================
// delete_point
// =============================================================

#[test]
fn delete_point_removes_touching_lines_and_selection() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3)]);
    graph.add_line(c(1, 1), c(2, 2)).unwrap();
    graph.add_line(c(3, 3), c(1, 1)).unwrap();
    graph.add_line(c(2, 2), c(3, 3)).unwrap();
    graph.toggle_point_selection(c(1, 1), false);

    assert!(graph.delete_point(c(1, 1)));
    assert_eq!(coords(&graph), vec![(2, 2), (3, 3)]);
    assert_eq!(graph.lines(), &[Line::new(c(2, 2), c(3, 3))]);
    assert!(!graph.is_selected(c(1, 1)));
    assert!(graph.selected_points().is_empty());
}

#[test]
fn delete_point_missing_is_noop_without_history() {
    let mut graph = graph_with(&[(1, 1)]);
    graph.undo();
    graph.redo();
    assert!(!graph.delete_point(c(9, 9)));
    assert_eq!(coords(&graph), vec![(1, 1)]);
    // no new entry: undo goes straight back to empty
    assert!(graph.undo());
    assert!(graph.points().is_empty());
}

// =============================================================
// update_point
// =============================================================

#[test]
fn update_point_moves_point_and_line_endpoints() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.add_line(c(1, 1), c(2, 2)).unwrap();

    let new = moved(&graph, c(1, 1), c(1, 5));
    assert_eq!(graph.update_point(c(1, 1), new), Ok(true));
    assert_eq!(coords(&graph), vec![(1, 5), (2, 2)]);
    assert_eq!(graph.lines(), &[Line::new(c(1, 5), c(2, 2))]);
    assert!(graph.lines().iter().all(|l| !l.touches(c(1, 1))));
}

#[test]
fn update_point_keeps_position_in_list_and_timestamp() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3)]);
    let ts = graph.point(c(2, 2)).unwrap().timestamp;
    let new = moved(&graph, c(2, 2), c(7, 7));
    graph.update_point(c(2, 2), new).unwrap();
    assert_eq!(coords(&graph), vec![(1, 1), (7, 7), (3, 3)]);
    assert_eq!(graph.point(c(7, 7)).unwrap().timestamp, ts);
}

#[test]
fn update_point_carries_selection() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.toggle_point_selection(c(1, 1), false);
    let new = moved(&graph, c(1, 1), c(0, 9));
    graph.update_point(c(1, 1), new).unwrap();
    assert!(graph.is_selected(c(0, 9)));
    assert!(!graph.is_selected(c(1, 1)));
}

#[test]
fn undo_of_move_keeps_point_selected() {
    let mut graph = graph_with(&[(1, 1), (5, 5)]);
    graph.toggle_point_selection(c(1, 1), false);
    let new = moved(&graph, c(1, 1), c(2, 2));
    graph.update_point(c(1, 1), new).unwrap();

    assert!(graph.undo());
    let selected: Vec<Coord> = graph.selected_points().iter().map(|p| p.coord()).collect();
    assert_eq!(selected, vec![c(1, 1)]);

    assert!(graph.redo());
    assert!(graph.is_selected(c(2, 2)));
    assert!(!graph.is_selected(c(1, 1)));
    assert!(!graph.is_selected(c(5, 5)));
}

#[test]
fn update_point_ignores_caller_timestamp() {
    let mut graph = graph_with(&[(1, 1)]);
    let ts = graph.point(c(1, 1)).unwrap().timestamp;
    let new = Point { timestamp: ts + 100, ..moved(&graph, c(1, 1), c(3, 3)) };
    assert_eq!(graph.update_point(c(1, 1), new), Ok(true));
    assert_eq!(graph.point(c(3, 3)).unwrap().timestamp, ts);

    let same_spot = Point { timestamp: ts + 5, ..graph.point(c(3, 3)).unwrap().clone() };
    assert_eq!(graph.update_point(c(3, 3), same_spot), Ok(false));
}

#[test]
fn update_point_rejects_collision() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.add_line(c(1, 1), c(2, 2)).unwrap();
    let before = state(&graph);

    let new = moved(&graph, c(1, 1), c(2, 2));
    assert_eq!(graph.update_point(c(1, 1), new), Err(GridError::DuplicatePoint { x: 2, y: 2 }));
    assert_eq!(state(&graph), before);
}

#[test]
fn update_point_rejects_invalid_coordinate() {
    let mut graph = graph_with(&[(1, 1)]);
    let new = moved(&graph, c(1, 1), c(-1, 1));
    assert_eq!(graph.update_point(c(1, 1), new), Err(GridError::InvalidCoordinate { x: -1, y: 1 }));
    let new = moved(&graph, c(1, 1), c(1, 201));
    assert_eq!(graph.update_point(c(1, 1), new), Err(GridError::InvalidCoordinate { x: 1, y: 201 }));
    assert_eq!(coords(&graph), vec![(1, 1)]);
}

#[test]
fn update_point_missing_old_is_error() {
    let mut graph = graph_with(&[(1, 1)]);
    let new = moved(&graph, c(1, 1), c(3, 3));
    assert_eq!(graph.update_point(c(5, 5), new), Err(GridError::PointNotFound { x: 5, y: 5 }));
}

#[test]
fn update_point_same_value_is_noop() {
    let mut graph = graph_with(&[(1, 1)]);
    let same = graph.point(c(1, 1)).unwrap().clone();
    assert_eq!(graph.update_point(c(1, 1), same), Ok(false));
    assert!(graph.undo());
    assert!(!graph.can_undo());
}

#[test]
fn update_point_can_change_group_in_place() {
    let mut graph = graph_with(&[(1, 1)]);
    let gid = graph.add_group("A", None).unwrap();
    let new = graph.point(c(1, 1)).unwrap().with_group(Some(gid));
    assert_eq!(graph.update_point(c(1, 1), new), Ok(true));
    assert_eq!(graph.group_of(graph.point(c(1, 1)).unwrap()).unwrap().id, gid);
}

#[test]
fn update_point_rejects_switch_to_unknown_group() {
    let mut graph = graph_with(&[(1, 1)]);
    let bogus = Uuid::new_v4();
    let new = graph.point(c(1, 1)).unwrap().with_group(Some(bogus));
    assert_eq!(graph.update_point(c(1, 1), new), Err(GridError::UnknownGroup(bogus.to_string())));
}

#[test]
fn update_point_allows_moving_point_with_stale_group() {
    let mut graph = graph_with(&[(1, 1)]);
    let gid = graph.add_group("A", None).unwrap();
    graph.assign_to_group(&[c(1, 1)], Some(gid)).unwrap();
    graph.delete_group(&gid);
    // undo re-applies the stale id, which now names no group
    graph.undo();
    graph.redo();
    let new = moved(&graph, c(1, 1), c(2, 1));
    assert!(graph.update_point(c(1, 1), new).is_ok());
}

// =============================================================
// reset_grid
// =============================================================

#[test]
fn reset_clears_everything_and_history() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.add_line(c(1, 1), c(2, 2)).unwrap();
    graph.select_all_points();
    let gid = graph.add_group("Keep", None).unwrap();
    graph.set_mode(Mode::Select);

    graph.reset_grid();
    assert!(graph.points().is_empty());
    assert!(graph.lines().is_empty());
    assert!(graph.selected_points().is_empty());
    assert!(!graph.undo());
    assert!(!graph.redo());
    assert!(graph.group(&gid).is_some());
    assert_eq!(graph.mode(), Mode::Select);
}

// =============================================================
// Groups
// =============================================================

#[test]
fn add_group_trims_name_and_normalizes_color() {
    let mut graph = PointGraph::default();
    let id = graph.add_group("  Roads ", Some("#ABC")).unwrap();
    let g = graph.group(&id).unwrap();
    assert_eq!(g.name, "Roads");
    assert_eq!(g.color, "#aabbcc");
}

#[test]
fn add_group_rejects_blank_name() {
    let mut graph = PointGraph::default();
    assert_eq!(graph.add_group("   ", None), Err(GridError::InvalidName));
    assert!(graph.groups().is_empty());
}

#[test]
fn add_group_falls_back_to_palette() {
    let mut graph = PointGraph::default();
    let a = graph.add_group("a", None).unwrap();
    let b = graph.add_group("b", Some("not-a-color")).unwrap();
    assert_eq!(graph.group(&a).unwrap().color, "#3b82f6");
    assert_eq!(graph.group(&b).unwrap().color, "#ef4444");
}

#[test]
fn add_group_ids_are_unique() {
    let mut graph = PointGraph::default();
    let ids: HashSet<GroupId> = (0..20).map(|i| graph.add_group(&format!("g{i}"), None).unwrap()).collect();
    assert_eq!(ids.len(), 20);
}

#[test]
fn group_edits_do_not_touch_history() {
    let mut graph = PointGraph::default();
    let id = graph.add_group("a", None).unwrap();
    graph.update_group_color(&id, "#000000");
    graph.rename_group(&id, "b").unwrap();
    assert!(!graph.can_undo());
}

#[test]
fn update_group_color_seen_by_members() {
    let mut graph = graph_with(&[(1, 1)]);
    let id = graph.add_group("a", Some("#111111")).unwrap();
    graph.assign_to_group(&[c(1, 1)], Some(id)).unwrap();
    assert!(graph.update_group_color(&id, "#FF0000"));
    let p = graph.point(c(1, 1)).unwrap();
    assert_eq!(graph.point_color(p), "#ff0000");
}

#[test]
fn update_group_color_unknown_or_invalid_is_noop() {
    let mut graph = PointGraph::default();
    let id = graph.add_group("a", Some("#111111")).unwrap();
    assert!(!graph.update_group_color(&Uuid::new_v4(), "#222222"));
    assert!(!graph.update_group_color(&id, "red"));
    assert_eq!(graph.group(&id).unwrap().color, "#111111");
}

#[test]
fn rename_group_validates() {
    let mut graph = PointGraph::default();
    let id = graph.add_group("a", None).unwrap();
    assert_eq!(graph.rename_group(&id, " "), Err(GridError::InvalidName));
    let bogus = Uuid::new_v4();
    assert_eq!(graph.rename_group(&bogus, "x"), Err(GridError::UnknownGroup(bogus.to_string())));
    graph.rename_group(&id, " z ").unwrap();
    assert_eq!(graph.group(&id).unwrap().name, "z");
}

#[test]
fn delete_group_untags_members_without_deleting_them() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3)]);
    let a = graph.add_group("a", None).unwrap();
    let b = graph.add_group("b", None).unwrap();
    graph.assign_to_group(&[c(1, 1), c(2, 2)], Some(a)).unwrap();
    graph.assign_to_group(&[c(3, 3)], Some(b)).unwrap();

    assert!(graph.delete_group(&a));
    assert_eq!(graph.points().len(), 3);
    assert!(graph.point(c(1, 1)).unwrap().group_id.is_none());
    assert!(graph.point(c(2, 2)).unwrap().group_id.is_none());
    assert_eq!(graph.point(c(3, 3)).unwrap().group_id, Some(b));
    assert!(graph.group(&a).is_none());
}

#[test]
fn delete_group_unknown_is_noop() {
    let mut graph = PointGraph::default();
    graph.add_group("a", None).unwrap();
    assert!(!graph.delete_group(&Uuid::new_v4()));
    assert_eq!(graph.groups().len(), 1);
}

#[test]
fn stale_group_after_undo_reads_as_absent() {
    let mut graph = graph_with(&[(1, 1)]);
    let id = graph.add_group("a", Some("#123456")).unwrap();
    graph.assign_to_group(&[c(1, 1)], Some(id)).unwrap();
    graph.delete_group(&id);
    graph.undo();
    graph.redo();

    let p = graph.point(c(1, 1)).unwrap();
    assert_eq!(p.group_id, Some(id));
    assert!(graph.group_of(p).is_none());
    assert_eq!(graph.point_color(p), DEFAULT_POINT_COLOR);
    assert_eq!(graph.points_in_group(None).len(), 1);
}

// =============================================================
// assign_to_group
// =============================================================

#[test]
fn assign_to_group_rejects_unknown_group() {
    let mut graph = graph_with(&[(1, 1)]);
    let bogus = Uuid::new_v4();
    assert_eq!(
        graph.assign_to_group(&[c(1, 1)], Some(bogus)),
        Err(GridError::UnknownGroup(bogus.to_string()))
    );
    assert!(graph.point(c(1, 1)).unwrap().group_id.is_none());
}

#[test]
fn assign_to_group_many_is_one_undo_step() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3)]);
    let id = graph.add_group("a", None).unwrap();
    assert_eq!(graph.assign_to_group(&[c(1, 1), c(3, 3), c(9, 9)], Some(id)), Ok(2));
    assert_eq!(graph.points_in_group(Some(&id)).len(), 2);

    assert!(graph.undo());
    assert!(graph.points_in_group(Some(&id)).is_empty());
    assert_eq!(coords(&graph), vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn assign_to_group_none_untags() {
    let mut graph = graph_with(&[(1, 1)]);
    let id = graph.add_group("a", None).unwrap();
    graph.assign_to_group(&[c(1, 1)], Some(id)).unwrap();
    assert_eq!(graph.assign_to_group(&[c(1, 1)], None), Ok(1));
    assert!(graph.point(c(1, 1)).unwrap().group_id.is_none());
}

#[test]
fn assign_to_group_unchanged_records_nothing() {
    let mut graph = graph_with(&[(1, 1)]);
    assert_eq!(graph.assign_to_group(&[c(1, 1)], None), Ok(0));
    assert!(graph.undo());
    assert!(!graph.can_undo());
}

// =============================================================
// Lines
// =============================================================

#[test]
fn add_line_validates_endpoints() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    assert_eq!(graph.add_line(c(1, 1), c(5, 5)), Err(GridError::PointNotFound { x: 5, y: 5 }));
    assert_eq!(graph.add_line(c(1, 1), c(1, 1)), Err(GridError::SelfLoop { x: 1, y: 1 }));
    graph.add_line(c(1, 1), c(2, 2)).unwrap();
    assert_eq!(graph.add_line(c(2, 2), c(1, 1)), Err(GridError::DuplicateLine));
    assert_eq!(graph.lines().len(), 1);
}

#[test]
fn add_line_is_undoable() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.add_line(c(1, 1), c(2, 2)).unwrap();
    assert!(graph.undo());
    assert!(graph.lines().is_empty());
    assert!(graph.redo());
    assert_eq!(graph.lines().len(), 1);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn toggle_non_additive_replaces_selection() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3)]);
    graph.select_all_points();
    assert!(graph.toggle_point_selection(c(2, 2), false));
    let selected: Vec<Coord> = graph.selected_points().iter().map(|p| p.coord()).collect();
    assert_eq!(selected, vec![c(2, 2)]);
    // non-additive on the same point keeps it selected
    graph.toggle_point_selection(c(2, 2), false);
    assert!(graph.is_selected(c(2, 2)));
}

#[test]
fn toggle_additive_flips_one_point() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.toggle_point_selection(c(1, 1), true);
    graph.toggle_point_selection(c(2, 2), true);
    assert_eq!(graph.selected_points().len(), 2);
    graph.toggle_point_selection(c(1, 1), true);
    assert!(!graph.is_selected(c(1, 1)));
    assert!(graph.is_selected(c(2, 2)));
}

#[test]
fn toggle_unknown_point_is_noop() {
    let mut graph = graph_with(&[(1, 1)]);
    assert!(!graph.toggle_point_selection(c(5, 5), false));
    assert!(graph.selected_points().is_empty());
}

#[test]
fn select_all_and_clear() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.select_all_points();
    assert!(graph.point_views().iter().all(|v| v.selected));
    graph.clear_selection();
    assert!(graph.point_views().iter().all(|v| !v.selected));
}

#[test]
fn selection_is_not_part_of_history() {
    let mut graph = graph_with(&[(1, 1)]);
    graph.toggle_point_selection(c(1, 1), false);
    assert!(graph.undo());
    assert!(graph.selected_points().is_empty());
    assert!(graph.redo());
    // the entry was pruned when the point vanished
    assert!(!graph.is_selected(c(1, 1)));
}

// =============================================================
// Mode / grid
// =============================================================

#[test]
fn set_mode_is_pure_setter() {
    let mut graph = graph_with(&[(1, 1)]);
    graph.set_mode(Mode::Select);
    assert_eq!(graph.mode(), Mode::Select);
    graph.set_mode(Mode::Select);
    assert_eq!(graph.mode(), Mode::Select);
    graph.set_mode(Mode::Add);
    assert_eq!(graph.mode(), Mode::Add);
    assert_eq!(coords(&graph), vec![(1, 1)]);
}

#[test]
fn set_grid_size_rejects_shrinking_past_points() {
    let mut graph = graph_with(&[(150, 20)]);
    assert_eq!(graph.set_grid_size(100, 100), Err(GridError::InvalidCoordinate { x: 150, y: 20 }));
    assert_eq!(graph.grid(), GridSize::default());
    assert_eq!(graph.set_grid_size(150, 20), Ok(GridSize::new(150, 20)));
}

#[test]
fn set_grid_size_clamps() {
    let mut graph = PointGraph::default();
    assert_eq!(graph.set_grid_size(0, 0), Ok(GridSize::new(1, 1)));
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn update_then_undo_twice_then_redo_twice() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    let new = moved(&graph, c(1, 1), c(1, 5));
    graph.update_point(c(1, 1), new).unwrap();
    assert_eq!(coords(&graph), vec![(1, 5), (2, 2)]);

    assert!(graph.undo());
    assert_eq!(coords(&graph), vec![(1, 1), (2, 2)]);
    assert!(graph.undo());
    assert_eq!(coords(&graph), vec![(1, 1)]);
    assert!(graph.redo());
    assert!(graph.redo());
    assert_eq!(coords(&graph), vec![(1, 5), (2, 2)]);
    assert!(!graph.redo());
}

#[test]
fn undo_then_redo_restores_exact_states() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3)]);
    graph.add_line(c(1, 1), c(3, 3)).unwrap();
    let before = state(&graph);
    graph.delete_point(c(3, 3));
    let after = state(&graph);

    graph.undo();
    assert_eq!(state(&graph), before);
    graph.redo();
    assert_eq!(state(&graph), after);
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.undo();
    graph.add_point(5, 5).unwrap();
    assert!(!graph.can_redo());
    assert!(!graph.redo());
    assert_eq!(coords(&graph), vec![(1, 1), (5, 5)]);
}

#[test]
fn undo_on_fresh_graph_is_noop() {
    let mut graph = PointGraph::default();
    assert!(!graph.undo());
    assert!(!graph.redo());
}

#[test]
fn view_reports_history_flags() {
    let mut graph = graph_with(&[(1, 1)]);
    assert!(graph.view().can_undo);
    graph.undo();
    let view = graph.view();
    assert!(!view.can_undo);
    assert!(view.can_redo);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["mode"], "add");
    assert_eq!(json["grid"]["width"], 200);
}

// =============================================================
// Reads
// =============================================================

#[test]
fn sorted_points_by_coordinate_and_timestamp() {
    let graph = graph_with(&[(3, 1), (1, 9), (1, 2)]);
    let by_coord: Vec<Coord> = graph.sorted_points(SortKey::Coordinate).iter().map(|p| p.coord()).collect();
    assert_eq!(by_coord, vec![c(1, 2), c(1, 9), c(3, 1)]);
    let by_time: Vec<Coord> = graph.sorted_points(SortKey::Timestamp).iter().map(|p| p.coord()).collect();
    assert_eq!(by_time, vec![c(3, 1), c(1, 9), c(1, 2)]);
}

#[test]
fn sorted_points_by_group_puts_ungrouped_last() {
    let mut graph = graph_with(&[(1, 1), (2, 2), (3, 3), (4, 4)]);
    let zeta = graph.add_group("zeta", None).unwrap();
    let alpha = graph.add_group("alpha", None).unwrap();
    graph.assign_to_group(&[c(1, 1)], Some(zeta)).unwrap();
    graph.assign_to_group(&[c(4, 4), c(3, 3)], Some(alpha)).unwrap();

    let order: Vec<Coord> = graph.sorted_points(SortKey::Group).iter().map(|p| p.coord()).collect();
    assert_eq!(order, vec![c(3, 3), c(4, 4), c(1, 1), c(2, 2)]);
}

#[test]
fn points_in_group_filters() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    let id = graph.add_group("a", None).unwrap();
    graph.assign_to_group(&[c(2, 2)], Some(id)).unwrap();
    let grouped: Vec<Coord> = graph.points_in_group(Some(&id)).iter().map(|p| p.coord()).collect();
    assert_eq!(grouped, vec![c(2, 2)]);
    let ungrouped: Vec<Coord> = graph.points_in_group(None).iter().map(|p| p.coord()).collect();
    assert_eq!(ungrouped, vec![c(1, 1)]);
    // an unknown filter id reads as "no group"
    assert_eq!(graph.points_in_group(Some(&Uuid::new_v4())).len(), 1);
}

// =============================================================
// Invariants over mixed sequences
// =============================================================

fn random_coord(rng: &mut StdRng) -> Coord {
    c(rng.random_range(0..6), rng.random_range(0..6))
}

fn assert_invariants(graph: &PointGraph) {
    let unique: HashSet<Coord> = graph.points().iter().map(Point::coord).collect();
    assert_eq!(unique.len(), graph.points().len(), "duplicate coordinate");
    for line in graph.lines() {
        assert!(unique.contains(&line.start), "dangling start {}", line.start);
        assert!(unique.contains(&line.end), "dangling end {}", line.end);
        assert_ne!(line.start, line.end);
    }
    for p in graph.selected_points() {
        assert!(unique.contains(&p.coord()));
    }
}

#[test]
fn random_sequences_preserve_invariants() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = PointGraph::new(GridSize::new(5, 5));
        for _ in 0..200 {
            match rng.random_range(0..7) {
                0 | 1 => {
                    let at = random_coord(&mut rng);
                    let _ = graph.add_point(at.x, at.y);
                }
                2 => {
                    graph.delete_point(random_coord(&mut rng));
                }
                3 => {
                    let from = random_coord(&mut rng);
                    let to = random_coord(&mut rng);
                    if let Some(p) = graph.point(from) {
                        let new = p.moved_to(to);
                        let _ = graph.update_point(from, new);
                    }
                }
                4 => {
                    let _ = graph.add_line(random_coord(&mut rng), random_coord(&mut rng));
                }
                5 => {
                    graph.toggle_point_selection(random_coord(&mut rng), rng.random_bool(0.5));
                }
                _ => {
                    if rng.random_bool(0.5) {
                        graph.undo();
                    } else {
                        graph.redo();
                    }
                }
            }
            assert_invariants(&graph);
        }
    }
}

#[test]
fn failed_operations_leave_state_untouched() {
    let mut graph = graph_with(&[(1, 1), (2, 2)]);
    graph.add_line(c(1, 1), c(2, 2)).unwrap();
    let before = state(&graph);
    let could_redo = graph.can_redo();

    assert!(graph.add_point(2, 2).is_err());
    assert!(graph.add_point(-4, 0).is_err());
    let collide = moved(&graph, c(1, 1), c(2, 2));
    assert!(graph.update_point(c(1, 1), collide).is_err());
    assert!(graph.add_line(c(1, 1), c(2, 2)).is_err());
    assert!(graph.assign_to_group(&[c(1, 1)], Some(Uuid::new_v4())).is_err());

    assert_eq!(state(&graph), before);
    assert_eq!(graph.can_redo(), could_redo);
    assert!(graph.undo());
    assert!(graph.lines().is_empty());
}
