use std::sync::Arc;

use pretty_assertions::assert_eq;
use stratum_primitives::{ManualClock, SequentialIds, UNPLACED};

use super::*;
use crate::StoreError;

fn test_store() -> WidgetStore {
	WidgetStore::with_collaborators(
		StoreConfig::default(),
		Arc::new(SequentialIds::with_prefix("w")),
		Arc::new(ManualClock::from_epoch()),
	)
}

fn origin() -> Coordinates {
	Coordinates::origin()
}

fn unit() -> Dimensions {
	Dimensions::new(1, 1).unwrap()
}

fn zs(store: &WidgetStore) -> Vec<ZIndex> {
	store.list().iter().map(Widget::z).collect()
}

fn assert_consistent(store: &WidgetStore) {
	store.index.read().check_invariants().unwrap();
}

#[test]
fn list_is_sorted_by_z() {
	let store = test_store();
	for z in [0, 10, 3] {
		store.create_at(origin(), unit(), z).unwrap();
	}
	assert_eq!(zs(&store), vec![0, 3, 10]);
}

#[test]
fn duplicate_z_displaces_occupants() {
	let store = test_store();
	let mut existing = Vec::new();
	for z in [1, 2, 3, 10] {
		existing.push(store.create_at(origin(), unit(), z).unwrap());
	}

	let widget = store.create_at(origin(), unit(), 2).unwrap();

	let widgets = store.list();
	assert_eq!(widgets.len(), 5);
	assert_eq!(zs(&store), vec![1, 2, 3, 4, 10]);
	assert_eq!(widgets[1], widget);
	assert_eq!(widgets.last().map(Widget::z), Some(10));
	assert_eq!(store.get(existing[1].id().as_str()).unwrap().z(), 3);
	assert_eq!(store.get(existing[2].id().as_str()).unwrap().z(), 4);
	assert_consistent(&store);
}

#[test]
fn create_without_z_goes_on_top() {
	let store = test_store();
	for z in [1, 2, 3] {
		store.create_at(origin(), unit(), z).unwrap();
	}

	let widget = store.create(origin(), unit()).unwrap();

	assert_eq!(widget.z(), 4);
	assert_eq!(zs(&store), vec![1, 2, 3, 4]);
	assert_eq!(store.list()[3], widget);
}

#[test]
fn create_on_empty_store_uses_base_z() {
	let store = test_store();
	assert_eq!(store.create(origin(), unit()).unwrap().z(), 0);

	let config = StoreConfig {
		base_z: 100,
		..StoreConfig::default()
	};
	let store = WidgetStore::with_config(config);
	assert_eq!(store.create(origin(), unit()).unwrap().z(), 100);
}

#[test]
fn widget_at_max_z_blocks_create() {
	let store = test_store();
	store.create_at(origin(), unit(), ZIndex::MAX).unwrap();

	let err = store.create(origin(), unit()).unwrap_err();

	assert_eq!(err, StoreError::CapacityExceeded { requested: ZIndex::MAX });
	assert_eq!(store.len(), 1);
}

#[test]
fn create_at_full_run_leaves_store_untouched() {
	let store = test_store();
	store.create_at(origin(), unit(), ZIndex::MAX - 1).unwrap();
	store.create_at(origin(), unit(), ZIndex::MAX).unwrap();
	let before = store.list();

	let err = store.create_at(origin(), unit(), ZIndex::MAX - 1).unwrap_err();

	assert!(matches!(err, StoreError::CapacityExceeded { .. }));
	assert_eq!(store.list(), before);
	assert_consistent(&store);
}

#[test]
fn get_returns_created_value() {
	let store = test_store();
	let widget = store.create_at(Coordinates::new(3, 4), unit(), 7).unwrap();

	assert_eq!(store.get(widget.id().as_str()), Some(widget.clone()));
	assert_eq!(store.widget_at(7), Some(widget));
	assert_eq!(store.get("missing"), None);
	assert_eq!(store.widget_at(8), None);
}

#[test]
fn update_coordinates_replaces_in_place() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 5).unwrap();

	let moved = store
		.update_coordinates(widget.id().as_str(), Coordinates::new(10, -3))
		.unwrap();

	assert_eq!(moved.id(), widget.id());
	assert_eq!(moved.z(), 5);
	assert_eq!(moved.coordinates(), Coordinates::new(10, -3));
	assert!(moved.last_modified() > widget.last_modified());
	assert_eq!(store.widget_at(5), Some(moved));
	assert_consistent(&store);
}

#[test]
fn unchanged_updates_return_current_value() {
	let store = test_store();
	let widget = store.create_at(Coordinates::new(1, 1), unit(), 0).unwrap();
	let id = widget.id().as_str();

	assert_eq!(store.update_coordinates(id, Coordinates::new(1, 1)), Some(widget.clone()));
	assert_eq!(store.update_dimensions(id, unit()), Some(widget.clone()));
	assert_eq!(store.update_z(id, 0), Ok(Some(widget.clone())));
	assert_eq!(store.get(id), Some(widget.clone()));
	assert_eq!(store.len(), 1);
}

#[test]
fn update_dimensions_replaces_in_place() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 2).unwrap();
	let big = Dimensions::new(640, 480).unwrap();

	let resized = store.update_dimensions(widget.id().as_str(), big).unwrap();

	assert_eq!(resized.dimensions(), big);
	assert_eq!(resized.z(), 2);
	assert_eq!(store.get(widget.id().as_str()), Some(resized));
}

#[test]
fn updates_on_unknown_id_are_empty() {
	let store = test_store();
	assert_eq!(store.update_coordinates("nope", origin()), None);
	assert_eq!(store.update_dimensions("nope", unit()), None);
	assert_eq!(store.update_z("nope", 3), Ok(None));
	assert_eq!(store.update_all("nope", unit(), origin(), 3), Ok(None));
}

#[test]
fn update_z_to_free_slot_moves_only_that_widget() {
	let store = test_store();
	let a = store.create_at(origin(), unit(), 1).unwrap();
	let b = store.create_at(origin(), unit(), 2).unwrap();

	let moved = store.update_z(a.id().as_str(), 50).unwrap().unwrap();

	assert_eq!(moved.z(), 50);
	assert_eq!(zs(&store), vec![2, 50]);
	assert_eq!(store.get(b.id().as_str()), Some(b));
	assert_consistent(&store);
}

#[test]
fn update_z_to_occupied_slot_cascades() {
	let store = test_store();
	let ids: Vec<_> = [1, 2, 3, 10]
		.into_iter()
		.map(|z| store.create_at(origin(), unit(), z).unwrap().id().clone())
		.collect();

	store.update_z(ids[3].as_str(), 2).unwrap().unwrap();

	let layout: Vec<_> = store
		.list()
		.into_iter()
		.map(|w| (w.id().clone(), w.z()))
		.collect();
	assert_eq!(
		layout,
		vec![
			(ids[0].clone(), 1),
			(ids[3].clone(), 2),
			(ids[1].clone(), 3),
			(ids[2].clone(), 4),
		]
	);
	assert_consistent(&store);
}

#[test]
fn update_z_within_own_run_uses_vacated_slot() {
	let store = test_store();
	let ids: Vec<_> = [1, 2, 3]
		.into_iter()
		.map(|z| store.create_at(origin(), unit(), z).unwrap().id().clone())
		.collect();

	store.update_z(ids[0].as_str(), 3).unwrap().unwrap();

	// Slot 1 is vacated first, so the cascade from 3 stops at 4.
	assert_eq!(zs(&store), vec![2, 3, 4]);
	assert_eq!(store.widget_at(3).unwrap().id(), &ids[0]);
	assert_consistent(&store);
}

#[test]
fn failed_update_z_restores_widget() {
	let store = test_store();
	let low = store.create_at(origin(), unit(), 0).unwrap();
	store.create_at(origin(), unit(), ZIndex::MAX - 1).unwrap();
	store.create_at(origin(), unit(), ZIndex::MAX).unwrap();
	let before = store.list();

	let err = store.update_z(low.id().as_str(), ZIndex::MAX - 1).unwrap_err();

	assert_eq!(err, StoreError::CapacityExceeded { requested: ZIndex::MAX - 1 });
	assert_eq!(store.list(), before);
	assert_consistent(&store);
}

#[test]
fn promotion_revalidates_slot_taken_between_locks() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 1).unwrap();
	let mut intruder = None;

	// Slot 5 is free under the read lock, then gets taken before the write lock.
	let moved = store
		.update_z_with(widget.id().as_str(), 5, || {
			intruder = Some(store.create_at(origin(), unit(), 5).unwrap());
		})
		.unwrap()
		.unwrap();

	let intruder = intruder.unwrap();
	assert_eq!(moved.z(), 5);
	assert_eq!(store.get(intruder.id().as_str()).unwrap().z(), 6);
	assert_eq!(zs(&store), vec![5, 6]);
	assert_consistent(&store);
}

#[test]
fn promotion_revalidates_slot_freed_between_locks() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 1).unwrap();
	let blocker = store.create_at(origin(), unit(), 5).unwrap();

	let moved = store
		.update_z_with(widget.id().as_str(), 5, || {
			store.remove(&blocker);
		})
		.unwrap()
		.unwrap();

	assert_eq!(moved.z(), 5);
	assert_eq!(zs(&store), vec![5]);
	assert_consistent(&store);
}

#[test]
fn promotion_sees_widget_removed_between_locks() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 1).unwrap();

	let result = store.update_z_with(widget.id().as_str(), 5, || {
		store.remove(&widget);
	});

	assert_eq!(result, Ok(None));
	assert!(store.is_empty());
}

#[test]
fn promotion_sees_widget_displaced_onto_target() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 1).unwrap();

	// A create at 1 pushes the widget to 2, which is where it was headed.
	let result = store
		.update_z_with(widget.id().as_str(), 2, || {
			store.create_at(origin(), unit(), 1).unwrap();
		})
		.unwrap()
		.unwrap();

	assert_eq!(result.z(), 2);
	assert_eq!(zs(&store), vec![1, 2]);
}

#[test]
fn update_all_applies_every_change() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 0).unwrap();
	store.create_at(origin(), unit(), 1).unwrap();
	let dims = Dimensions::new(5, 6).unwrap();

	let updated = store
		.update_all(widget.id().as_str(), dims, Coordinates::new(7, 8), 1)
		.unwrap()
		.unwrap();

	assert_eq!(updated.dimensions(), dims);
	assert_eq!(updated.coordinates(), Coordinates::new(7, 8));
	assert_eq!(updated.z(), 1);
	assert_eq!(zs(&store), vec![1, 2]);
}

#[test]
fn remove_deletes_from_both_lookups() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 4).unwrap();
	let moved = store.update_coordinates(widget.id().as_str(), Coordinates::new(1, 1)).unwrap();

	// A stale value still removes the stored record.
	assert_eq!(store.remove(&widget), Some(moved));
	assert_eq!(store.get(widget.id().as_str()), None);
	assert_eq!(store.widget_at(4), None);
	assert_eq!(store.remove(&widget), None);
	assert_consistent(&store);
}

#[test]
fn clear_empties_store() {
	let store = test_store();
	for z in 0..10 {
		store.create_at(origin(), unit(), z).unwrap();
	}
	store.clear();
	assert!(store.is_empty());
	assert!(store.list().is_empty());
	assert_consistent(&store);
}

#[test]
fn store_places_prebuilt_widgets() {
	let store = test_store();
	let ids = SequentialIds::with_prefix("ext");
	let clock = ManualClock::from_epoch();

	let unplaced = Widget::builder(origin(), unit()).build(&ids, &clock);
	assert_eq!(unplaced.z(), UNPLACED);
	let placed = Widget::builder(origin(), unit()).z(0).build(&ids, &clock);

	let first = store.store(placed.clone()).unwrap();
	let second = store.store(unplaced.clone()).unwrap();

	assert_eq!(first.id(), placed.id());
	assert_eq!(first.z(), 0);
	assert_eq!(second.id(), unplaced.id());
	assert_eq!(second.z(), 1);
	assert_eq!(store.get(first.id().as_str()), Some(first));
	assert_eq!(zs(&store), vec![0, 1]);
}

#[test]
fn store_replaces_widget_with_same_id() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 3).unwrap();
	store.create_at(origin(), unit(), 4).unwrap();

	let stored = store.store(widget.with_z(4, widget.last_modified())).unwrap();

	assert_eq!(stored.id(), widget.id());
	assert_eq!(stored.z(), 4);
	assert!(stored.last_modified() > widget.last_modified());
	assert_eq!(store.len(), 2);
	assert_eq!(store.get(widget.id().as_str()), Some(stored));
	assert_eq!(zs(&store), vec![4, 5]);
	assert_consistent(&store);
}

#[test]
fn store_unplaced_replacement_ignores_its_old_slot() {
	let store = test_store();
	let top = store.create_at(origin(), unit(), ZIndex::MAX).unwrap();

	// The only occupant of MAX is the record being replaced.
	let stored = store.store(top.with_z(UNPLACED, top.last_modified())).unwrap();

	assert_eq!(stored.id(), top.id());
	assert_eq!(stored.z(), 0);
	assert_eq!(zs(&store), vec![0]);
	assert_consistent(&store);
}

#[test]
fn store_unplaced_replacement_of_top_leaves_no_gap() {
	let store = test_store();
	store.create_at(origin(), unit(), 1).unwrap();
	let top = store.create_at(origin(), unit(), 2).unwrap();

	let stored = store.store(top.with_z(UNPLACED, top.last_modified())).unwrap();

	assert_eq!(stored.z(), 2);
	assert_eq!(zs(&store), vec![1, 2]);
	assert_consistent(&store);
}

#[test]
fn failed_store_restores_previous_value() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 0).unwrap();
	store.create_at(origin(), unit(), ZIndex::MAX - 1).unwrap();
	store.create_at(origin(), unit(), ZIndex::MAX).unwrap();
	let before = store.list();

	let err = store.store(widget.with_z(ZIndex::MAX - 1, widget.last_modified()));

	assert!(err.is_err());
	assert_eq!(store.list(), before);
	assert_consistent(&store);
}

#[test]
fn failed_unplaced_store_restores_previous_value() {
	let store = test_store();
	let widget = store.create_at(origin(), unit(), 0).unwrap();
	store.create_at(origin(), unit(), ZIndex::MAX).unwrap();
	let before = store.list();

	let err = store.store(widget.with_z(UNPLACED, widget.last_modified())).unwrap_err();

	assert_eq!(err, StoreError::CapacityExceeded { requested: ZIndex::MAX });
	assert_eq!(store.list(), before);
	assert_consistent(&store);
}

#[test]
fn debug_output_reports_len() {
	let store = test_store();
	store.create(origin(), unit()).unwrap();
	let rendered = format!("{store:?}");
	assert!(rendered.starts_with("WidgetStore { len: 1"), "{rendered}");
}
