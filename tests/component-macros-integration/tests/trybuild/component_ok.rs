use component_macros::{component, marked};
use infrastructure_common::markers::Component;
use infrastructure_common::{global_catalog_snapshot, Marker};
use std::any::TypeId;

#[component_macros::marker(Component)]
struct Service;

#[component]
struct Repository;

#[marked(Service)]
enum Mode {
    Fast,
}

fn main() {
    let catalog = global_catalog_snapshot();

    assert_eq!(<Service as Marker>::NAME, "Service");
    assert!(catalog.entry(TypeId::of::<Repository>()).is_some());
    let mode = catalog.entry(TypeId::of::<Mode>()).unwrap();
    assert!(catalog.carries_marker(&mode.markers, "Component"));
    let _ = (Repository, Mode::Fast);
}
