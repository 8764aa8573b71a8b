use component_macros::{component, injectable};
use infrastructure_common::{global_catalog_snapshot, into_bean};
use std::any::TypeId;
use std::sync::Arc;

#[component]
struct Repository;

#[injectable]
impl Repository {
    fn new() -> Self {
        Repository
    }
}

struct Report(usize);

#[component]
struct Service {
    repository: Arc<Repository>,
}

#[injectable]
impl Service {
    fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    #[bean]
    fn report(&self) -> Report {
        Report(Arc::strong_count(&self.repository))
    }

    #[component_macros::bean(name = "sharedReport")]
    fn shared(&self) -> Result<Arc<Report>, std::fmt::Error> {
        Ok(Arc::new(Report(0)))
    }
}

fn main() {
    let catalog = global_catalog_snapshot();
    let entry = catalog.entry(TypeId::of::<Service>()).unwrap();

    assert_eq!(entry.constructors.len(), 1);
    assert_eq!(entry.methods.len(), 2);
    assert_eq!(entry.methods[1].name(), "sharedReport");

    let service = entry.constructors[0]
        .invoke(vec![Some(into_bean(Repository::new()))])
        .unwrap();
    let report = entry.methods[0].invoke(&service, Vec::new()).unwrap();
    assert_eq!(report.downcast::<Report>().unwrap().0, 1);
}
