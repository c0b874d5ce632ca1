use pretty_assertions::assert_eq;
use scopestore_db::DbConfig;
use scopestore_storage::PropertyEntryStore;
use scopestore_toolkit::selfcheck::{self, Check, CheckFailure, CheckResult};
use scopestore_toolkit::{
    Action, DefaultStorageService, GenericRecord, Issue, Project, StorageError, StorageService,
    StorageServiceExt,
};

struct Board(i64);

impl Project for Board {
    fn id(&self) -> i64 {
        self.0
    }
}

struct Ticket(i64);

impl Issue for Ticket {
    fn id(&self) -> i64 {
        self.0
    }
}

struct ConfigureGreeting;

impl Action for ConfigureGreeting {
    const NAME: &'static str = "greeting.ConfigureGreeting";
}

// ── Service resolution ──────────────────────────────────────────

#[test]
fn each_context_gets_its_own_partition() {
    let service = DefaultStorageService::in_memory().unwrap();

    service.project_storage(&Board(1)).unwrap().set_long("n", Some(1)).unwrap();
    service.issue_storage(&Ticket(1)).unwrap().set_long("n", Some(2)).unwrap();
    service
        .record_storage(&GenericRecord::new("Version").with_field("id", 1))
        .unwrap()
        .set_long("n", Some(3))
        .unwrap();
    service
        .constant_name_storage("1")
        .unwrap()
        .set_long("n", Some(4))
        .unwrap();
    service
        .action_storage(&ConfigureGreeting)
        .unwrap()
        .set_long("n", Some(5))
        .unwrap();

    assert_eq!(service.project_storage(&Board(1)).unwrap().get_long("n").unwrap(), Some(1));
    assert_eq!(service.issue_storage(&Ticket(1)).unwrap().get_long("n").unwrap(), Some(2));
    assert_eq!(
        service
            .record_storage(&GenericRecord::new("Other").with_field("id", "1"))
            .unwrap()
            .get_long("n")
            .unwrap(),
        Some(3)
    );
    assert_eq!(
        service.constant_name_storage("1").unwrap().get_long("n").unwrap(),
        Some(4)
    );
    assert_eq!(
        service
            .action_type_storage::<ConfigureGreeting>()
            .unwrap()
            .get_long("n")
            .unwrap(),
        Some(5)
    );
}

#[test]
fn facade_identity_matches_scope() {
    let service = DefaultStorageService::in_memory().unwrap();
    let facade = service.issue_storage(&Ticket(569)).unwrap();
    assert_eq!(
        facade.identity(),
        &service.scopes().issue().identity(&Ticket(569))
    );
}

#[test]
fn service_accepts_boxed_contexts() {
    let service = DefaultStorageService::in_memory().unwrap();
    let project: Box<dyn Project> = Box::new(Board(11));
    service
        .project_storage(&*project)
        .unwrap()
        .set_boolean("on", true)
        .unwrap();
    assert!(service.project_storage(&Board(11)).unwrap().get_boolean("on").unwrap());
}

#[test]
fn service_works_as_trait_object() {
    let service: Box<dyn StorageService> = Box::new(DefaultStorageService::in_memory().unwrap());
    service
        .action_storage(&ConfigureGreeting)
        .unwrap()
        .set_text("hello.text", Some("Hi"))
        .unwrap();

    let by_name = service
        .action_name_storage("greeting.ConfigureGreeting")
        .unwrap();
    assert_eq!(by_name.get_text("hello.text").unwrap().as_deref(), Some("Hi"));
    assert_eq!(
        by_name.identity().entity_name(),
        "FacadeStorageAction-greeting.ConfigureGreeting"
    );
    assert_eq!(
        service.action_type_storage::<ConfigureGreeting>().unwrap().identity(),
        by_name.identity()
    );
}

#[test]
fn file_backed_service_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::at(dir.path().join("scopestore.db"));

    {
        let store = PropertyEntryStore::open(&config).unwrap();
        let service = DefaultStorageService::with_store(store).unwrap();
        let facade = service.constant_name_storage("storageName").unwrap();
        facade.set_boolean("is.present", true).unwrap();
    }

    let store = PropertyEntryStore::open(&config).unwrap();
    let service = DefaultStorageService::with_store(store).unwrap();
    assert!(service
        .constant_name_storage("storageName")
        .unwrap()
        .get_boolean("is.present")
        .unwrap());
}

// ── Self-check suite ────────────────────────────────────────────

#[test]
fn suite_passes_on_fresh_store() {
    let service = DefaultStorageService::in_memory().unwrap();
    let report = selfcheck::run_checks(&service);

    assert!(report.all_passed(), "{report}");
    assert_eq!(report.total(), selfcheck::checks().len());
    assert_eq!(report.total(), 11);
    assert_eq!(report.successes(), 11);
    assert_eq!(report.failures(), 0);
}

#[test]
fn suite_is_repeatable() {
    let service = DefaultStorageService::in_memory().unwrap();
    assert!(selfcheck::run_checks(&service).all_passed());
    assert!(selfcheck::run_checks(&service).all_passed());
}

#[test]
fn suite_leaves_no_data_behind() {
    let store = PropertyEntryStore::open_in_memory().unwrap();
    let service = DefaultStorageService::with_store(store.clone()).unwrap();
    selfcheck::run_checks(&service);
    assert_eq!(
        store.count(&scopestore_storage::EntryFilter::all()).unwrap(),
        0
    );
}

#[test]
fn report_names_and_indexes() {
    let service = DefaultStorageService::in_memory().unwrap();
    let report = selfcheck::run_checks(&service);

    let first = &report.outcomes()[0];
    assert_eq!(first.index, 1);
    assert_eq!(first.name, "Should Always Be Success");
    assert!(first.is_success());

    let third = &report.outcomes()[2];
    assert_eq!(third.index, 3);
    assert_eq!(third.name, "Constant Scope Save Delete For String");
}

fn always_fails(_: &DefaultStorageService) -> CheckResult {
    Err(CheckFailure::new("expected failure"))
}

fn storage_error(_: &DefaultStorageService) -> CheckResult {
    Err(StorageError::IncompleteScope("delete-all").into())
}

fn passes(_: &DefaultStorageService) -> CheckResult {
    Ok(())
}

#[test]
fn failures_are_collected_not_fatal() {
    let service = DefaultStorageService::in_memory().unwrap();
    let checks = [
        Check::new("always_fails", always_fails),
        Check::new("storage_error", storage_error),
        Check::new("passes", passes),
    ];
    let report = selfcheck::run(&service, &checks);

    assert_eq!(report.total(), 3);
    assert_eq!(report.failures(), 2);
    assert_eq!(report.successes(), 1);
    assert!(!report.all_passed());
    assert_eq!(
        report.outcomes()[0].error.as_deref(),
        Some("expected failure")
    );
    assert_eq!(
        report.outcomes()[1].error.as_deref(),
        Some("scope is missing its delete-all rule")
    );

    let text = report.to_string();
    assert!(text.starts_with("Storage self-check: 3 run, 1 passed, 2 failed\n"));
    assert!(text.contains("  1. Always Fails ... FAILED: expected failure"));
    assert!(text.contains("  3. Passes ... ok"));
}

#[test]
fn empty_report() {
    let report = selfcheck::SuiteReport::default();
    assert_eq!(report.total(), 0);
    assert!(report.all_passed());
    assert_eq!(report.to_string(), "Storage self-check: 0 run, 0 passed, 0 failed\n");
}
