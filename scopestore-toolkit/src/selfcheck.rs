//! Storage self-check suite.
//!
//! A fixed list of save/delete cycles run against a live
//! [`DefaultStorageService`]. Hosts run it after deployment to confirm the
//! backing store behaves; the report renders as plain text.

use crate::{DefaultStorageService, StorageError, StorageService};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use scopestore_types::Properties;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

const EMPTY_SCOPE_NAME: &str = concat!(module_path!(), "-constantTest-shouldNeverReturnData");
const CYCLE_SCOPE_NAME: &str = concat!(module_path!(), "-saveDeleteCycle");

/// Why a check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CheckFailure {
    message: String,
}

impl CheckFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StorageError> for CheckFailure {
    fn from(err: StorageError) -> Self {
        Self::new(err.to_string())
    }
}

pub type CheckResult = Result<(), CheckFailure>;

/// A named check.
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    run: fn(&DefaultStorageService) -> CheckResult,
}

impl Check {
    pub const fn new(name: &'static str, run: fn(&DefaultStorageService) -> CheckResult) -> Self {
        Self { name, run }
    }

    pub fn run(&self, service: &DefaultStorageService) -> CheckResult {
        (self.run)(service)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

/// The registered checks, in execution order.
pub fn checks() -> Vec<Check> {
    vec![
        Check::new("should_always_be_success", should_always_be_success),
        Check::new("empty_constant_scope_should_never_return_any_data", empty_constant_scope_should_never_return_any_data),
        Check::new("constant_scope_save_delete_for_string", constant_scope_save_delete_for_string),
        Check::new("constant_scope_save_delete_for_text", constant_scope_save_delete_for_text),
        Check::new("constant_scope_save_delete_for_boolean", constant_scope_save_delete_for_boolean),
        Check::new("constant_scope_save_delete_for_date", constant_scope_save_delete_for_date),
        Check::new("constant_scope_save_delete_for_decimal", constant_scope_save_delete_for_decimal),
        Check::new("constant_scope_save_delete_for_long", constant_scope_save_delete_for_long),
        Check::new("constant_scope_save_delete_for_object", constant_scope_save_delete_for_object),
        Check::new("constant_scope_save_delete_for_properties", constant_scope_save_delete_for_properties),
        Check::new("constant_scope_save_delete_for_data", constant_scope_save_delete_for_data),
    ]
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// 1-based position in the run.
    pub index: usize,
    pub name: String,
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.total() - self.successes()
    }

    pub fn all_passed(&self) -> bool {
        self.failures() == 0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Storage self-check: {} run, {} passed, {} failed",
            self.total(),
            self.successes(),
            self.failures()
        )?;
        for outcome in &self.outcomes {
            match &outcome.error {
                None => writeln!(f, "{:>3}. {} ... ok", outcome.index, outcome.name)?,
                Some(err) => writeln!(f, "{:>3}. {} ... FAILED: {}", outcome.index, outcome.name, err)?,
            }
        }
        Ok(())
    }
}

/// Runs `checks` in order. A failing check does not stop the run.
pub fn run(service: &DefaultStorageService, checks: &[Check]) -> SuiteReport {
    let outcomes = checks
        .iter()
        .enumerate()
        .map(|(i, check)| {
            let name = humanize(check.name);
            let error = match check.run(service) {
                Ok(()) => {
                    info!("Check passed: {}", name);
                    None
                }
                Err(failure) => {
                    warn!("Check failed: {}: {}", name, failure);
                    Some(failure.to_string())
                }
            };
            CheckOutcome {
                index: i + 1,
                name,
                error,
            }
        })
        .collect();
    SuiteReport { outcomes }
}

/// Runs every registered check.
pub fn run_checks(service: &DefaultStorageService) -> SuiteReport {
    run(service, &checks())
}

/// `constant_scope_save_delete_for_string` -> `Constant Scope Save Delete For String`
pub fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn state_true(message: &str, condition: bool) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckFailure::new(message))
    }
}

fn state_false(message: &str, condition: bool) -> CheckResult {
    state_true(message, !condition)
}

// ── Checks ──

fn should_always_be_success(_: &DefaultStorageService) -> CheckResult {
    state_true("true is always true", true)
}

fn empty_constant_scope_should_never_return_any_data(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(EMPTY_SCOPE_NAME)?;

    state_true("First string access should be empty", facade.get_string("string")?.is_none())?;
    state_false("First boolean access should be false", facade.get_boolean("boolean")?)?;
    state_true("First data access should be empty", facade.get_data("data")?.is_none())?;
    state_true("First date access should be empty", facade.get_date("date")?.is_none())?;
    state_true("First decimal access should be empty", facade.get_decimal("decimal")?.is_none())?;
    state_true("First long access should be empty", facade.get_long("long")?.is_none())?;
    state_true("First text access should be empty", facade.get_text("text")?.is_none())?;
    state_true(
        "First properties access should be empty",
        facade.get_properties("properties")?.is_none(),
    )?;
    state_true(
        "First object access should be empty",
        facade.get_object::<serde_json::Value>("object")?.is_none(),
    )?;

    let keys = facade.keys()?;
    state_true(&format!("Expecting keys: [], got: {keys:?}"), keys.is_empty())
}

fn constant_scope_save_delete_for_string(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("string")?;

    state_true("First string access should be empty", facade.get_string("string")?.is_none())?;
    facade.set_string("string", Some("stringData"))?;
    state_true("string key should exist now", facade.exists("string")?)?;
    state_true(
        "[string]=stringData",
        facade.get_string("string")?.as_deref() == Some("stringData"),
    )?;
    state_true("delete string should work", facade.remove("string")?)?;
    state_false("string key should NOT exist now", facade.exists("string")?)
}

fn constant_scope_save_delete_for_text(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("text")?;

    state_true("First text access should be empty", facade.get_text("text")?.is_none())?;
    facade.set_text("text", Some("textData"))?;
    state_true("text key should exist now", facade.exists("text")?)?;
    state_true(
        "[text]=textData",
        facade.get_text("text")?.as_deref() == Some("textData"),
    )?;
    state_true("delete text should work", facade.remove("text")?)?;
    state_false("text key should NOT exist now", facade.exists("text")?)
}

fn constant_scope_save_delete_for_boolean(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("boolean")?;

    state_false("First boolean access should be false", facade.get_boolean("boolean")?)?;
    facade.set_boolean("boolean", true)?;
    state_true("boolean key should exist now", facade.exists("boolean")?)?;
    state_true("[boolean]=true", facade.get_boolean("boolean")?)?;
    state_true("delete boolean should work", facade.remove("boolean")?)?;
    state_false("boolean key should NOT exist now", facade.exists("boolean")?)
}

fn constant_scope_save_delete_for_date(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("date")?;

    state_true("First date access should be empty", facade.get_date("date")?.is_none())?;
    let date = Utc
        .with_ymd_and_hms(2010, 2, 2, 3, 4, 5)
        .single()
        .ok_or_else(|| CheckFailure::new("sample date is ambiguous"))?;
    facade.set_date("date", date)?;
    state_true("date key should exist now", facade.exists("date")?)?;
    let stored = facade.get_date("date")?;
    state_true(
        &format!("[date]={date}, actual={stored:?}"),
        stored == Some(date),
    )?;
    state_true("delete date should work", facade.remove("date")?)?;
    state_false("date key should NOT exist now", facade.exists("date")?)
}

fn constant_scope_save_delete_for_decimal(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("decimal")?;

    let value = Decimal::new(105, 2);
    state_true("First decimal access should be empty", facade.get_decimal("decimal")?.is_none())?;
    facade.set_decimal("decimal", Some(value))?;
    state_true("decimal key should exist now", facade.exists("decimal")?)?;
    state_true("[decimal]=1.05", facade.get_decimal("decimal")? == Some(value))?;
    facade.set_decimal("decimal", None)?;
    state_false("decimal key should NOT exist now", facade.exists("decimal")?)?;

    facade.set_decimal("decimal", Some(value))?;
    state_true("decimal key should exist now", facade.exists("decimal")?)?;
    state_true("delete decimal should work", facade.remove("decimal")?)?;
    state_false("decimal key should NOT exist now", facade.exists("decimal")?)
}

fn constant_scope_save_delete_for_long(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("long")?;

    state_true("First long access should be empty", facade.get_long("long")?.is_none())?;
    facade.set_long("long", Some(5))?;
    state_true("long key should exist now", facade.exists("long")?)?;
    state_true("[long]=5", facade.get_long("long")? == Some(5))?;
    facade.set_long("long", None)?;
    state_false("long key should NOT exist now", facade.exists("long")?)?;

    facade.set_long("long", Some(7))?;
    state_true("long key should exist now", facade.exists("long")?)?;
    state_true("delete long should work", facade.remove("long")?)?;
    state_false("long key should NOT exist now", facade.exists("long")?)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SampleObject {
    text: String,
    number: i64,
    mapping: BTreeMap<String, String>,
}

fn constant_scope_save_delete_for_object(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("object")?;

    let object = SampleObject {
        text: "data data".to_string(),
        number: 10,
        mapping: BTreeMap::from([
            ("1".to_string(), "data1".to_string()),
            ("sdsd".to_string(), "data2".to_string()),
        ]),
    };
    state_true(
        "First object access should be empty",
        facade.get_object::<SampleObject>("object")?.is_none(),
    )?;
    facade.set_object("object", Some(&object))?;
    state_true("object key should exist now", facade.exists("object")?)?;
    let stored = facade.get_object::<SampleObject>("object")?;
    state_true(
        &format!("{object:?}={stored:?}"),
        stored.as_ref() == Some(&object),
    )?;
    facade.set_object::<SampleObject>("object", None)?;
    state_false("object key should NOT exist now", facade.exists("object")?)?;

    facade.set_object("object", Some(&object))?;
    state_true("object key should exist now", facade.exists("object")?)?;
    state_true("delete object should work", facade.remove("object")?)?;
    state_false("object key should NOT exist now", facade.exists("object")?)
}

fn constant_scope_save_delete_for_properties(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("properties")?;

    let mut properties = Properties::new();
    properties.set("this.is.on", "on");
    properties.set("this.is.off", "off");

    state_true(
        "First properties access should be empty",
        facade.get_properties("properties")?.is_none(),
    )?;
    facade.set_properties("properties", Some(&properties))?;
    state_true("properties key should exist now", facade.exists("properties")?)?;
    state_true(
        "[properties]=on and off",
        facade.get_properties("properties")?.as_ref() == Some(&properties),
    )?;
    facade.set_properties("properties", None)?;
    state_false("properties key should NOT exist now", facade.exists("properties")?)?;

    facade.set_properties("properties", Some(&properties))?;
    state_true("properties key should exist now", facade.exists("properties")?)?;
    state_true("delete properties should work", facade.remove("properties")?)?;
    state_false("properties key should NOT exist now", facade.exists("properties")?)
}

fn constant_scope_save_delete_for_data(service: &DefaultStorageService) -> CheckResult {
    let facade = service.constant_name_storage(CYCLE_SCOPE_NAME)?;
    facade.remove("data")?;

    let data = [b'3', 4, b'7'];
    state_true("First data access should be empty", facade.get_data("data")?.is_none())?;
    facade.set_data("data", &data)?;
    state_true("data key should exist now", facade.exists("data")?)?;
    let stored = facade.get_data("data")?;
    state_true(
        &format!("[data]={data:?}, actual={stored:?}"),
        stored.as_deref() == Some(&data[..]),
    )?;
    state_true("delete data should work", facade.remove("data")?)?;
    state_false("data key should NOT exist now", facade.exists("data")?)
}
