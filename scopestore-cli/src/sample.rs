//! Sample plugin behaviour: a start-up hook and a configurable action.

use scopestore_toolkit::{Action, StorageResult, StorageService, StorageServiceExt};
use tracing::info;

pub const STORAGE_NAME: &str = "storageName";
pub const IS_PRESENT: &str = "is.present";

const ADMIN_ONLY: &str = "admin.only";
const HELLO_TEXT: &str = "hello.text";
const WELCOME_TEXT: &str = "welcome.text";

const DEFAULT_HELLO: &str = "Hello, ";
const DEFAULT_WELCOME: &str = "World";

/// Start-up hook. Marks the `storageName` constant scope as initialised.
///
/// Returns `true` if this call set the flag.
pub fn setup<S: StorageService + ?Sized>(service: &S) -> StorageResult<bool> {
    let facade = service.constant_name_storage(STORAGE_NAME)?;
    if facade.get_boolean(IS_PRESENT)? {
        info!("{} - is present", IS_PRESENT);
        return Ok(false);
    }
    info!("{} - not present yet", IS_PRESENT);
    facade.set_boolean(IS_PRESENT, true)?;
    info!("{} db value - {}", IS_PRESENT, facade.get_boolean(IS_PRESENT)?);
    Ok(true)
}

/// The configurable greeting action. Its settings live in the action scope
/// shared by every instance.
pub struct GreetingAction;

impl Action for GreetingAction {
    const NAME: &'static str = concat!(module_path!(), "::GreetingAction");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingSettings {
    pub admin_only: bool,
    pub hello_text: String,
    pub welcome_text: String,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self {
            admin_only: false,
            hello_text: DEFAULT_HELLO.to_string(),
            welcome_text: DEFAULT_WELCOME.to_string(),
        }
    }
}

impl GreetingSettings {
    /// Reads the stored settings, falling back to the defaults per field.
    pub fn load<S: StorageService + ?Sized>(service: &S) -> StorageResult<Self> {
        let storage = service.action_type_storage::<GreetingAction>()?;
        Ok(Self {
            admin_only: storage.get_boolean(ADMIN_ONLY)?,
            hello_text: storage
                .get_text(HELLO_TEXT)?
                .unwrap_or_else(|| DEFAULT_HELLO.to_string()),
            welcome_text: storage
                .get_text(WELCOME_TEXT)?
                .unwrap_or_else(|| DEFAULT_WELCOME.to_string()),
        })
    }

    pub fn save<S: StorageService + ?Sized>(&self, service: &S) -> StorageResult<()> {
        let storage = service.action_storage(&GreetingAction)?;
        storage.set_boolean(ADMIN_ONLY, self.admin_only)?;
        storage.set_text(HELLO_TEXT, Some(&self.hello_text))?;
        storage.set_text(WELCOME_TEXT, Some(&self.welcome_text))?;
        info!("Saved greeting settings");
        Ok(())
    }

    pub fn greeting(&self) -> String {
        format!("{}{}", self.hello_text, self.welcome_text)
    }
}
