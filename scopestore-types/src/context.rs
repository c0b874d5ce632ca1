//! Domain contexts a storage scope can be derived from.
//!
//! The toolkit treats these as opaque: it only ever asks them for a numeric
//! id (or, for actions, the stable name the implementing type declares).

/// A project owned by the host application.
pub trait Project: Send + Sync {
    fn id(&self) -> i64;
}

/// An issue owned by the host application.
pub trait Issue: Send + Sync {
    fn id(&self) -> i64;
}

/// Action types whose configuration is stored per type.
///
/// The storage partition is derived from [`Action::NAME`], so every instance
/// of the same action shares one partition. The name is persisted: changing
/// it orphans the stored configuration. Two types must not share a name.
///
/// ```
/// use scopestore_types::Action;
///
/// struct Greeting;
///
/// impl Action for Greeting {
///     const NAME: &'static str = concat!(module_path!(), "::Greeting");
/// }
/// ```
pub trait Action: 'static {
    /// Stable, unique name of the action type.
    const NAME: &'static str;
}
