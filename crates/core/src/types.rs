use serde::{Deserialize, Serialize};

/// Unique dispatch identifier, assigned sequentially by the store.
pub type DispatchId = u64;

/// Category of a microgrid component.
///
/// Used to target a dispatch at every component of a kind instead of
/// naming individual component ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentCategory {
    Battery,
    Grid,
    Meter,
    Inverter,
    EvCharger,
    Chp,
}

/// Selector for the components a dispatch targets.
///
/// Either an explicit list of component ids or a list of categories.
/// The scheduling engine never interprets the selector; it is carried
/// through and compared for equality by list filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetComponents {
    /// Individual component ids.
    Ids(Vec<u64>),
    /// Every component of the given categories.
    Categories(Vec<ComponentCategory>),
}

impl TargetComponents {
    /// True if the selector names no components at all.
    pub fn is_empty(&self) -> bool {
        match self {
            TargetComponents::Ids(ids) => ids.is_empty(),
            TargetComponents::Categories(cats) => cats.is_empty(),
        }
    }
}
