//! Standard booking-platform modules.

use crate::modules::{ModuleDescriptor, ModuleVersion};

pub const PROPERTIES: &str = "properties";
pub const BOOKINGS: &str = "bookings";
pub const RATES: &str = "rates";
pub const AVAILABILITY: &str = "availability";
pub const QUOTES: &str = "quotes";
pub const MESSAGING: &str = "messaging";
pub const WEBHOOKS: &str = "webhooks";

const STANDARD: &[(&str, ModuleVersion, &str)] = &[
    (PROPERTIES, ModuleVersion::V2, "properties"),
    (BOOKINGS, ModuleVersion::V2, "reservations/bookings"),
    (RATES, ModuleVersion::Both, "rates"),
    (AVAILABILITY, ModuleVersion::V2, "availability"),
    (QUOTES, ModuleVersion::V2, "quote"),
    (MESSAGING, ModuleVersion::V2, "messaging"),
    (WEBHOOKS, ModuleVersion::V1, "webhooks"),
];

/// Descriptors for every standard module.
pub fn standard_modules() -> Vec<ModuleDescriptor> {
    STANDARD
        .iter()
        .map(|(name, version, base)| ModuleDescriptor::new(*name, *version, *base))
        .collect()
}

/// Look up one standard descriptor by name.
pub fn standard_module(name: &str) -> Option<ModuleDescriptor> {
    STANDARD
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(name, version, base)| ModuleDescriptor::new(*name, *version, *base))
}
