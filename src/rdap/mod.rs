//! RDAP endpoint knowledge for the availability probe.

pub mod registry;
