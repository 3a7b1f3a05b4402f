//! Shared constants.

/// Length of the truncated hex digest used for plan fingerprints.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// File name suffixes recognised as descriptor files when loading a directory.
pub const DESCRIPTOR_SUFFIXES: &[&str] = &[".modplan.toml", ".modplan.json"];

/// Newest build settings version understood when no configuration overrides it.
pub const DEFAULT_LATEST_BUILD_SETTINGS: u32 = 5;

/// Newest include order version (major, minor) understood by default.
pub const DEFAULT_LATEST_INCLUDE_ORDER: (u32, u32) = (5, 4);

/// Settings version below which explicit-or-shared PCH negotiation is unavailable.
pub const EXPLICIT_OR_SHARED_PCH_SINCE: u32 = 2;

/// Placeholder used in diagnostics when a descriptor has no usable name.
pub const UNNAMED_DESCRIPTOR: &str = "<unnamed>";
