//! Provisioning services.

pub mod directory;
pub mod engine;
pub mod group_cache;
pub mod pagination;
pub mod patch;
pub mod path_parser;

pub use directory::{collect_users, PendingUsers};
pub use engine::ProvisioningEngine;
pub use group_cache::{GroupCache, GROUP_CACHE_TTL};
pub use pagination::windowed;
pub use patch::{apply_operations, PatchOutcome};
pub use path_parser::{parse_patch_path, FilterExpr, FilterParser, PatchPath};
