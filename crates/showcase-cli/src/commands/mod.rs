pub mod class;
pub mod config;
pub mod report;
pub mod session;
pub mod student;
pub mod subject;

use showcase_core::store::open_backend;
use showcase_core::{Config, Role, Store};

/// Open the configured persistence backend.
pub(crate) fn open_store(config: &Config) -> Result<Box<dyn Store>, Box<dyn std::error::Error>> {
    Ok(open_backend(config.storage.backend)?)
}

/// Subject and class mutation is teacher-only; the store itself does not
/// enforce authorization.
pub(crate) fn require_teacher(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match config.profile.role {
        Role::Teacher => Ok(()),
        Role::Student => Err("this command requires the teacher role".into()),
    }
}
