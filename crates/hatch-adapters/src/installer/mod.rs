//! Package installer adapters.

mod npm;

pub use npm::{DEFAULT_PROGRAM, NpmInstaller};
