//! CLI command implementations

pub(crate) mod boot;
pub(crate) mod common;
pub(crate) mod deps;
pub(crate) mod migrate;
pub(crate) mod schema;
pub(crate) mod status;
pub(crate) mod unlock;
