//! Shared plumbing for the CMS platform binaries and test suites.

pub mod logging;
