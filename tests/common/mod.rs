#![allow(dead_code)]

pub mod builders;
pub mod fakes;

pub use builders::catalog::{Readings, TestCatalogBuilder};
pub use fakes::cursor::RecordingCursor;

/// `pkg0` reading 5000 mW power and 42 C temperature
pub fn pkg0_catalog() -> TestCatalogBuilder {
    TestCatalogBuilder::new().with_constant_device("pkg0", &[("power", 1, "mW", 5000.0), ("temp", 2, "C", 42.0)])
}
