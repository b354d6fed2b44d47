pub mod driver;
#[cfg(test)]
pub mod driver_test;
pub mod event;
pub mod hid_report;
pub mod mapping;
pub mod report_descriptor;
