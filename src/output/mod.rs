mod report;
mod styling;

pub use report::{report_builds, ReportOptions};
