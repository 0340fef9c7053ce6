// Domain models (ported from the original service)

mod report;
mod sample;

pub use report::PeriodReport;
pub use sample::{DEVICE_TIME_FORMAT, RawDeviceReading, RawLocation, ReadingError, Sample};
