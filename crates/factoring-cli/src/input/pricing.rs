use factoring_core::factoring::pricing::PricingSchedule;
use tracing::debug;

use super::file;

/// Pricing schedule from `--pricing`, or the house defaults.
///
/// Fields missing from the file keep their default values.
pub fn load_pricing(path: Option<&str>) -> Result<PricingSchedule, Box<dyn std::error::Error>> {
    let schedule = match path {
        Some(path) => {
            debug!(path, "loading pricing schedule");
            file::read_structured::<PricingSchedule>(path)?
        }
        None => PricingSchedule::default(),
    };
    schedule.validate()?;
    Ok(schedule)
}
