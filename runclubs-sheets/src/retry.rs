use std::fmt::Display;
use std::thread;
use std::time::Duration;

use crate::error::SheetError;

/// Call `f` up to `attempts` times, sleeping between attempts. The delay
/// starts at `delay` and doubles after every failure.
pub fn retry<T, E: Display>(
    attempts: u32,
    mut delay: Duration,
    mut f: impl FnMut() -> Result<T, E>,
) -> Result<T, SheetError> {
    let mut last = String::from("no attempts made");
    for attempt in 0..attempts {
        if attempt > 0 {
            log::warn!(
                "attempt {attempt}/{attempts} failed: {last}; retrying in {}s",
                delay.as_secs()
            );
            thread::sleep(delay);
            delay *= 2;
        }
        match f() {
            Ok(value) => return Ok(value),
            Err(e) => last = e.to_string(),
        }
    }
    Err(SheetError::RetriesExhausted { attempts, last })
}
