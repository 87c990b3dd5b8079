//! Shared error taxonomy and logging setup.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::logging;

    #[test]
    fn test_logging_init_accepts_levels() {
        // Should not panic, even when called repeatedly.
        logging::init("info");
        logging::init("debug");
        logging::init("warn");
    }
}
