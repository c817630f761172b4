//! Small conveniences shared by the CLI and library internals.

use log::error;

/// Unwraps a `Result`, logging the error at `error` level before panicking,
/// so a CLI failure leaves a trace in the log output rather than just a
/// bare panic message.
pub trait LogOnErrUnwrap<T> {
    fn log_unwrap(self) -> T;
}

impl<T, E: std::fmt::Display> LogOnErrUnwrap<T> for Result<T, E> {
    fn log_unwrap(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                error!("{e}");
                panic!("{e}");
            }
        }
    }
}

/// Initialises `env_logger` once per process; safe to call more than once.
pub fn init_logging(verbosity: &clap_verbosity_flag::Verbosity) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity.log_level_filter());
    let _ = builder.try_init();
}
