//! Logger bootstrap for the binary and tests.
use env_logger::{Builder, Env};

/// Filter used when nothing more specific is requested.
const QUIET_FILTER: &str = "info";
/// Filter enabling per-tick diagnostics from this crate only.
const VERBOSE_FILTER: &str = "info,tilebound=debug";

/// Initializes the global logger.
///
/// When `verbose` is `true`, this crate's per-tick debug diagnostics
/// (break-free reasons, tile destruction, ignored forces) are printed while
/// dependencies stay at info level. `RUST_LOG` overrides either default.
/// Timestamps are dropped; ticks are the meaningful clock here.
pub fn init(verbose: bool) {
    let filter = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
    let mut builder = Builder::from_env(Env::default().default_filter_or(filter));
    builder.format_timestamp(None);

    // `try_init` only fails if a logger was already set, so tests can call
    // `init` repeatedly.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn repeated_initialisation_is_harmless() {
        init(true);
        init(false);
        log::debug!("still logging");
    }
}
