//! Logging bootstrap.
//!
//! Library code logs through `tracing`. Natively a `tracing-subscriber`
//! formatter prints events; in the browser, `tracing`'s `log` bridge feeds
//! `console_log`, which writes to the devtools console.

/// Install the logger for the current target. Safe to call more than once.
pub fn init() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        // Err means a logger is already installed.
        let _ = console_log::init_with_level(log::Level::Info);
    }
    #[cfg(all(not(feature = "hydrate"), not(target_arch = "wasm32")))]
    {
        let _ = tracing_subscriber::fmt::try_init();
    }
}
