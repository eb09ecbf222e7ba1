//! Logger setup.
//!
//! In the browser, records go to the devtools console and panics print a
//! readable message. Natively (tests, tools) `env_logger` reads `RUST_LOG`
//! and defaults to `info`. Calling [`init`] more than once is harmless.

/// Install the logger for the current target.
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_ok() {
            log::info!("[Cursors] WASM module initialized");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .is_test(cfg!(test))
        .try_init();
    }
}
