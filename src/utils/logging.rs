/// Initialize tracing/logging for the application.
///
/// Verbose mode enables DEBUG output, otherwise INFO is the floor.
pub fn init(verbose: bool) {
    let lvl = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Use try_init so tests and libraries can call this multiple times without panicking
    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .try_init();
}
