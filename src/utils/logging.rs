/// Initialize tracing/logging for the node.
///
/// Unrecognized level names fall back to `info`. Uses `try_init` so tests
/// and libraries can call this multiple times without panicking.
pub fn init(default_level: &str) {
    let lvl: tracing::Level = default_level.parse().unwrap_or(tracing::Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic, including on repeat calls and junk input
        init("info");
        init("debug");
        init("not-a-level");
    }
}
