//! Log level for the console backend installed at start.

use log::Level;

/// Verbose on a local dev server.
pub fn level_for_host(hostname: Option<&str>) -> Level {
    match hostname {
        Some("localhost") | Some("127.0.0.1") => Level::Debug,
        _ => Level::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_logs_debug() {
        assert_eq!(level_for_host(Some("localhost")), Level::Debug);
        assert_eq!(level_for_host(Some("127.0.0.1")), Level::Debug);
        assert_eq!(level_for_host(Some("example.dev")), Level::Info);
        assert_eq!(level_for_host(None), Level::Info);
    }
}
