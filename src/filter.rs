use fxhash::FxHashMap;
use log::LevelFilter;

const ENV_RUST_LOG: &str = "RUST_LOG";

/// Per-target level filters for the forwarding path.
///
/// Parsed from `RUST_LOG` as a comma separated list: a bare level sets
/// the default, `target=level` overrides a single target. Lookups are
/// exact; malformed parts are skipped. Captured entries are never
/// filtered, a spy sees every level.
#[derive(Debug, Clone)]
pub(crate) struct TargetFilters {
    default: LevelFilter,
    overrides: FxHashMap<String, LevelFilter>,
}

impl TargetFilters {
    pub(crate) fn new() -> Self {
        Self {
            default: log::STATIC_MAX_LEVEL,
            overrides: FxHashMap::default(),
        }
    }

    pub(crate) fn from_env() -> Self {
        let mut this = Self::new();
        if let Ok(s) = std::env::var(ENV_RUST_LOG) {
            this.parse_str(&s);
        }
        this
    }

    pub(crate) fn parse_str(&mut self, s: &str) {
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            match part.split_once('=') {
                Some((target, level)) => {
                    if target.is_empty() {
                        continue;
                    }
                    let Ok(level) = level.parse::<LevelFilter>() else {
                        continue;
                    };
                    self.overrides.insert(target.to_string(), level);
                }
                None => {
                    if let Ok(level) = part.parse::<LevelFilter>() {
                        self.default = level;
                    }
                }
            }
        }
    }

    pub(crate) fn level_for(&self, target: &str) -> LevelFilter {
        self.overrides.get(target).copied().unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_from_bare_directive() {
        let mut filters = TargetFilters::new();
        filters.parse_str("warn");
        assert_eq!(filters.level_for("anything"), LevelFilter::Warn);
    }

    #[test]
    fn target_overrides_are_exact() {
        let mut filters = TargetFilters::new();
        filters.parse_str("warn,app::auth=trace");
        assert_eq!(filters.level_for("app::auth"), LevelFilter::Trace);
        assert_eq!(filters.level_for("app::auth::inner"), LevelFilter::Warn);
        assert_eq!(filters.level_for("app"), LevelFilter::Warn);
    }

    #[test]
    fn malformed_parts_are_skipped() {
        let mut filters = TargetFilters::new();
        filters.parse_str("warn,app=notalevel,=info,,app::db=error");
        assert_eq!(filters.level_for("app"), LevelFilter::Warn);
        assert_eq!(filters.level_for("app::db"), LevelFilter::Error);
    }

    #[test]
    fn later_directives_win() {
        let mut filters = TargetFilters::new();
        filters.parse_str("info,app=debug,app=error");
        assert_eq!(filters.level_for("app"), LevelFilter::Error);
    }
}
