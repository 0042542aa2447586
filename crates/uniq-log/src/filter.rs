use core::str::FromStr;

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use crate::Level;

/// Per-target level filter in `RUST_LOG` syntax.
///
/// The filter is a comma-separated list of `level` or `target=level` items.
/// A bare level sets the base level, a target item applies to that target
/// and every `::` descendant of it. Items with an unknown level are ignored.
#[derive(Clone, Debug)]
pub struct Filter {
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl Default for Filter {

    fn default() -> Self {
        Self {
            target_levels: FxHashMap::default(),
            base_level: Level::Error,
        }
    }
}

impl Filter {

    pub fn parse(filter: &str) -> Self {
        let mut res = Self::default();
        for arg in filter.split(',') {
            let arg = arg.trim();
            if arg.is_empty() {
                continue
            }
            let (target, level) = match arg.find('=') {
                Some(i) => (Some(arg[..i].trim()), arg[i + 1..].trim()),
                None => (None, arg),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            match target {
                Some(target) => {
                    let entry = res.target_levels
                        .entry(CompactString::new(target))
                        .or_insert(level);
                    *entry = (*entry).min(level);
                },
                None => res.base_level = level,
            }
        }
        res
    }

    #[inline(always)]
    pub fn base_level(&self) -> Level {
        self.base_level
    }

    /// Resolves the level for `target`, walking up its module path until a
    /// configured prefix is found.
    pub fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }

    #[inline(always)]
    pub fn enabled(&self, target: &str, level: Level) -> bool {
        level <= self.target_level(target)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn empty_filter_only_passes_errors() {
        let filter = Filter::parse("");
        assert_eq!(filter.base_level(), Level::Error);
        assert!(filter.enabled("any::target", Level::Error));
        assert!(!filter.enabled("any::target", Level::Warn));
    }

    #[test]
    fn bare_level_sets_base() {
        let filter = Filter::parse("debug");
        assert_eq!(filter.target_level("uniq_mem"), Level::Debug);
        assert!(filter.enabled("uniq_mem", Level::Debug));
        assert!(!filter.enabled("uniq_mem", Level::Trace));
    }

    #[test]
    fn target_applies_to_descendants() {
        let filter = Filter::parse("warn, uniq_mem=trace");
        assert_eq!(filter.target_level("uniq_mem"), Level::Trace);
        assert_eq!(filter.target_level("uniq_mem::policy::logged"), Level::Trace);
        assert_eq!(filter.target_level("uniq_memory"), Level::Warn);
        assert_eq!(filter.target_level("demo"), Level::Warn);
    }

    #[test]
    fn nearest_prefix_wins() {
        let filter = Filter::parse("uniq_mem=info,uniq_mem::policy=trace");
        assert_eq!(filter.target_level("uniq_mem::unique"), Level::Info);
        assert_eq!(filter.target_level("uniq_mem::policy::logged"), Level::Trace);
    }

    #[test]
    fn duplicate_target_keeps_most_restrictive() {
        let filter = Filter::parse("uniq_mem=trace,uniq_mem=warn");
        assert_eq!(filter.target_level("uniq_mem"), Level::Warn);
    }

    #[test]
    fn unknown_levels_are_ignored() {
        let filter = Filter::parse("loud,uniq_mem=verbose, INFO");
        assert_eq!(filter.base_level(), Level::Info);
        assert_eq!(filter.target_level("uniq_mem"), Level::Info);
    }
}
