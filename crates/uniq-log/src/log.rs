use std::sync::OnceLock;

use core::str::FromStr;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use parking_lot::{Mutex, MutexGuard};

use crate::*;

/// Handle to a format registered with [`custom_fmt`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CustomFmt(u32);

impl CustomFmt {

    #[inline(always)]
    pub fn index(self) -> u32 {
        self.0
    }
}

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Level {
    Always = -1,
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "LOG",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl LevelFmt {

    #[inline(always)]
    pub fn level(&self) -> Level {
        match *self {
            Self::Error => Level::Error,
            Self::Warn => Level::Warn,
            Self::Info => Level::Info,
            Self::Debug => Level::Debug,
            Self::Trace => Level::Trace,
            Self::Other(_, level) => level,
        }
    }
}

struct Logger {
    stderr: StandardStream,
    level_fmts: [LogFmt; 5],
    custom_fmts: Vec<LogFmt>,
    filter: Filter,
}

impl Logger {

    fn new(filter: Filter) -> Self {
        Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            level_fmts: [
                LogFmt::for_level(Level::Error),
                LogFmt::for_level(Level::Warn),
                LogFmt::for_level(Level::Info),
                LogFmt::for_level(Level::Debug),
                LogFmt::for_level(Level::Trace),
            ],
            custom_fmts: Vec::new(),
            filter,
        }
    }

    fn level_fmt_mut(&mut self, level: Level) -> &mut LogFmt {
        let index = (level as i8).max(0) as usize;
        &mut self.level_fmts[index]
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        let lvl = level.level();
        if !self.filter.enabled(target, lvl) {
            return Ok(false)
        }
        let fmt = match level {
            LevelFmt::Other(fmt, _) => self.custom_fmts
                .get(fmt.0 as usize)
                .ok_or(LogError::UnknownFormat(fmt))?,
            _ => &self.level_fmts[lvl as usize],
        };
        write_record(&mut self.stderr, fmt, lvl, target, msg)?;
        Ok(true)
    }
}

/// Writes one line laid out by `fmt` into `out`.
pub fn write_record<W: WriteColor>(
    out: &mut W,
    fmt: &LogFmt,
    level: Level,
    target: &str,
    msg: core::fmt::Arguments,
) -> Result<()>
{
    let level = level.as_str();
    for segment in fmt {
        let (log_spec, text): (_, &dyn core::fmt::Display) = match segment {
            SegmentSpec::Message(log_spec) => (log_spec, &msg),
            SegmentSpec::Level(log_spec) => (log_spec, &level),
            SegmentSpec::Target(log_spec) => (log_spec, &target),
            SegmentSpec::Text(text, log_spec) => (log_spec, text),
        };
        if let Some(color_spec) = &log_spec.color_spec {
            out.set_color(color_spec)?;
            write!(out, "{}", text)?;
            out.reset()?;
        } else {
            write!(out, "{}", text)?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

#[inline(always)]
fn logger() -> Result<MutexGuard<'static, Logger>> {
    LOGGER
        .get()
        .map(|logger| logger.lock())
        .ok_or(LogError::Uninitialized)
}

/// Initializes the logger with the filter in `RUST_LOG`.
///
/// Does nothing if the logger is already initialized.
pub fn init() {
    let filter = std::env::var("RUST_LOG").unwrap_or_default();
    init_with_filter(&filter)
}

/// Initializes the logger with an explicit filter, see [`Filter::parse`].
///
/// Does nothing if the logger is already initialized.
pub fn init_with_filter(filter: &str) {
    LOGGER.get_or_init(|| Mutex::new(Logger::new(Filter::parse(filter))));
}

#[inline(always)]
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

macro_rules! level_fmt_fns {
    ($($level:ident),+ $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Replaces the format used for `" $level "` lines."]
                #[inline(always)]
                pub fn [<$level:lower _fmt>](f: impl FnOnce(&mut LogFmtBuilder)) -> Result<()> {
                    let mut logger = logger()?;
                    let mut builder = LogFmtBuilder::new(logger.level_fmt_mut(Level::$level));
                    f(&mut builder);
                    Ok(())
                }
            )+
        }
    };
}

level_fmt_fns!(Error, Warn, Info, Debug, Trace);

#[inline(always)]
pub fn custom_fmt(fmt: LogFmt) -> Result<CustomFmt> {
    let mut logger = logger()?;
    let index = logger.custom_fmts.len() as u32;
    logger.custom_fmts.push(fmt);
    Ok(CustomFmt(index))
}

#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    logger()?.log(target, level, args)
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[cfg(test)]
mod tests {

    use termcolor::Buffer;

    use super::*;

    fn render(fmt: &LogFmt, level: Level, target: &str, msg: core::fmt::Arguments) -> String {
        let mut buf = Buffer::no_color();
        write_record(&mut buf, fmt, level, target, msg).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(Level::from_str("TRACE"), Ok(Level::Trace));
        assert_eq!(Level::from_str("Warn"), Ok(Level::Warn));
        assert_eq!(Level::from_str("always"), Err(()));
    }

    #[test]
    fn levels_order_by_verbosity() {
        assert!(Level::Always < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn default_format_layout() {
        let fmt = LogFmt::for_level(Level::Info);
        let line = render(&fmt, Level::Info, "uniq_mem::unique", format_args!("dropped {}", 3));
        assert_eq!(line, "[INFO uniq_mem::unique] dropped 3\n");
    }

    #[test]
    fn built_format_replaces_segments() {
        let mut fmt = LogFmt::for_level(Level::Warn);
        LogFmtBuilder::new(&mut fmt)
            .level(|spec| spec)
            .text(": ", |spec| spec)
            .message(|spec| spec.with_color_spec(|c| { c.set_bold(true); }));
        let line = render(&fmt, Level::Warn, "demo", format_args!("careful"));
        assert_eq!(line, "WARN: careful\n");
    }

    #[test]
    fn empty_format_writes_bare_newline() {
        let fmt = LogFmt::default();
        assert!(fmt.is_empty());
        assert_eq!(render(&fmt, Level::Error, "demo", format_args!("lost")), "\n");
    }
}
