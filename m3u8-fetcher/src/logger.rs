use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

static LOGGER: Logger = Logger;

/// Console logger. Progress lines go out bare, other levels carry a coloured
/// tag, and `-v` adds the target and source location to every line.
pub struct Logger;

impl Logger {
    /// Installs the logger, `verbose` is the number of `-v` flags.
    pub fn init(verbose: u8) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER).map(|()| log::set_max_level(level_filter(verbose)))
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_record(record, log::max_level() >= LevelFilter::Debug);

        match record.level() {
            Level::Error | Level::Warn => eprintln!("{}", line),
            Level::Info | Level::Debug | Level::Trace => println!("{}", line),
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record, verbose: bool) -> String {
    if !verbose {
        return match record.level() {
            Level::Info => record.args().to_string(),
            level => format!("{} {}", tag(level), record.args()),
        };
    }

    let location = record
        .file()
        .zip(record.line())
        .map(|(file, line)| format!("{}:{}", file, line))
        .unwrap_or_else(|| "unk".to_owned());

    format!(
        "{} {} {} {}",
        tag(record.level()),
        record.target().dimmed(),
        format!("[{}]", location).dimmed(),
        record.args()
    )
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "error:".bold().red(),
        Level::Warn => "warning:".bold().yellow(),
        Level::Info => "info:".bold().green(),
        Level::Debug => "debug:".bold().blue(),
        Level::Trace => "trace:".bold().purple(),
    }
}
