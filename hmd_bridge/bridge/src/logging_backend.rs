use hmd_bridge_common::{settings::LoggingSettings, *};
use log::*;
use std::sync::Once;

const TRACE_CONTEXT: &str = "Logging backend";

static INIT_LOGGING_ENTRY_POINT: Once = Once::new();

fn dispatch(settings: &LoggingSettings) -> StrResult<fern::Dispatch> {
    let dispatch = if settings.verbose {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] At {}:{}:\n{}",
                    chrono::Local::now().format("%H:%M:%S.%f"),
                    record.level(),
                    record.file().unwrap_or("?"),
                    record.line().unwrap_or(0),
                    message
                ))
            })
            .level(LevelFilter::Trace)
    } else {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S.%f"),
                    record.level(),
                    message
                ))
            })
            .level(LevelFilter::Info)
    }
    .chain(std::io::stdout());

    Ok(match &settings.log_file {
        Some(path) => dispatch.chain(trace_err!(fern::log_file(path), "{:?}", path)?),
        None => dispatch,
    })
}

/// Installs the global logger. Sessions may be opened more than once per process (for example
/// after a failed probe), so only the first call has an effect. `show_error_fn` receives fatal
/// errors and panic reports.
pub fn init_logging(settings: &LoggingSettings, show_error_fn: Option<fn(&str)>) -> StrResult {
    let mut result = Ok(());

    INIT_LOGGING_ENTRY_POINT.call_once(|| {
        result = dispatch(settings).and_then(|dispatch| trace_err!(dispatch.apply()));

        if let Some(show_error_fn) = show_error_fn {
            set_show_error_fn(show_error_fn);
        }
    });

    result
}
