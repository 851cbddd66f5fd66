use std::fmt;

pub type StrResult<T = ()> = Result<T, String>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    // fatal for session construction
    RuntimeUnavailable,
    DeviceUnavailable,

    // per frame, retry on the next frame
    TrackingInvalid,
    CompositorNotReady,

    SubmissionRejected,
    InvalidCall,
    Unsupported,
}

impl ErrorKind {
    pub fn is_transient(self) -> bool {
        matches!(self, Self::TrackingInvalid | Self::CompositorNotReady)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct BridgeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for BridgeError {}

pub type BridgeResult<T = ()> = Result<T, BridgeError>;

fn default_show_error_fn(_: &str) {}
pub static mut _SHOW_ERROR_CB: fn(&str) = default_show_error_fn;

#[macro_export]
macro_rules! show_err_str {
    ($fmt:expr $(, $args:expr)*) => {{
        log::error!($fmt $(, $args)*);
        unsafe { $crate::logging::_SHOW_ERROR_CB(&format!($fmt $(, $args)*)) };
    }};
}

// The host decides how fatal errors reach the user (message box, console, in-app report).
pub fn set_show_error_fn(cb: fn(&str)) {
    unsafe { _SHOW_ERROR_CB = cb };
    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .unwrap_or(&"Unavailable");
        show_err_str!(
            "HMD bridge panicked. This is a bug.\nMessage: {:?}\nBacktrace:\n{:?}",
            message,
            backtrace::Backtrace::new()
        )
    }))
}

#[macro_export]
macro_rules! trace_str {
    ($expect_fmt:expr $(, $args:expr)*) => {
        Err(format!("[{}] At {}:{}", TRACE_CONTEXT, file!(), line!()) +
            ", " + &format!($expect_fmt $(, $args)*))
    };
}

#[macro_export]
macro_rules! trace_err {
    ($res:expr $(, $expect_fmt:expr $(, $args:expr)*)?) => {
        $res.map_err(|e| {
            format!("[{}] At {}:{}", TRACE_CONTEXT, file!(), line!())
                $(+ ", " + &format!($expect_fmt $(, $args)*))? +
                &format!(":\n{:?}", e)
        })
    };
}

#[macro_export]
macro_rules! trace_kind {
    ($kind:ident, $expect_fmt:expr $(, $args:expr)*) => {
        Err($crate::logging::BridgeError {
            kind: $crate::logging::ErrorKind::$kind,
            message: format!("[{}] At {}:{}", TRACE_CONTEXT, file!(), line!()) +
                ", " + &format!($expect_fmt $(, $args)*),
        })
    };
}

#[macro_export]
macro_rules! trace_err_as {
    ($res:expr, $kind:ident $(, $expect_fmt:expr $(, $args:expr)*)?) => {
        $res.map_err(|e| $crate::logging::BridgeError {
            kind: $crate::logging::ErrorKind::$kind,
            message: format!("[{}] At {}:{}", TRACE_CONTEXT, file!(), line!())
                $(+ ", " + &format!($expect_fmt $(, $args)*))? +
                &format!(":\n{:?}", e),
        })
    };
}

#[macro_export]
macro_rules! show_err {
    ($res:expr) => {
        $res.map_err(|e| {
            log::error!("{}", e);
            unsafe { $crate::logging::_SHOW_ERROR_CB(&format!("{}", e)) };
        })
    };
}
