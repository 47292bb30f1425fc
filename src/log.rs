//! Utilities for logging messages from the library.

#[doc(hidden)]
#[macro_export]
macro_rules! svg2pptx_log {
    (
        $session:expr,
        $($arg:tt)+
    ) => {
        if $session.log_enabled() {
            println!("{}", format_args!($($arg)+));
        }
    };
}
