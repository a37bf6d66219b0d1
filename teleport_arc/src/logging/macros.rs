/// Emit a tracing event tagged with `scope`, gated on the scope's configured level
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {
        if $crate::logging::get_log_config().should_log($scope, $crate::logging::Level::$level) {
            $crate::__tracing_event!($level, $scope, $($arg)*);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tracing_event {
    (ERROR, $scope:expr, $($arg:tt)*) => { $crate::logging::error!(scope = $scope, $($arg)*) };
    (WARN, $scope:expr, $($arg:tt)*) => { $crate::logging::warn!(scope = $scope, $($arg)*) };
    (INFO, $scope:expr, $($arg:tt)*) => { $crate::logging::info!(scope = $scope, $($arg)*) };
    (DEBUG, $scope:expr, $($arg:tt)*) => { $crate::logging::debug!(scope = $scope, $($arg)*) };
    (TRACE, $scope:expr, $($arg:tt)*) => { $crate::logging::trace!(scope = $scope, $($arg)*) };
}

// Convenience macros for the arc's scopes

#[macro_export]
macro_rules! arc_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "arc", $($arg)*)
    };
}

#[macro_export]
macro_rules! collision_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "collision", $($arg)*)
    };
}

#[macro_export]
macro_rules! render_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "render", $($arg)*)
    };
}

#[macro_export]
macro_rules! teleport_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "teleport", $($arg)*)
    };
}
