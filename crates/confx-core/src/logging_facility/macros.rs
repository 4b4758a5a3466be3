//! Canonical logging macros
//!
//! Every event carries `component`, `op` and `event` so that log processors
//! and tests can match on them without parsing messages.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use confx_core::log_op_start;
/// log_op_start!("flatten");
/// log_op_start!("flatten", entity_type = "services");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use confx_core::log_op_end;
/// log_op_end!("flatten", duration_ms = 3);
/// log_op_end!("flatten", duration_ms = 3, record_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that ended in a contract fault
///
/// # Example
///
/// ```
/// # use confx_core::{log_op_error, CoreError};
/// let err = CoreError::MissingCode;
/// log_op_error!("build", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err: &$crate::errors::CoreError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_code = err.code(),
            error = %err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err: &$crate::errors::CoreError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_code = err.code(),
            error = %err,
            $($field)*
        );
    }};
}

/// Log a data anomaly that was skipped
///
/// # Example
///
/// ```
/// # use confx_core::log_anomaly;
/// log_anomaly!("flatten", "entity_missing", entity_type = "routes", entity_index = 3);
/// ```
#[macro_export]
macro_rules! log_anomaly {
    ($op:expr, $reason:expr) => {
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_ANOMALY,
            anomaly = $reason,
        );
    };
    ($op:expr, $reason:expr, $($field:tt)*) => {
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_ANOMALY,
            anomaly = $reason,
            $($field)*
        );
    };
}
