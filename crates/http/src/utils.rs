//! Internal helpers.

/// Returns early with `$error` when `$predicate` is false.
///
/// ```ignore
/// ensure!(total <= declared, ParseError::body_length_overflow(declared, total));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
