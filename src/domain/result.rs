//! Result type alias for rkboot
//!
//! Convenience alias that uses [`BootError`] as the error type.

use super::errors::BootError;

/// Result type alias for rkboot operations
///
/// # Examples
///
/// ```
/// use rkboot::domain::result::Result;
/// use rkboot::domain::errors::BootError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BootError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BootError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::BootError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(BootError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
