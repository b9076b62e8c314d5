/// Returns `true` if the HTTP status code is a 2xx success.
///
/// Every other code, including 3xx responses that reached the caller without
/// being followed, is a transport-level failure for a fetch.
///
/// # Examples
///
/// ```
/// use tandem_fetch::core::is_success;
///
/// assert!(is_success(200));
/// assert!(is_success(204));
/// assert!(!is_success(304));
/// assert!(!is_success(404));
/// ```
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
