//! Classify HTTP status and curl errors into failure kinds.

use super::FailureKind;

/// Classify a non-2xx HTTP status code.
pub fn classify_http_status(code: u32) -> FailureKind {
    match code {
        404 | 410 => FailureKind::NotFound,
        _ => FailureKind::Other,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return FailureKind::ConnectionError;
    }
    FailureKind::Other
}
