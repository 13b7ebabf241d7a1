// Error taxonomy shared by loaders, fetchers and widgets
use serde::Serialize;

/// The chart library asset could not be made available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryLoadError {
    #[error("failed to fetch chart library {url}: {reason}")]
    Unavailable { url: String, reason: String },
    #[error("chart library {url} responded with status {status}")]
    Status { url: String, status: u16 },
}

/// Failure of a single call to an aggregation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure: connection refused, reset, timed out.
    #[error("network error: {0}")]
    Network(String),
    /// Non-success status, error envelope or envelope without `result`.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Body or `result` not parseable as the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// The widget's anchor is gone from the page. Logged, never shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("render target {anchor} missing")]
pub struct RenderTargetMissing {
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset has {labels} labels but {values} values")]
    LengthMismatch { labels: usize, values: usize },
    #[error("dataset has {colors} colors for {values} values")]
    ColorMismatch { colors: usize, values: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LibraryLoad,
    Network,
    Protocol,
    Decode,
}

/// Error held by a widget in its `Error` state. `detail` is diagnostic only;
/// the placeholder shown to the user comes from the widget kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind:?}: {detail}")]
pub struct WidgetError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<LibraryLoadError> for WidgetError {
    fn from(err: LibraryLoadError) -> Self {
        Self {
            kind: ErrorKind::LibraryLoad,
            detail: err.to_string(),
        }
    }
}

impl From<FetchError> for WidgetError {
    fn from(err: FetchError) -> Self {
        let kind = match &err {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Protocol(_) => ErrorKind::Protocol,
            FetchError::Decode(_) => ErrorKind::Decode,
        };
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kind_is_preserved() {
        let err = WidgetError::from(FetchError::Protocol("missing result".to_string()));
        assert_eq!(err.kind, ErrorKind::Protocol);
        assert!(err.detail.contains("missing result"));
    }

    #[test]
    fn test_library_error_maps_to_library_kind() {
        let err = WidgetError::from(LibraryLoadError::Status {
            url: "/chart.js".to_string(),
            status: 404,
        });
        assert_eq!(err.kind, ErrorKind::LibraryLoad);
        assert!(err.detail.contains("404"));
    }
}
