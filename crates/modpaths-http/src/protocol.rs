//! Request/response protocol for the modpaths daemon.
//!
//! Requests are encoded entirely in the URL path:
//!
//! | path | request |
//! |---|---|
//! | `/imports/<partial>` | import-path query |
//! | `/dirs/<partial>` | directory-path query |
//! | `/update` | force a rebuild |
//! | `/<partial>` | directory-path query |
//!
//! Responses are plain text with one match per line.

use modpaths_indexer::QueryKind;

/// Request from a client to the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Suffix query over the index
    Query { partial: String, kind: QueryKind },

    /// Re-index every root now
    Rebuild,
}

impl Request {
    pub fn imports(partial: impl Into<String>) -> Self {
        Request::Query {
            partial: partial.into(),
            kind: QueryKind::Import,
        }
    }

    pub fn dirs(partial: impl Into<String>) -> Self {
        Request::Query {
            partial: partial.into(),
            kind: QueryKind::Path,
        }
    }

    /// Parse a percent-decoded request path.
    ///
    /// Paths whose first segment is not recognized are directory queries
    /// over the whole path.
    pub fn from_path(path: &str) -> Self {
        let query = path.strip_prefix('/').unwrap_or(path);

        match query.split('/').next().unwrap_or_default() {
            "imports" => Self::imports(query.strip_prefix("imports/").unwrap_or(query)),
            "dirs" => Self::dirs(query.strip_prefix("dirs/").unwrap_or(query)),
            "update" => Request::Rebuild,
            _ => Self::dirs(query),
        }
    }

    /// The percent-encoded request path.
    pub fn to_path(&self) -> String {
        match self {
            Request::Query { partial, kind } => {
                format!("/{}/{}", kind.as_str(), encode_segments(partial))
            }
            Request::Rebuild => "/update".to_string(),
        }
    }
}

fn encode_segments(partial: &str) -> String {
    partial
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Response from daemon to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Query results, in index order
    Matches(Vec<String>),

    /// Rebuild finished
    Rebuilt,

    /// Error response
    Error { code: ErrorCode, message: String },
}

impl Response {
    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Response::Error {
            code,
            message: message.into(),
        }
    }

    /// Response body: each match followed by a newline.
    ///
    /// No matches and rebuilds both produce an empty body.
    pub fn body(&self) -> String {
        match self {
            Response::Matches(matches) => matches.iter().map(|m| format!("{m}\n")).collect(),
            Response::Rebuilt => String::new(),
            Response::Error { message, .. } => format!("{message}\n"),
        }
    }

    /// Split a response body back into matches.
    pub fn parse_matches(body: &str) -> Vec<String> {
        body.lines().map(str::to_string).collect()
    }
}

/// Error codes for error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request path could not be decoded
    InvalidRequest,
    /// Internal daemon error
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::InvalidRequest => 400,
            ErrorCode::InternalError => 500,
        }
    }
}
