use crate::error::DipiError;

/// A parsed remote destination address: `user@host:path[ -p port]`.
///
/// Never cached between uses. Variable resolution can change the
/// destination string from one instruction to the next, so it is
/// re-parsed wherever it is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub username: String,
    pub host: String,
    pub path: String,
    pub port: u16,
}

/// A location is remote iff it contains both `@` and `:`. Everything
/// else is a local filesystem path. This single predicate governs every
/// local/remote branch in the interpreter.
pub fn is_remote(location: &str) -> bool {
    location.contains('@') && location.contains(':')
}

impl Destination {
    pub fn parse(target: &str) -> Result<Self, DipiError> {
        let pattern = regex::Regex::new(r"^(?P<username>[^@:]+)@(?P<host>[^@:]+):(?P<path>.+)$")?;
        let captures = pattern
            .captures(target)
            .ok_or_else(|| DipiError::MalformedDestination(target.to_string()))?;

        let username = captures
            .name("username")
            .ok_or_else(|| DipiError::MalformedDestination(target.to_string()))?
            .as_str();
        let host = captures
            .name("host")
            .ok_or_else(|| DipiError::MalformedDestination(target.to_string()))?
            .as_str();
        let rest = captures
            .name("path")
            .ok_or_else(|| DipiError::MalformedDestination(target.to_string()))?
            .as_str();

        let (path, port) = match rest.split_once(" -p ") {
            Some((path, port)) => {
                let port = port
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| DipiError::MalformedDestination(target.to_string()))?;
                (path.trim_end(), port)
            }
            None => (rest, 22),
        };

        if path.is_empty() {
            return Err(DipiError::MalformedDestination(target.to_string()));
        }

        Ok(Self {
            username: username.to_string(),
            host: host.to_string(),
            path: path.to_string(),
            port,
        })
    }
}
