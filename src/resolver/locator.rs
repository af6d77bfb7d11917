use super::ResolveError;

/// Scheme prefix that routes an identifier to the in-archive resolver.
pub const VSIX_SCHEME: &str = "vsix:";

/// Parsed form of a composite `vsix:<container>!<entry>` identifier.
///
/// The container location is a filesystem path or URL; the entry path is the
/// slash-delimited relative path of a file inside that container, with the
/// mandatory leading `/` already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeLocator {
    pub container: String,
    pub entry: String,
}

impl CompositeLocator {
    /// Parse an identifier string.
    ///
    /// Returns `Ok(None)` for identifiers that do not use the `vsix:` scheme;
    /// those are handled by the default resolver. A `vsix:` identifier with
    /// no `!` separator, or whose entry part does not start with `/`, is a
    /// hard format error.
    pub fn parse(uri: &str) -> Result<Option<Self>, ResolveError> {
        let Some(rest) = uri.strip_prefix(VSIX_SCHEME) else {
            return Ok(None);
        };

        let format_error = || ResolveError::Format {
            uri: uri.to_string(),
        };

        // Split on the first '!': before is the container, after the entry.
        let (container, entry) = rest.split_once('!').ok_or_else(format_error)?;

        // The entry path must start with a separator; exactly one is stripped.
        let entry = entry.strip_prefix('/').ok_or_else(format_error)?;

        if container.is_empty() || entry.is_empty() {
            return Err(format_error());
        }

        Ok(Some(Self {
            container: container.to_string(),
            entry: entry.to_string(),
        }))
    }
}
