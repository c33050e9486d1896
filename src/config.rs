/// Default base URL for the ADS biblib API.
pub const DEFAULT_API_URL: &str = "https://api.adsabs.harvard.edu/v1/biblib";

/// Immutable run configuration, built once at startup and passed by
/// parameter to every component entrypoint.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Base URL of the biblib API, without a trailing slash.
    pub api_url: String,
    /// Bearer token for the `Authorization` header.
    pub api_token: String,
    /// Identifier of the source library to copy from.
    pub library_id: String,
    /// Name of the destination library. When absent, the source
    /// library's own name is used as the target name.
    pub library_name: Option<String>,
}
