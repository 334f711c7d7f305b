//! Client for the Discogs catalog API: rate-limit aware transport,
//! collection pagination, marketplace price lookups, and credentials.

pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
pub mod paginate;
pub mod scripted;
pub mod transport;
pub mod types;

pub use client::{API_BASE, CatalogClient};
pub use credentials::{
    CredentialSource, CredentialSources, Credentials, config_path, credential_sources,
    default_user_agent, mask,
};
pub use error::CatalogError;
pub use http::{HttpBackend, HttpRequest, HttpResponse, ReqwestBackend, Sleeper, ThreadSleeper};
pub use paginate::{Collection, FetchRequest, PageProgress, fetch_all};
pub use scripted::{RecordingSleeper, ScriptedBackend};
pub use transport::{RetryPolicy, Transport, TransportStats, parse_retry_after};
pub use types::{CollectionPage, CollectionRelease, Identity, ReleasePrice};
