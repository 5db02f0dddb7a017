//! Remote clients
//!
//! Each client validates its payload once at the boundary and degrades to a
//! documented default; none of them return an error to the builder.

pub mod enrichment;
pub mod presence;
pub mod sponsored;

pub use enrichment::{EnrichmentSource, TraderEnrichmentClient};
pub use presence::{CredentialSource, FixedCredential, PresenceClient, PresenceSource};
pub use sponsored::{AdRosterClient, RawAdTrader, SponsoredSource, DEFAULT_SPONSORED_LIMIT};
