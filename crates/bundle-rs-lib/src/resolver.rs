//! Turns a bundle manifest into a resolved, position-aligned list of plugins.
//!
//! # Usage
//! 1. Create a [`ResolutionSession`] from a [`Manifest`](crate::Manifest).
//! 1. Feed it the two marketplace bulk responses with [`ResolutionSession::set_by_id_response()`]
//! and [`ResolutionSession::set_by_meta_response()`].
//! 1. Hand the callbacks from [`ResolutionSession::on_resolved()`] and [`ResolutionSession::on_error()`]
//! to whatever fetches the version-control dependencies.
//! 1. Call [`ResolutionSession::poll_readiness()`] after every event. It yields the identity keys to
//! look up installed state for exactly once, when resolution completes.
//! 1. [`ResolutionSession::complete()`] with the installed state to get a session to query
//! for versions and installability.
//!
//! [`resolve_bundle()`](crate::resolve_bundle) does all of this against async collaborators.

mod classifier;
pub use classifier::classify;
pub use classifier::Classified;
pub use classifier::MarketplaceEntry;
pub use classifier::VcsEntry;

mod marketplace;
pub use marketplace::BulkResponse;
pub use marketplace::ListingVersion;
pub use marketplace::MarketplaceListing;
pub use marketplace::MarketplaceResolution;
pub use marketplace::MarketplaceResolver;

mod vcs;
pub use vcs::OnError;
pub use vcs::OnResolved;
pub use vcs::VcsArena;
pub use vcs::VcsResolver;

mod merge;
pub use merge::merge;
pub use merge::Merged;

mod readiness;
pub use readiness::ReadinessGate;
pub use readiness::ReadinessMode;

mod session;
pub use session::Complete;
pub use session::DerivedState;
pub use session::InProgress;
pub use session::ResolutionSession;
