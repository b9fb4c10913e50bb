//! Selfsame Probes - independent public-data collection units
//!
//! Every probe implements one shared contract: consume the handle (and
//! sometimes the resolved platform id), produce a typed partial result.
//! Probes are best-effort and mutually independent; a timeout, transport
//! error, or malformed response degrades that probe's slot in the report
//! and never aborts the pipeline.

pub mod advanced;
pub mod crossref;
pub mod exposure;
pub mod leaks;
pub mod presence;
pub mod probe;
pub mod resolver;

pub use advanced::{AdvancedMatchProbe, AdvancedTarget, ADVANCED_TARGETS};
pub use crossref::CrossPlatformProbe;
pub use exposure::ExposureProbe;
pub use leaks::LeakSignalProbe;
pub use presence::{profile_url, PlatformTarget, PresenceProbe, PLATFORM_TARGETS};
pub use probe::{Probe, ProbeContext, ProbeOutcome};
pub use resolver::{fetch_profile, resolve_identity, ResolveError, ResolvedIdentity};
