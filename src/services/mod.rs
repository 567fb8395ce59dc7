//! Service layer for Stockroom
//!
//! The engine operations live here as in-memory functions over loaded stores
//! (`matcher`, `similarity`, `transfer`, `sync`, `search`). The `*Service`
//! types wrap them with loading, persisting and audit logging.

pub mod matcher;
pub mod matching;
pub mod order;
pub mod reconciliation;
pub mod search;
pub mod similarity;
pub mod sync;
pub mod transfer;

pub use matcher::Matcher;
pub use matching::{MatchReport, MatchService};
pub use order::{ApplyReport, OrderService};
pub use reconciliation::ReconciliationService;
pub use search::{SearchOutcome, SearchService, StoreHits};
pub use similarity::SimilarPair;
pub use sync::{NormalizeReport, RenameReport, StrictSyncPlan};
pub use transfer::{Direction, TransferOutcome};
