//! Paged memory unit tests.

/// Lazy page allocation, zero reads, and block transfers.
pub mod paging;
/// The four-level translation walk and the page budget.
pub mod translation;
