/// Account record and the per-account rules: daily counters, balance bounds.
/// State is modified by applying events produced from validated requests.
pub mod account;

/// Account operations: creation, balance query, deposit, withdrawal and transfer.
/// Deposits and withdrawals can be staged without touching the store, which is
/// how a transfer commits both legs or neither.
pub mod bank;

/// Source of the current date.
pub mod clock;

/// Command parsing for the batch service.
pub mod command;

/// Amount, daily count and balance limits.
pub mod config;

/// Account store interface, plus "in memory" implementation.
pub mod store;

/// Bootstraps the core logic as a CSV driven service. It lives here rather
/// than in the binary so the integration tests can use it.
pub mod bin_utils;
