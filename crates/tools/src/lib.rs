//! Slot-filling tools for Parley.
//!
//! Tools are the whole contract with the decision loop driving a
//! conversation: each call updates at most one field of the session record
//! and answers with a short acknowledgment that also says what to ask next.
//!
//! The generic tools ([`slot`], [`status`], [`summary`], [`finalize`],
//! [`history`]) are parameterized by schema; the domain modules wire them
//! into the named catalogue for each conversation type.

pub mod check_in;
pub mod finalize;
pub mod history;
pub mod lead;
pub mod order;
pub mod reply;
pub mod slot;
pub mod status;
pub mod summary;

use parley_core::domain::Domain;
use parley_core::error::SlotError;
use parley_core::log::{DEFAULT_WINDOW_DAYS, SessionLog};
use parley_core::tool::ToolRegistry;
use std::sync::Arc;

pub use finalize::FinalizeTool;
pub use history::HistoryTool;
pub use slot::{AddItemTool, FieldTarget, SetFieldTool};
pub use status::StatusTool;
pub use summary::SummaryTool;

/// Build the tool catalogue for one domain, persisting into `log`.
pub fn registry_for(domain: Domain, log: Arc<dyn SessionLog>) -> Result<ToolRegistry, SlotError> {
    registry_with_history(domain, log, DEFAULT_WINDOW_DAYS)
}

/// As [`registry_for`], with the default look-back for history tools.
pub fn registry_with_history(
    domain: Domain,
    log: Arc<dyn SessionLog>,
    history_days: i64,
) -> Result<ToolRegistry, SlotError> {
    let mut registry = ToolRegistry::new();
    match domain {
        Domain::Order => order::register(&mut registry, log)?,
        Domain::CheckIn => check_in::register(&mut registry, log, history_days)?,
        Domain::Lead => lead::register(&mut registry, log)?,
    }
    tracing::debug!(domain = %domain, tools = registry.len(), "Tool registry built");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_log::NoopLog;

    #[test]
    fn every_domain_builds() {
        for domain in Domain::ALL {
            let registry = registry_for(domain, Arc::new(NoopLog)).unwrap();
            assert!(!registry.is_empty(), "{domain} has no tools");
        }
    }

    #[test]
    fn every_tool_declares_an_object_schema() {
        for domain in Domain::ALL {
            let registry = registry_for(domain, Arc::new(NoopLog)).unwrap();
            for def in registry.definitions() {
                assert_eq!(def.parameters["type"], "object", "{}", def.name);
                assert!(!def.description.is_empty(), "{}", def.name);
            }
        }
    }

    #[test]
    fn each_domain_has_one_finalizer() {
        let finalizers = ["complete_order", "save_check_in", "save_lead"];
        for domain in Domain::ALL {
            let registry = registry_for(domain, Arc::new(NoopLog)).unwrap();
            let found = registry
                .names()
                .into_iter()
                .filter(|n| finalizers.contains(n))
                .count();
            assert_eq!(found, 1, "{domain}");
        }
    }
}
