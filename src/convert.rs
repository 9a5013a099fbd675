//! Bidirectional conversion between the custom and traditional status systems.
//!
//! The mapping is pure, total, and deterministic, but deliberately lossy:
//! priorities 1 and 2 collapse to the same custom bucket, and any lifecycle
//! stage other than done collapses to the bucket implied by the priority
//! alone. Callers must not assume round-trip fidelity beyond the priority
//! bucket. Existing call sites depend on this exact collapse, so it is
//! preserved as-is.

use crate::status::{CustomStatus, PriorityLevel, TraditionalStatus};

/// Priority assumed when a caller supplies none (and the value the terminal
/// done bucket maps back to).
pub const DEFAULT_PRIORITY: PriorityLevel = PriorityLevel::Medium;

/// Custom status assigned when a caller supplies no status axis at all.
pub const DEFAULT_CUSTOM_STATUS: CustomStatus = CustomStatus::Priority3;

/// Map a custom status to its traditional (status, priority) pair.
pub fn custom_to_traditional(custom: CustomStatus) -> (TraditionalStatus, PriorityLevel) {
    match custom {
        CustomStatus::Urgent => (TraditionalStatus::Todo, PriorityLevel::Urgent),
        CustomStatus::Priority2 => (TraditionalStatus::Todo, PriorityLevel::High),
        CustomStatus::Priority3 => (TraditionalStatus::Todo, DEFAULT_PRIORITY),
        CustomStatus::Done => (TraditionalStatus::Done, DEFAULT_PRIORITY),
    }
}

/// Map a traditional (status, priority) pair to a custom status.
///
/// Done wins regardless of priority. Otherwise only the priority matters:
/// the lifecycle stage is not recoverable from the custom bucket.
pub fn traditional_to_custom(status: TraditionalStatus, priority: PriorityLevel) -> CustomStatus {
    if status == TraditionalStatus::Done {
        return CustomStatus::Done;
    }
    match priority {
        PriorityLevel::Urgent => CustomStatus::Urgent,
        PriorityLevel::High => CustomStatus::Priority2,
        PriorityLevel::Medium | PriorityLevel::Low => CustomStatus::Priority3,
    }
}
