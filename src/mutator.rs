// ✏️ Registry Mutator - the only writer of the club registry
//
// create / update / delete, each behind:
//   1. the registry's single in-flight slot (a second caller gets `Busy`,
//      never a queue, whichever mutator it came through)
//   2. validation (before any waiting), then trimming of the text fields
//   3. a configurable latency standing in for the save round-trip
//   4. one atomic swap of the registry contents

use crate::entities::{Club, ClubFields, ClubRegistry};
use crate::error::MutationError;
use crate::validation::validate_club_fields;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

// ============================================================================
// LATENCY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationLatency {
    /// Applied to create and update
    pub write: Duration,
    pub delete: Duration,
}

impl MutationLatency {
    pub fn none() -> Self {
        MutationLatency {
            write: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }
}

impl Default for MutationLatency {
    fn default() -> Self {
        MutationLatency {
            write: Duration::from_millis(1500),
            delete: Duration::from_millis(1000),
        }
    }
}

// ============================================================================
// IN-FLIGHT SLOT
// ============================================================================

/// Held for the whole duration of one mutation, released on drop
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// MUTATOR
// ============================================================================

#[derive(Clone)]
pub struct RegistryMutator {
    registry: ClubRegistry,
    latency: MutationLatency,
}

impl RegistryMutator {
    pub fn new(registry: ClubRegistry, latency: MutationLatency) -> Self {
        RegistryMutator { registry, latency }
    }

    pub fn registry(&self) -> &ClubRegistry {
        &self.registry
    }

    /// True while a mutation is running; UIs disable their submit control on it
    pub fn is_busy(&self) -> bool {
        self.registry.is_mutating()
    }

    fn begin(&self) -> Result<InFlight<'_>, MutationError> {
        let slot = self.registry.mutation_slot();
        slot.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                warn!("mutation rejected: another one is in flight");
                MutationError::Busy
            })?;
        Ok(InFlight(slot))
    }

    async fn settle(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Add a new club with a fresh id and no past events
    pub async fn create(&self, fields: ClubFields) -> Result<Club, MutationError> {
        let _slot = self.begin()?;
        validate_club_fields(&fields)?;
        let fields = fields.normalized();

        debug!(name = %fields.name, college = %fields.college, "creating club");
        self.settle(self.latency.write).await;

        // insert refuses a taken id, so draw again on a uuid collision
        let club = loop {
            let candidate = Club::new(fields.clone());
            if self.registry.insert(candidate.clone()) {
                break candidate;
            }
        };

        info!(club_id = %club.id, college = %club.college, name = %club.name, "club created");
        Ok(club)
    }

    /// Replace every editable field of an existing club.
    ///
    /// The id and past events are carried over unchanged. An unknown id is
    /// reported as [`MutationError::NotFound`] and leaves the registry as it was.
    pub async fn update(&self, id: &str, fields: ClubFields) -> Result<Club, MutationError> {
        let _slot = self.begin()?;
        validate_club_fields(&fields)?;
        let fields = fields.normalized();

        debug!(club_id = %id, "updating club");
        self.settle(self.latency.write).await;

        match self.registry.replace(id, fields) {
            Some(club) => {
                info!(
                    club_id = %club.id,
                    college = %club.college,
                    name = %club.name,
                    "club updated"
                );
                Ok(club)
            }
            None => {
                warn!(club_id = %id, "update of unknown club");
                Err(MutationError::NotFound(id.to_string()))
            }
        }
    }

    /// Remove a club; `Ok(None)` when there was nothing to remove
    pub async fn delete(&self, id: &str) -> Result<Option<Club>, MutationError> {
        let _slot = self.begin()?;

        debug!(club_id = %id, "deleting club");
        self.settle(self.latency.delete).await;

        let removed = self.registry.remove(id);
        match &removed {
            Some(club) => info!(club_id = %club.id, name = %club.name, "club deleted"),
            None => debug!(club_id = %id, "delete of unknown club ignored"),
        }
        Ok(removed)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::College;

    fn fields(name: &str) -> ClubFields {
        ClubFields {
            college: College::Ggce,
            name: name.to_string(),
            description: "Debates every Friday".to_string(),
            registration_link: "https://forms.gle/debate".to_string(),
            founding_year: 2016,
            member_count: 45,
        }
    }

    fn mutator() -> RegistryMutator {
        RegistryMutator::new(ClubRegistry::new(), MutationLatency::none())
    }

    #[tokio::test]
    async fn test_create_adds_exactly_one() {
        let mutator = mutator();
        let before = mutator.registry().count();

        let club = mutator.create(fields("Debate Society")).await.unwrap();

        assert_eq!(mutator.registry().count(), before + 1);
        let stored = mutator.registry().find_by_id(&club.id).unwrap();
        assert_eq!(stored, club);
        assert!(stored.past_events.is_empty());
        assert_eq!(mutator.registry().list().last().unwrap().id, club.id);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let mutator = mutator();
        let mut bad = fields("Debate Society");
        bad.registration_link = "not-a-link".to_string();

        let err = mutator.create(bad).await.unwrap_err();
        assert!(matches!(err, MutationError::Invalid(ref e) if e.has_field("registration_link")));
        assert_eq!(mutator.registry().count(), 6);
        assert!(!mutator.is_busy());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_events() {
        let mutator = mutator();
        let original = mutator.registry().find_by_id("1").unwrap();

        let updated = mutator.update("1", fields("Machine Minds")).await.unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.past_events, original.past_events);
        assert_eq!(updated.name, "Machine Minds");
        assert_eq!(updated.college, College::Ggce);
        assert_eq!(updated.member_count, 45);
        assert_eq!(mutator.registry().find_by_id("1").unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_registry_unchanged() {
        let mutator = mutator();
        let before = mutator.registry().list();

        let err = mutator.update("nope", fields("Ghost Club")).await.unwrap_err();

        assert!(matches!(err, MutationError::NotFound(ref id) if id == "nope"));
        assert_eq!(mutator.registry().list(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_club() {
        let mutator = mutator();

        let removed = mutator.delete("3").await.unwrap();
        assert_eq!(removed.unwrap().name, "Web Development Club");
        assert!(mutator.registry().find_by_id("3").is_none());
        assert_eq!(mutator.registry().count(), 5);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let mutator = mutator();
        let before = mutator.registry().list();

        assert!(mutator.delete("missing").await.unwrap().is_none());
        assert_eq!(mutator.registry().list(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_mutation_while_in_flight_is_busy() {
        let registry = ClubRegistry::new();
        let mutator = RegistryMutator::new(registry.clone(), MutationLatency::default());

        let first = {
            let mutator = mutator.clone();
            tokio::spawn(async move { mutator.create(fields("Slow Club")).await })
        };
        tokio::task::yield_now().await;

        assert!(mutator.is_busy());
        // Nothing is visible before the latency elapses
        assert_eq!(registry.count(), 6);

        let second = mutator.delete("1").await;
        assert!(matches!(second, Err(MutationError::Busy)));

        let created = first.await.unwrap().unwrap();
        assert!(!mutator.is_busy());
        assert!(registry.contains(&created.id));
        // The rejected delete never ran
        assert!(registry.contains("1"));

        // Slot is free again
        assert!(mutator.delete("1").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let mutator = RegistryMutator::new(ClubRegistry::new(), MutationLatency::default());
        let started = tokio::time::Instant::now();

        mutator.create(fields("Timed Club")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));

        let started = tokio::time::Instant::now();
        mutator.delete("2").await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_mutation_releases_slot() {
        let mutator = RegistryMutator::new(ClubRegistry::new(), MutationLatency::default());

        let pending = {
            let mutator = mutator.clone();
            tokio::spawn(async move { mutator.delete("1").await })
        };
        tokio::task::yield_now().await;
        assert!(mutator.is_busy());

        pending.abort();
        let _ = pending.await;

        assert!(!mutator.is_busy());
        assert!(mutator.registry().contains("1"));
    }

    #[tokio::test]
    async fn test_text_fields_are_stored_trimmed() {
        let mutator = mutator();
        let mut padded = fields("  Chess  ");
        padded.description = "\tOpenings and endgames ".to_string();
        padded.registration_link = "  https://forms.gle/x \n".to_string();

        let club = mutator.create(padded.clone()).await.unwrap();
        assert_eq!(club.name, "Chess");
        assert_eq!(club.description, "Openings and endgames");
        assert_eq!(club.registration_link, "https://forms.gle/x");
        assert_eq!(mutator.registry().find_by_id(&club.id).unwrap(), club);

        padded.name = " Chess Society\n".to_string();
        let updated = mutator.update(&club.id, padded).await.unwrap();
        assert_eq!(updated.name, "Chess Society");
        assert_eq!(updated.registration_link, "https://forms.gle/x");
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_mutators_share_the_registry_slot() {
        let registry = ClubRegistry::new();
        let first = RegistryMutator::new(registry.clone(), MutationLatency::default());
        let second = RegistryMutator::new(registry.clone(), MutationLatency::default());

        let pending = {
            let first = first.clone();
            tokio::spawn(async move { first.delete("1").await })
        };
        tokio::task::yield_now().await;

        assert!(second.is_busy());
        assert!(registry.is_mutating());
        assert!(matches!(second.delete("2").await, Err(MutationError::Busy)));
        assert!(registry.contains("2"));

        assert!(pending.await.unwrap().unwrap().is_some());
        assert!(!registry.is_mutating());
        assert!(second.delete("2").await.unwrap().is_some());
    }
}
