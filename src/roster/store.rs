//! In-memory roster store
//!
//! The store owns every activity and its participant list for the lifetime
//! of the process. Each mutation runs its membership check and its write
//! under a single write-lock scope, so concurrent requests cannot
//! double-insert or remove the same participant twice.

use crate::error::{Result, RosterError, RosterResult};
use crate::metrics::MetricsCollector;
use crate::roster::seed::{validate_seed, SeedProvider};
use crate::types::{Activity, RosterSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Statistics about roster operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStats {
    /// Number of activities in the roster
    pub activities: usize,
    /// Current number of participants across all activities
    pub participants: usize,
    /// Activities holding more participants than seats
    pub over_capacity: usize,
    /// Successful signups since start
    pub signups: u64,
    /// Successful unregistrations since start
    pub unregistrations: u64,
    /// Signups and unregistrations rejected since start
    pub rejected: u64,
}

#[derive(Debug, Default)]
struct RosterInner {
    activities: Vec<Activity>,
    signups: u64,
    unregistrations: u64,
    rejected: u64,
}

impl RosterInner {
    fn find_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.name == name)
    }
}

/// The activity roster
#[derive(Clone)]
pub struct RosterStore {
    inner: Arc<RwLock<RosterInner>>,
    /// Reject signups once an activity reaches `max_participants`
    enforce_capacity: bool,
    metrics_collector: Option<Arc<MetricsCollector>>,
}

impl RosterStore {
    /// Create a store over an already-validated activity set
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RosterInner {
                activities,
                ..RosterInner::default()
            })),
            enforce_capacity: false,
            metrics_collector: None,
        }
    }

    /// Load, validate and wrap the activities of a seed provider
    pub fn from_provider(provider: &dyn SeedProvider) -> Result<Self> {
        let activities = provider.load()?;
        validate_seed(&activities)?;

        info!(
            "Roster seeded with {} activities from {}",
            activities.len(),
            provider.source()
        );
        Ok(Self::new(activities))
    }

    /// Enable or disable capacity enforcement on signup
    pub fn with_capacity_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_capacity = enforce;
        self
    }

    /// Attach a metrics collector and publish the initial participant counts
    pub fn with_metrics(mut self, metrics_collector: Arc<MetricsCollector>) -> Self {
        if let Ok(inner) = self.inner.read() {
            metrics_collector.record_roster_loaded(&inner.activities);
        }
        self.metrics_collector = Some(metrics_collector);
        self
    }

    pub fn enforces_capacity(&self) -> bool {
        self.enforce_capacity
    }

    /// Snapshot of every activity, in seed order
    pub fn list_activities(&self) -> RosterResult<RosterSnapshot> {
        let inner = self.read()?;
        debug!("Listing {} activities", inner.activities.len());
        Ok(RosterSnapshot::new(inner.activities.clone()))
    }

    /// Snapshot of a single activity
    pub fn get_activity(&self, activity_name: &str) -> RosterResult<Activity> {
        let inner = self.read()?;
        inner
            .activities
            .iter()
            .find(|a| a.name == activity_name)
            .cloned()
            .ok_or_else(|| RosterError::NotFound {
                activity: activity_name.to_string(),
            })
    }

    /// Add `email` to the end of an activity's participant list
    pub fn signup(&self, activity_name: &str, email: &str) -> RosterResult<String> {
        let start = Instant::now();

        let result = self.write().and_then(|mut inner| {
            let enforce_capacity = self.enforce_capacity;
            let outcome = match inner.find_mut(activity_name) {
                None => Err(RosterError::NotFound {
                    activity: activity_name.to_string(),
                }),
                Some(activity) if activity.has_participant(email) => {
                    Err(RosterError::AlreadyRegistered {
                        activity: activity_name.to_string(),
                        email: email.to_string(),
                    })
                }
                Some(activity) if enforce_capacity && activity.is_full() => {
                    Err(RosterError::Full {
                        activity: activity_name.to_string(),
                        capacity: activity.max_participants,
                    })
                }
                Some(activity) => {
                    activity.participants.push(email.to_string());
                    Ok(activity.participants.len())
                }
            };

            match outcome {
                Ok(count) => {
                    inner.signups += 1;
                    Ok(count)
                }
                Err(e) => {
                    inner.rejected += 1;
                    Err(e)
                }
            }
        });

        self.record("signup", activity_name, email, &result, start);
        result.map(|_| format!("Signed up {} for {}", email, activity_name))
    }

    /// Remove `email` from an activity's participant list
    pub fn unregister(&self, activity_name: &str, email: &str) -> RosterResult<String> {
        let start = Instant::now();

        let result = self.write().and_then(|mut inner| {
            let outcome = match inner.find_mut(activity_name) {
                None => Err(RosterError::NotFound {
                    activity: activity_name.to_string(),
                }),
                Some(activity) => match activity.participants.iter().position(|p| p == email) {
                    Some(index) => {
                        activity.participants.remove(index);
                        Ok(activity.participants.len())
                    }
                    None => Err(RosterError::NotRegistered {
                        activity: activity_name.to_string(),
                        email: email.to_string(),
                    }),
                },
            };

            match outcome {
                Ok(count) => {
                    inner.unregistrations += 1;
                    Ok(count)
                }
                Err(e) => {
                    inner.rejected += 1;
                    Err(e)
                }
            }
        });

        self.record("unregister", activity_name, email, &result, start);
        result.map(|_| format!("Unregistered {} from {}", email, activity_name))
    }

    /// Current roster statistics
    pub fn stats(&self) -> RosterResult<RosterStats> {
        let inner = self.read()?;
        Ok(RosterStats {
            activities: inner.activities.len(),
            participants: inner.activities.iter().map(|a| a.participants.len()).sum(),
            over_capacity: inner
                .activities
                .iter()
                .filter(|a| a.is_over_capacity())
                .count(),
            signups: inner.signups,
            unregistrations: inner.unregistrations,
            rejected: inner.rejected,
        })
    }

    fn read(&self) -> RosterResult<RwLockReadGuard<'_, RosterInner>> {
        self.inner.read().map_err(|_| RosterError::Internal {
            message: "Failed to acquire roster read lock".to_string(),
        })
    }

    fn write(&self) -> RosterResult<RwLockWriteGuard<'_, RosterInner>> {
        self.inner.write().map_err(|_| RosterError::Internal {
            message: "Failed to acquire roster write lock".to_string(),
        })
    }

    /// Log the outcome of a mutation and feed it to the metrics collector
    fn record(
        &self,
        operation: &str,
        activity_name: &str,
        email: &str,
        result: &RosterResult<usize>,
        start: Instant,
    ) {
        let duration = start.elapsed();

        match result {
            Ok(count) => info!(
                "{} succeeded - activity: '{}', email: '{}', participants: {}, time: {:.2}ms",
                operation,
                activity_name,
                email,
                count,
                duration.as_secs_f64() * 1000.0
            ),
            Err(e) if e.is_client_error() => warn!(
                "{} rejected - activity: '{}', email: '{}', reason: {}",
                operation,
                activity_name,
                email,
                e.kind()
            ),
            Err(e) => error!(
                "{} failed - activity: '{}', email: '{}': {}",
                operation, activity_name, email, e
            ),
        }

        if let Some(metrics) = &self.metrics_collector {
            let outcome = match result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics.record_operation(operation, outcome, duration);

            if let Ok(count) = result {
                metrics.set_participants(activity_name, *count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::seed::StaticSeedProvider;

    fn create_test_store() -> RosterStore {
        RosterStore::from_provider(&StaticSeedProvider::new()).unwrap()
    }

    fn participants(store: &RosterStore, activity: &str) -> Vec<String> {
        store.get_activity(activity).unwrap().participants
    }

    #[test]
    fn test_list_activities_returns_seed() {
        let store = create_test_store();
        let snapshot = store.list_activities().unwrap();

        assert_eq!(snapshot.len(), StaticSeedProvider::activities().len());
        assert_eq!(snapshot.names()[0], "Chess Club");
        assert!(snapshot.get("Soccer Team").is_some());
    }

    #[test]
    fn test_signup_appends_participant() {
        let store = create_test_store();
        let before = participants(&store, "Soccer Team");

        let message = store
            .signup("Soccer Team", "newstudent@mergington.edu")
            .unwrap();
        assert!(message.contains("Signed up"));
        assert!(message.contains("newstudent@mergington.edu"));

        let after = participants(&store, "Soccer Team");
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last().unwrap(), "newstudent@mergington.edu");
    }

    #[test]
    fn test_duplicate_signup_is_rejected() {
        let store = create_test_store();
        store
            .signup("Basketball Club", "duplicate@mergington.edu")
            .unwrap();

        let err = store
            .signup("Basketball Club", "duplicate@mergington.edu")
            .unwrap_err();
        assert!(matches!(err, RosterError::AlreadyRegistered { .. }));
        assert!(err.to_string().contains("already signed up"));

        let list = participants(&store, "Basketball Club");
        let occurrences = list
            .iter()
            .filter(|p| *p == "duplicate@mergington.edu")
            .count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn test_unknown_activity_is_not_found() {
        let store = create_test_store();

        let err = store
            .signup("Nonexistent Club", "test@mergington.edu")
            .unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));

        let err = store
            .unregister("Nonexistent Club", "test@mergington.edu")
            .unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));

        // Activity names are case-sensitive
        let err = store
            .signup("chess club", "test@mergington.edu")
            .unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));
    }

    #[test]
    fn test_unregister_removes_participant() {
        let store = create_test_store();
        let before = participants(&store, "Programming Class");

        let message = store
            .unregister("Programming Class", "emma@mergington.edu")
            .unwrap();
        assert!(message.contains("Unregistered"));
        assert!(message.contains("emma@mergington.edu"));

        let after = participants(&store, "Programming Class");
        assert_eq!(after.len(), before.len() - 1);
        assert!(!after.contains(&"emma@mergington.edu".to_string()));
    }

    #[test]
    fn test_unregister_absent_participant_is_rejected() {
        let store = create_test_store();

        let err = store
            .unregister("Math Olympiad", "notregistered@mergington.edu")
            .unwrap_err();
        assert!(matches!(err, RosterError::NotRegistered { .. }));
        assert!(err.to_string().contains("not signed up"));
    }

    #[test]
    fn test_signup_then_unregister_restores_roster() {
        let store = create_test_store();
        let before = participants(&store, "Art Workshop");

        store
            .signup("Art Workshop", "unregistertest@mergington.edu")
            .unwrap();
        store
            .unregister("Art Workshop", "unregistertest@mergington.edu")
            .unwrap();

        assert_eq!(participants(&store, "Art Workshop"), before);
    }

    #[test]
    fn test_capacity_is_advisory_by_default() {
        let store = RosterStore::new(vec![Activity::new("Tiny Club", "d", "s", 1)
            .with_participants(["first@mergington.edu"])]);

        assert!(!store.enforces_capacity());
        assert!(store.signup("Tiny Club", "second@mergington.edu").is_ok());
        assert_eq!(participants(&store, "Tiny Club").len(), 2);
    }

    #[test]
    fn test_capacity_enforcement() {
        let store = RosterStore::new(vec![Activity::new("Tiny Club", "d", "s", 1)
            .with_participants(["first@mergington.edu"])])
        .with_capacity_enforcement(true);

        let err = store
            .signup("Tiny Club", "second@mergington.edu")
            .unwrap_err();
        assert_eq!(
            err,
            RosterError::Full {
                activity: "Tiny Club".to_string(),
                capacity: 1,
            }
        );

        // Duplicate check wins over the capacity check
        let err = store
            .signup("Tiny Club", "first@mergington.edu")
            .unwrap_err();
        assert!(matches!(err, RosterError::AlreadyRegistered { .. }));

        store
            .unregister("Tiny Club", "first@mergington.edu")
            .unwrap();
        assert!(store.signup("Tiny Club", "second@mergington.edu").is_ok());
    }

    #[test]
    fn test_stats_track_operations() {
        let store = create_test_store();
        let initial = store.stats().unwrap();
        assert_eq!(initial.signups, 0);
        assert_eq!(initial.participants, 18);

        store.signup("Drama Club", "messagetest@mergington.edu").unwrap();
        store.unregister("Chess Club", "michael@mergington.edu").unwrap();
        let _ = store.signup("Drama Club", "messagetest@mergington.edu");
        let _ = store.unregister("Nonexistent Club", "x@mergington.edu");

        let stats = store.stats().unwrap();
        assert_eq!(stats.activities, initial.activities);
        assert_eq!(stats.participants, 18);
        assert_eq!(stats.signups, 1);
        assert_eq!(stats.unregistrations, 1);
        assert_eq!(stats.rejected, 2);
    }

    #[test]
    fn test_metrics_are_recorded() {
        let collector = Arc::new(MetricsCollector::new().unwrap());
        let store = create_test_store().with_metrics(collector.clone());

        store
            .signup("Gym Class", "newstudent@mergington.edu")
            .unwrap();
        let _ = store.signup("Gym Class", "newstudent@mergington.edu");

        assert_eq!(collector.operation_count("signup", "success"), 1);
        assert_eq!(collector.operation_count("signup", "already_registered"), 1);
        assert_eq!(collector.participants("Gym Class"), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let store = create_test_store();
        let clone = store.clone();

        clone
            .signup("Chess Club", "shared@mergington.edu")
            .unwrap();
        assert!(store
            .get_activity("Chess Club")
            .unwrap()
            .has_participant("shared@mergington.edu"));
    }
}
