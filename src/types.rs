//! Common types used throughout the activity roster service

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Unique name of an activity, used as the roster key
pub type ActivityName = String;

/// Participant email, treated as an opaque string
pub type Email = String;

/// An extracurricular activity and its participant list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: ActivityName,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Signed-up emails in signup order
    #[serde(default)]
    pub participants: Vec<Email>,
}

impl Activity {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schedule: impl Into<String>,
        max_participants: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: Vec::new(),
        }
    }

    /// Builder-style helper for seeding participants
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    /// Exact, case-sensitive membership check
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }

    /// More participants than seats, possible while capacity is advisory
    pub fn is_over_capacity(&self) -> bool {
        self.participants.len() > self.max_participants as usize
    }
}

/// Wire shape of one activity in the `GET /activities` response
#[derive(Debug, Serialize)]
struct ActivityBody<'a> {
    description: &'a str,
    schedule: &'a str,
    max_participants: u32,
    participants: &'a [Email],
}

impl<'a> From<&'a Activity> for ActivityBody<'a> {
    fn from(activity: &'a Activity) -> Self {
        Self {
            description: &activity.description,
            schedule: &activity.schedule,
            max_participants: activity.max_participants,
            participants: &activity.participants,
        }
    }
}

/// Point-in-time copy of the roster, in seed order
///
/// Serializes as a JSON object keyed by activity name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSnapshot {
    activities: Vec<Activity>,
}

impl RosterSnapshot {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.activities.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

}

impl Serialize for RosterSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.activities.len()))?;
        for activity in &self.activities {
            map.serialize_entry(&activity.name, &ActivityBody::from(activity))?;
        }
        map.end()
    }
}
