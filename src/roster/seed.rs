//! Seed providers for the initial roster
//!
//! The roster is populated once at startup, either from the built-in
//! Mergington High School dataset or from a TOML seed file.

use crate::error::Result;
use crate::types::Activity;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source of the activities a roster starts with
#[cfg_attr(test, mockall::automock)]
pub trait SeedProvider: Send + Sync {
    /// Load the seed activities, in listing order
    fn load(&self) -> Result<Vec<Activity>>;

    /// Human-readable description of where the seed comes from
    fn source(&self) -> String;
}

/// Built-in activity set
#[derive(Debug, Clone, Default)]
pub struct StaticSeedProvider;

impl StaticSeedProvider {
    pub fn new() -> Self {
        Self
    }

    /// The built-in Mergington High School activities
    pub fn activities() -> Vec<Activity> {
        vec![
            Activity::new(
                "Chess Club",
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
            )
            .with_participants(["michael@mergington.edu", "daniel@mergington.edu"]),
            Activity::new(
                "Programming Class",
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
            )
            .with_participants(["emma@mergington.edu", "sophia@mergington.edu"]),
            Activity::new(
                "Gym Class",
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
            )
            .with_participants(["john@mergington.edu", "olivia@mergington.edu"]),
            Activity::new(
                "Soccer Team",
                "Join the school soccer team and compete in matches",
                "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
                22,
            )
            .with_participants(["liam@mergington.edu", "noah@mergington.edu"]),
            Activity::new(
                "Basketball Club",
                "Practice basketball skills and play friendly games",
                "Wednesdays, 3:30 PM - 5:00 PM",
                15,
            )
            .with_participants(["ava@mergington.edu", "mia@mergington.edu"]),
            Activity::new(
                "Drama Club",
                "Act, direct, and produce school plays and performances",
                "Mondays, 4:00 PM - 5:30 PM",
                20,
            )
            .with_participants(["ella@mergington.edu", "scarlett@mergington.edu"]),
            Activity::new(
                "Art Workshop",
                "Explore painting, drawing, and sculpture techniques",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
            )
            .with_participants(["amelia@mergington.edu", "harper@mergington.edu"]),
            Activity::new(
                "Math Olympiad",
                "Prepare for math competitions and solve challenging problems",
                "Fridays, 2:00 PM - 3:30 PM",
                10,
            )
            .with_participants(["james@mergington.edu", "benjamin@mergington.edu"]),
            Activity::new(
                "Debate Team",
                "Develop public speaking and argumentation skills",
                "Wednesdays, 4:00 PM - 5:30 PM",
                12,
            )
            .with_participants(["charlotte@mergington.edu", "henry@mergington.edu"]),
        ]
    }
}

impl SeedProvider for StaticSeedProvider {
    fn load(&self) -> Result<Vec<Activity>> {
        Ok(Self::activities())
    }

    fn source(&self) -> String {
        "built-in".to_string()
    }
}

/// On-disk layout of a seed file
///
/// ```toml
/// [[activities]]
/// name = "Chess Club"
/// description = "Learn strategies and compete in chess tournaments"
/// schedule = "Fridays, 3:30 PM - 5:00 PM"
/// max_participants = 12
/// participants = ["michael@mergington.edu"]
/// ```
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    activities: Vec<Activity>,
}

/// Seed provider backed by a TOML file
#[derive(Debug, Clone)]
pub struct FileSeedProvider {
    path: PathBuf,
}

impl FileSeedProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse seed activities from TOML text
    pub fn parse(contents: &str) -> Result<Vec<Activity>> {
        let file: SeedFile = toml::from_str(contents).context("Invalid seed file format")?;
        Ok(file.activities)
    }
}

impl SeedProvider for FileSeedProvider {
    fn load(&self) -> Result<Vec<Activity>> {
        debug!("Reading seed file {}", self.path.display());
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read seed file {}", self.path.display()))?;

        let activities = Self::parse(&contents)?;
        validate_seed(&activities)
            .with_context(|| format!("Invalid seed file {}", self.path.display()))?;

        info!(
            "Loaded {} activities from {}",
            activities.len(),
            self.path.display()
        );
        Ok(activities)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// Validate a seed activity set
pub fn validate_seed(activities: &[Activity]) -> Result<()> {
    if activities.is_empty() {
        return Err(anyhow!("Seed must contain at least one activity"));
    }

    let mut names = HashSet::new();
    for activity in activities {
        if activity.name.is_empty() {
            return Err(anyhow!("Activity name cannot be empty"));
        }

        if !names.insert(activity.name.as_str()) {
            return Err(anyhow!("Duplicate activity name: {}", activity.name));
        }

        if activity.max_participants == 0 {
            return Err(anyhow!(
                "Activity '{}' must allow at least one participant",
                activity.name
            ));
        }

        let mut emails = HashSet::new();
        for email in &activity.participants {
            if !emails.insert(email.as_str()) {
                return Err(anyhow!(
                    "Activity '{}' lists participant {} more than once",
                    activity.name,
                    email
                ));
            }
        }
    }

    Ok(())
}
