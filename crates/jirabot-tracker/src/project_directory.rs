//! Startup snapshot of the tracker's project keys.

use crate::{JiraApiClient, TrackerError};

/// Ordered, de-duplicated project keys captured once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDirectory {
    keys: Vec<String>,
}

impl ProjectDirectory {
    /// Builds a directory from keys in service order, dropping blanks and repeats.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into().trim().to_string();
            if key.is_empty() || ordered.contains(&key) {
                continue;
            }
            ordered.push(key);
        }
        Self { keys: ordered }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Fetches the project listing once. Any failure is fatal to startup.
pub async fn load_projects(client: &JiraApiClient) -> Result<ProjectDirectory, TrackerError> {
    let projects = client.list_projects().await?;
    let directory = ProjectDirectory::from_keys(projects.into_iter().map(|project| project.key));
    if directory.is_empty() {
        tracing::warn!("tracker returned no projects; no ticket references will match");
    } else {
        tracing::info!(projects = directory.len(), "loaded tracker projects");
    }
    Ok(directory)
}
