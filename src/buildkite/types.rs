use serde::Deserialize;

/// Buildkite build, as returned by the REST API builds listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Build {
    /// Build number, unique within its pipeline
    pub number: u64,
    /// Current state of the build
    pub state: String,
    /// Branch the build was triggered for
    #[serde(default)]
    pub branch: String,
    /// Pipeline the build belongs to
    pub pipeline: Pipeline,
    /// Who triggered the build; absent for webhook-triggered builds
    pub creator: Option<Creator>,
    /// Jobs in this build, in server order
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Job within a build.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Display name; script jobs may have none
    pub name: Option<String>,
    /// Current state of the job
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creator {
    pub name: String,
}

/// Buildkite agent. Only enough fields to count availability.
#[derive(Debug, Clone, Deserialize)]
pub struct Agent {
    #[allow(dead_code)]
    pub id: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub name: String,
}
