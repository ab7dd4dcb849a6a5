use std::fmt::Write as _;

use crate::buildkite::{Build, BuildkiteClient, Job};
use crate::error::Result;

use super::styling::{bright_blue, bright_green, bright_red, bright_yellow, cyan, green, red};

/// Which parts of the report get printed.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Print per-job lines under each build
    pub show_jobs: bool,
    /// Only print jobs still waiting to be scheduled
    pub scheduled_only: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_jobs: true,
            scheduled_only: false,
        }
    }
}

/// Display classification for a build state string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildIndicator {
    Running,
    Stalled,
    Scheduled,
    Other,
}

impl BuildIndicator {
    /// Map an API state string plus the agent count to a display class.
    ///
    /// A `running` build with zero agents available is reported as stalled.
    /// The override applies only here, never to job-level states.
    pub fn classify(state: &str, agents_available: usize) -> Self {
        match state {
            "running" if agents_available == 0 => Self::Stalled,
            "running" => Self::Running,
            "scheduled" => Self::Scheduled,
            _ => Self::Other,
        }
    }

    fn render(self, state: &str) -> String {
        match self {
            Self::Running => bright_yellow(state).to_string(),
            Self::Stalled => bright_red("-stalled- no agents available").to_string(),
            Self::Scheduled => bright_blue(state).to_string(),
            Self::Other => red(state).to_string(),
        }
    }
}

/// Display classification for a job state string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobIndicator {
    Running,
    Scheduled,
    Passed,
    Other,
}

impl JobIndicator {
    pub fn classify(state: &str) -> Self {
        match state {
            "running" => Self::Running,
            "scheduled" => Self::Scheduled,
            "passed" => Self::Passed,
            _ => Self::Other,
        }
    }

    fn render(self, state: &str) -> String {
        match self {
            Self::Running => bright_yellow(state).to_string(),
            Self::Scheduled => bright_blue(state).to_string(),
            Self::Passed => bright_green(state).to_string(),
            Self::Other => red(state).to_string(),
        }
    }
}

/// Fetch active builds and the agent count, then print the report.
///
/// Exactly two sequential API calls: builds first, then agents. The agent
/// call is skipped entirely when no builds are pending. Any fetch error
/// aborts the report.
pub async fn report_builds(client: &BuildkiteClient, options: ReportOptions) -> Result<()> {
    let builds = client.list_active_builds().await?;
    if builds.is_empty() {
        print!("{}", render_report(&builds, 0, options));
        return Ok(());
    }

    let agents_available = client.available_agents().await?;
    print!("{}", render_report(&builds, agents_available, options));

    Ok(())
}

/// Render the full report as a string, one line per build plus optional
/// job lines. Kept separate from printing so it can be tested directly.
pub fn render_report(builds: &[Build], agents_available: usize, options: ReportOptions) -> String {
    if builds.is_empty() {
        return format!("{}\n", bright_green("There aren't any pending builds"));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Listing {} builds for {} agents",
        bright_yellow(builds.len()),
        bright_yellow(agents_available)
    );

    for build in builds {
        out.push_str(&render_build_line(build, agents_available));
        if options.show_jobs {
            for job in &build.jobs {
                if options.scheduled_only && job.state != "scheduled" {
                    continue;
                }
                out.push_str(&render_job_line(job));
            }
        }
    }

    out
}

fn render_build_line(build: &Build, agents_available: usize) -> String {
    let number = bright_yellow(format!("#{}", build.number));
    let pipeline = bright_green(&build.pipeline.name);
    let branch = green(&build.branch);
    let creator = cyan(build.creator.as_ref().map_or("unknown", |c| c.name.as_str()));
    let state = BuildIndicator::classify(&build.state, agents_available).render(&build.state);

    format!("Build {number} in {pipeline}({branch}) by {creator} -> {state}\n")
}

fn render_job_line(job: &Job) -> String {
    let name = green(job.name.as_deref().unwrap_or("(unnamed)"));
    let state = JobIndicator::classify(&job.state).render(&job.state);

    format!("  Job: {name} -> {state}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildkite::types::{Creator, Pipeline};

    fn build(number: u64, state: &str, jobs: Vec<Job>) -> Build {
        Build {
            number,
            state: state.to_string(),
            branch: "main".to_string(),
            pipeline: Pipeline {
                name: "api".to_string(),
            },
            creator: Some(Creator {
                name: "Ann".to_string(),
            }),
            jobs,
        }
    }

    fn job(name: &str, state: &str) -> Job {
        Job {
            name: Some(name.to_string()),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_running_build_with_no_agents_is_stalled() {
        assert_eq!(BuildIndicator::classify("running", 0), BuildIndicator::Stalled);
        assert_eq!(BuildIndicator::classify("running", 3), BuildIndicator::Running);
    }

    #[test]
    fn test_states_outside_running_and_scheduled_are_generic() {
        assert_eq!(BuildIndicator::classify("canceling", 5), BuildIndicator::Other);
        assert_eq!(BuildIndicator::classify("failed", 0), BuildIndicator::Other);
        assert_eq!(BuildIndicator::classify("scheduled", 0), BuildIndicator::Scheduled);
    }

    #[test]
    fn test_job_classification_has_no_stalled_override() {
        // The agents-available override is build-level only.
        assert_eq!(JobIndicator::classify("running"), JobIndicator::Running);
        assert_eq!(JobIndicator::classify("passed"), JobIndicator::Passed);
        assert_eq!(JobIndicator::classify("broken"), JobIndicator::Other);
    }

    #[test]
    fn test_empty_build_list_prints_one_success_line() {
        let report = render_report(&[], 0, ReportOptions::default());
        assert_eq!(report.lines().count(), 1);
        assert!(report.contains("There aren't any pending builds"));
    }

    #[test]
    fn test_stalled_build_line() {
        let builds = vec![build(42, "running", vec![])];
        let report = render_report(&builds, 0, ReportOptions::default());

        assert!(report.contains("#42"));
        assert!(report.contains("api"));
        assert!(report.contains("main"));
        assert!(report.contains("Ann"));
        assert!(report.contains("-stalled- no agents available"));
        assert!(!report.contains("running"));
    }

    #[test]
    fn test_running_job_is_never_stalled() {
        let builds = vec![build(1, "scheduled", vec![job("deploy", "running")])];
        let report = render_report(&builds, 0, ReportOptions::default());

        // Build-level override only: the job keeps its plain running state.
        let job_line = report.lines().find(|l| l.contains("Job:")).unwrap();
        assert!(job_line.contains("running"));
        assert!(!job_line.contains("stalled"));
    }

    #[test]
    fn test_scheduled_only_suppresses_other_job_states() {
        let builds = vec![build(
            5,
            "running",
            vec![
                job("lint", "passed"),
                job("test", "running"),
                job("deploy", "scheduled"),
            ],
        )];
        let options = ReportOptions {
            show_jobs: true,
            scheduled_only: true,
        };
        let report = render_report(&builds, 2, options);

        let job_lines: Vec<&str> = report.lines().filter(|l| l.contains("Job:")).collect();
        assert_eq!(job_lines.len(), 1);
        assert!(job_lines[0].contains("deploy"));
    }

    #[test]
    fn test_no_jobs_mode_prints_no_job_lines() {
        let builds = vec![build(5, "running", vec![job("lint", "passed")])];
        let options = ReportOptions {
            show_jobs: false,
            scheduled_only: false,
        };
        let report = render_report(&builds, 2, options);

        assert!(!report.contains("Job:"));
        assert!(report.contains("#5"));
    }

    #[test]
    fn test_summary_line_counts() {
        let builds = vec![
            build(1, "running", vec![]),
            build(2, "scheduled", vec![]),
        ];
        let report = render_report(&builds, 4, ReportOptions::default());

        let summary = report.lines().next().unwrap();
        assert!(summary.contains("Listing"));
        assert!(summary.contains('2'));
        assert!(summary.contains('4'));
    }

    #[test]
    fn test_builds_keep_server_order() {
        let builds = vec![
            build(9, "scheduled", vec![]),
            build(3, "running", vec![]),
        ];
        let report = render_report(&builds, 1, ReportOptions::default());

        let first = report.find("#9").unwrap();
        let second = report.find("#3").unwrap();
        assert!(first < second);
    }

    fn client_for(server: &mockito::ServerGuard) -> BuildkiteClient {
        BuildkiteClient::new(&server.url(), "acme".to_string(), "bkua_test").unwrap()
    }

    fn builds_mock(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/v2/organizations/acme/builds".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    #[tokio::test]
    async fn test_no_pending_builds_skips_the_agent_call() {
        let mut server = mockito::Server::new_async().await;
        let builds = builds_mock(&mut server, "[]").create_async().await;
        let agents = server
            .mock("GET", "/v2/organizations/acme/agents")
            .expect(0)
            .create_async()
            .await;

        report_builds(&client_for(&server), ReportOptions::default())
            .await
            .unwrap();

        builds.assert_async().await;
        agents.assert_async().await;
    }

    #[tokio::test]
    async fn test_pending_builds_fetch_agents_exactly_once() {
        let mut server = mockito::Server::new_async().await;
        let builds = builds_mock(
            &mut server,
            r#"[{
                "number": 42,
                "state": "running",
                "branch": "main",
                "pipeline": {"name": "api"},
                "creator": {"name": "Ann"},
                "jobs": []
            }]"#,
        )
        .expect(1)
        .create_async()
        .await;
        let agents = server
            .mock("GET", "/v2/organizations/acme/agents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "agent-1", "name": "builder-1"}]"#)
            .expect(1)
            .create_async()
            .await;

        report_builds(&client_for(&server), ReportOptions::default())
            .await
            .unwrap();

        builds.assert_async().await;
        agents.assert_async().await;
    }

    #[test]
    fn test_missing_creator_and_job_name_render_placeholders() {
        let mut b = build(8, "scheduled", vec![]);
        b.creator = None;
        b.jobs = vec![Job {
            name: None,
            state: "scheduled".to_string(),
        }];

        let report = render_report(&[b], 1, ReportOptions::default());
        assert!(report.contains("unknown"));
        assert!(report.contains("(unnamed)"));
    }
}
