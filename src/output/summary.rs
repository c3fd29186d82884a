use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use comfy_table::Cell;

use super::styling::{blue, bright, bright_yellow, cyan, dim};
use super::tables::{create_table, cyan_header, state_cell, status_percent_cell};
use crate::config::Config;
use crate::summary::{HostSummary, SummaryRecord, PENDING_STATUS};

/// Statuses shown for every record, in column order.
const DISPLAY_STATUSES: [&str; 6] = [
    "aborted",
    "errored",
    "failed",
    "succeeded",
    "started",
    PENDING_STATUS,
];

/// Prints the configured hosts and groups.
pub fn print_index(config: &Config) {
    println!("{}", render_index(config));
}

/// Prints one host's records as a table.
///
/// In watch mode `refresh_interval` is shown next to the timestamp.
pub fn print_host_summary(summary: &HostSummary, refresh_interval: Option<u64>) {
    let mut output = render_header(summary.collected_at, refresh_interval);
    output.push_str(&render_host(summary));
    println!("{output}");
}

/// Prints each host of a group under its own heading.
pub fn print_group_summary(group: &str, summaries: &[HostSummary], refresh_interval: Option<u64>) {
    let collected_at = summaries
        .iter()
        .map(|s| s.collected_at)
        .max()
        .unwrap_or_else(Utc::now);

    let mut output = render_header(collected_at, refresh_interval);
    output.push_str(&render_group(group, summaries));
    println!("{output}");
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn render_header(collected_at: DateTime<Utc>, refresh_interval: Option<u64>) -> String {
    let stamp = collected_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %z");

    match refresh_interval {
        Some(secs) => format!("{} {}\n\n", dim(stamp), dim(format!("(refresh: {secs}s)"))),
        None => format!("{}\n\n", dim(stamp)),
    }
}

fn render_index(config: &Config) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "🖥️", "Hosts");
    if config.hosts.is_empty() {
        let _ = writeln!(output, "  {}", dim("No hosts configured"));
    }
    for host in &config.hosts {
        let _ = writeln!(output, "  {}", cyan(host));
    }

    if !config.groups.is_empty() {
        output.push('\n');
        add_section_header(&mut output, "🗂️", "Groups");
        for group in &config.groups {
            let _ = writeln!(
                output,
                "  {} {}",
                cyan(&group.group),
                dim(format!("({} hosts)", group.hosts.len()))
            );
        }
    }

    let _ = write!(
        output,
        "\n{}",
        dim("Use `host <HOST>` or `group <GROUP>` to show a summary")
    );

    output
}

fn render_group(group: &str, summaries: &[HostSummary]) -> String {
    let mut output = String::new();

    if summaries.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow(format!("No hosts in group {group}")));
        return output;
    }

    for summary in summaries {
        output.push_str(&render_host(summary));
        output.push('\n');
    }

    output
}

fn render_host(summary: &HostSummary) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🚦", &summary.host);

    if summary.records.is_empty() {
        let _ = writeln!(output, "  {}", bright_yellow("No pipelines found."));
        return output;
    }

    let running = summary.records.iter().filter(|r| r.running).count();
    let paused = summary.records.iter().filter(|r| r.paused).count();
    let _ = writeln!(
        output,
        "  {} {}  {} {}",
        cyan(running),
        dim("running"),
        blue(paused),
        dim("paused")
    );

    let _ = writeln!(output, "{}", render_records_table(&summary.records));
    output
}

fn render_records_table(records: &[SummaryRecord]) -> comfy_table::Table {
    let mut labels = vec!["Pipeline", "Group", "State"];
    labels.extend(DISPLAY_STATUSES);
    labels.push("URL");

    let mut table = create_table();
    table.set_header(cyan_header(&labels));

    for record in records {
        let mut row = vec![
            Cell::new(&record.pipeline),
            Cell::new(&record.group),
            state_cell(record),
        ];
        row.extend(
            DISPLAY_STATUSES
                .iter()
                .map(|status| status_percent_cell(record, status)),
        );
        row.push(Cell::new(&record.url));
        table.add_row(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::{GroupHost, SummaryGroup};

    fn create_test_record(pipeline: &str, group: &str, statuses: &[(&str, usize)]) -> SummaryRecord {
        SummaryRecord {
            pipeline: pipeline.to_string(),
            group: group.to_string(),
            url: format!("https://ci.example.com/teams/main/pipelines/{pipeline}"),
            running: true,
            paused: false,
            statuses: statuses
                .iter()
                .map(|(s, c)| ((*s).to_string(), *c))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn create_test_summary(host: &str, records: Vec<SummaryRecord>) -> HostSummary {
        HostSummary {
            host: host.to_string(),
            collected_at: Utc::now(),
            records,
        }
    }

    #[test]
    fn test_render_host_with_records() {
        let summary = create_test_summary(
            "ci.example.com",
            vec![create_test_record(
                "demo",
                "",
                &[("succeeded", 1), ("failed", 1), ("pending", 1)],
            )],
        );

        let output = render_host(&summary);

        assert!(output.contains("ci.example.com"));
        assert!(output.contains("demo"));
        assert!(output.contains("running"));
        assert!(output.contains("paused"));
        assert!(output.contains("33%"));
        assert!(output.contains("https://ci.example.com/teams/main/pipelines/demo"));
    }

    #[test]
    fn test_render_host_without_records() {
        let output = render_host(&create_test_summary("ci.example.com", vec![]));
        assert!(output.contains("No pipelines found."));
    }

    #[test]
    fn test_render_group_lists_each_host() {
        let summaries = vec![
            create_test_summary("one", vec![create_test_record("build", "", &[("succeeded", 2)])]),
            create_test_summary("two", vec![]),
        ];

        let output = render_group("platform", &summaries);

        assert!(output.contains("one"));
        assert!(output.contains("build"));
        assert!(output.contains("100%"));
        assert!(output.contains("two"));
    }

    #[test]
    fn test_render_empty_group() {
        let output = render_group("platform", &[]);
        assert!(output.contains("No hosts in group platform"));
    }

    #[test]
    fn test_render_index() {
        let config = Config {
            hosts: vec!["test1".to_string(), "test2".to_string()],
            groups: vec![SummaryGroup {
                group: "testGroup1".to_string(),
                hosts: vec![GroupHost {
                    fqdn: "test1".to_string(),
                    pipelines: vec![],
                }],
            }],
            ..Config::default()
        };

        let output = render_index(&config);

        assert!(output.contains("test1"));
        assert!(output.contains("test2"));
        assert!(output.contains("Groups"));
        assert!(output.contains("testGroup1"));
    }

    #[test]
    fn test_render_index_without_hosts_or_groups() {
        let output = render_index(&Config::default());
        assert!(output.contains("No hosts configured"));
        assert!(!output.contains("Groups"));
    }

    #[test]
    fn test_render_header_with_refresh() {
        let output = render_header(Utc::now(), Some(30));
        assert!(output.contains("(refresh: 30s)"));
    }
}
