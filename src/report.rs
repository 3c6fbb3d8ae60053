//! Human-readable reports for test output.

use crate::events::EventList;
use crate::host::Pipeline;
use crate::processor::processor_name;
use crate::settings::Settings;

const REPORT_WIDTH: usize = 80;

/// Renders captured events as a report section, one event per line.
pub fn events_report(events: &EventList) -> String {
    let mut out = String::from("----- logcap events -----");
    for line in events.to_string().lines() {
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// Renders the keep/evict decision for each configured processor.
///
/// With `verbosity > 1` the names in every partition of the active mode
/// are listed as well.
pub fn settings_report(settings: &Settings, processors: &Pipeline, verbosity: u8) -> Vec<String> {
    let mode = settings.mode();
    let mut lines = vec![
        banner(" logcap settings "),
        format!("logcap is operating in {mode} mode."),
    ];

    if verbosity > 1 {
        for partition in settings.partitions(mode) {
            if partition.names().is_empty() {
                lines.push(format!("- {} (empty)", partition.source()));
                continue;
            }
            lines.push(format!("- {}:", partition.source()));
            lines.extend(partition.names().iter().map(|name| format!("    {name}")));
        }
    }

    for processor in processors {
        let name = processor_name(processor.as_ref());
        let verdict = settings.use_processor(&name);
        lines.push(format!("processor '{name}' is {verdict}."));
    }
    lines.push("=".repeat(REPORT_WIDTH));
    lines
}

fn banner(title: &str) -> String {
    let fill = REPORT_WIDTH.saturating_sub(title.len());
    let left = fill / 2;
    format!("{}{title}{}", "=".repeat(left), "=".repeat(fill - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::processor::processor_fn;
    use crate::processors::{AddLogLevel, TimeStamper};
    use crate::settings::{Mode, Options};
    use std::sync::Arc;

    #[test]
    fn events_report_lists_events() {
        let events: EventList = vec![
            fields! { "event" => "a", "level" => "info" },
            fields! { "event" => "b" },
        ]
        .into();
        assert_eq!(
            events_report(&events),
            "----- logcap events -----\n{\"event\":\"a\",\"level\":\"info\"}\n{\"event\":\"b\"}"
        );
        assert_eq!(events_report(&EventList::new()), "----- logcap events -----");
    }

    #[test]
    fn settings_report_explains_each_processor() {
        let options = Options {
            file_evict: vec!["password_nerf".to_string()],
            ..Options::default()
        };
        let settings = Settings::from_options(&options).expect("settings");
        assert_eq!(settings.mode(), Mode::Evict);

        let nerf = processor_fn("password_nerf", |_, _, event| crate::Step::Continue(event));
        let processors: Pipeline = vec![
            Arc::new(AddLogLevel),
            Arc::new(nerf),
            Arc::new(TimeStamper::default()),
        ];
        let lines = settings_report(&settings, &processors, 0);

        assert_eq!(lines[0].len(), REPORT_WIDTH);
        assert!(lines[0].contains(" logcap settings "));
        assert_eq!(lines[1], "logcap is operating in evict mode.");
        assert_eq!(
            lines[2],
            "processor 'add_log_level' is kept because no configuration evicted it."
        );
        assert_eq!(lines[3], "processor 'password_nerf' is evicted due to config-file.");
        assert_eq!(
            lines[4],
            "processor 'TimeStamper' is evicted due to default-evict-list."
        );
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn verbose_report_lists_partitions() {
        let lines = settings_report(&Settings::new(), &Vec::new(), 2);
        assert!(lines.contains(&"- test-override (empty)".to_string()));
        assert!(lines.contains(&"- default-keep-list:".to_string()));
        assert!(lines.contains(&"    add_log_level".to_string()));
    }
}
