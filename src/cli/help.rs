//! Topic help with usage examples and strategy guidance

use crate::{config::env::EnvManager, probe::PingPlatform};
use colored::*;

/// Help text for the CLI beyond what clap generates
pub struct HelpSystem {
    platform: String,
}

impl HelpSystem {
    pub fn new() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Topics accepted by `--help-topic`
    pub fn topics() -> &'static [&'static str] {
        &["strategies", "env", "examples", "output"]
    }

    /// Overview: header, examples and the list of topics
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();
        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_footer(use_colors));
        help
    }

    /// Display help for one topic
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "strategies" | "strategy" => Some(self.format_strategy_help(use_colors)),
            "env" | "environment" | "config" => Some(EnvManager::display_env_help()),
            "examples" => Some(self.format_examples_section(use_colors)),
            "output" | "report" => Some(self.format_output_help(use_colors)),
            _ => None,
        }
    }

    fn heading(text: &str, use_colors: bool) -> String {
        if use_colors {
            text.bright_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "Connectivity Tester";
        let subtitle = "Port 443 reachability and latency probing for Remote Desktop endpoints";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title, subtitle, version, self.platform
            )
        }
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Probe the default AvD endpoints",
                command: "conntest",
                description: "Raw TCP connect to each endpoint on port 443",
            },
            ExampleHelp {
                title: "HTTPS through a proxy with a custom header",
                command: "conntest --strategy tool --proxy http://proxy.corp:3128 --header \"X-Client: conntest\"",
                description: "Uses curl, so the latency includes the TLS handshake and the proxy hop",
            },
            ExampleHelp {
                title: "ICMP ping a single host",
                command: "conntest --strategy ping --host graph.microsoft.com",
                description: "Sends two echo requests and reports the average round trip",
            },
            ExampleHelp {
                title: "Machine-readable report",
                command: "conntest --format json --output report.json --user jdoe --company Contoso",
                description: "Prints the run report as JSON and saves a copy to report.json",
            },
        ];

        let mut output = format!("{}\n", Self::heading("EXAMPLES:", use_colors));
        for example in &examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_strategy_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::heading("PROBING STRATEGIES:", use_colors));

        help.push_str("socket  Opens a TCP connection to host:port. Latency is the time to connect.\n");
        help.push_str("        All hosts are probed at once.\n\n");
        help.push_str("tool    Runs curl against https://host:port and reports its total time.\n");
        help.push_str("        Honours --proxy and --header. Alias: curl.\n\n");
        help.push_str("ping    Sends two ICMP echo requests and reports the average round trip.\n");
        help.push_str("        A reply without a parsable summary still counts as reachable.\n\n");

        help.push_str("tool and ping run at most --concurrency probes at a time (default 10).\n");
        let flag = PingPlatform::detect_from(&self.platform).count_flag();
        help.push_str(&format!("On {} ping is invoked with {} 2.\n", self.platform, flag));
        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::heading("OUTPUT:", use_colors));

        help.push_str("table   Results per host, latency statistics per zone and a mean\n");
        help.push_str("        latency chart. A zone is the last two labels of a host name.\n");
        help.push_str("json    The full run report: session, labels, results, zone statistics.\n\n");
        help.push_str("Latency colours: green below 100 ms, yellow below 300 ms, red above.\n");
        help.push_str("Zones with no reachable, measured host are left out of the statistics.\n");
        help.push_str("Logs go to stderr; use --verbose or --debug to see them.\n");
        help
    }

    fn format_footer(&self, use_colors: bool) -> String {
        let mut footer = format!("{}\n", Self::heading("ADDITIONAL HELP:", use_colors));
        for topic in Self::topics() {
            let command = format!("--help-topic {}", topic);
            if use_colors {
                footer.push_str(&format!("  {}\n", command.bright_yellow()));
            } else {
                footer.push_str(&format!("  {}\n", command));
            }
        }
        footer
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n",
                self.title, self.command, self.description
            )
        }
    }
}
