mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::export_json;
pub use progress::FetchProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{print_group_summary, print_host_summary, print_index};

/// Prints the banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚦 Concourse Summary"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Pipeline health at a glance")
    );
}
