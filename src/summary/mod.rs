mod aggregator;
mod filter;
mod percent;
mod service;
mod sorter;
mod types;

pub use aggregator::aggregate;
pub use filter::filter_records;
pub use service::SummaryService;
pub use sorter::sort_records;
pub use types::{HostSummary, MembershipRule, RawJob, RawPipeline, SummaryRecord, PENDING_STATUS};
