use super::types::SummaryRecord;

impl SummaryRecord {
    /// Share of the record's jobs counted under `status`, in whole percent.
    ///
    /// Truncates, so the percentages of one record may add up to less
    /// than 100. A record without counts yields 0.
    pub fn percent(&self, status: &str) -> usize {
        let total = self.total();
        if total == 0 {
            return 0;
        }

        self.count(status) * 100 / total
    }
}
