/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Share of questions already moved past, rounded down.
    pub percent: usize,
    pub is_complete: bool,
}
