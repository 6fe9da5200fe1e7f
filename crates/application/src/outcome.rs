/// Result of a workflow action as seen by the presentation layer.
///
/// Remote failures are already logged by the workflow when `Failed` is
/// returned; callers only re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Local validation failed; field errors are set and no call was made.
    Invalid,
    /// The service accepted the mutation and the list was refetched.
    Applied,
    /// The service call failed.
    Failed,
    /// Nothing was pending for this action.
    Ignored,
}

impl WorkflowOutcome {
    /// Returns whether the service accepted the mutation.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}
