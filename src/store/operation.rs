//! Journal of mutations applied since the last commit.

/// A mutation applied to the in-memory entry state but not yet written to
/// the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// An entry was added or replaced.
    Put {
        /// Entry name.
        name: String,
        /// Uncompressed size of the new content.
        size: u64,
    },
    /// An entry was removed.
    Remove {
        /// Entry name.
        name: String,
    },
    /// An entry was renamed.
    Rename {
        /// Original name.
        from: String,
        /// New name.
        to: String,
    },
}

impl Operation {
    /// Returns the name this operation leaves behind (or removes).
    pub fn target_name(&self) -> &str {
        match self {
            Operation::Put { name, .. } => name,
            Operation::Remove { name } => name,
            Operation::Rename { to, .. } => to,
        }
    }

    /// Returns whether the operation only changes the central directory.
    ///
    /// Removed and renamed entries are raw-copied (or skipped) on commit
    /// without recompression.
    pub fn is_header_only(&self) -> bool {
        matches!(self, Operation::Remove { .. } | Operation::Rename { .. })
    }

    /// Returns the operation type as a string.
    pub fn operation_type(&self) -> &'static str {
        match self {
            Operation::Put { .. } => "put",
            Operation::Remove { .. } => "remove",
            Operation::Rename { .. } => "rename",
        }
    }
}

/// Counts of journaled operations, reported by a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Entries written with new content.
    pub entries_put: usize,
    /// Entries removed.
    pub entries_removed: usize,
    /// Entries renamed.
    pub entries_renamed: usize,
    /// Entries in the archive after the commit.
    pub total_entries: usize,
}

impl CommitSummary {
    pub(crate) fn from_journal(journal: &[Operation], total_entries: usize) -> Self {
        let mut summary = CommitSummary {
            total_entries,
            ..Default::default()
        };
        for op in journal {
            match op {
                Operation::Put { .. } => summary.entries_put += 1,
                Operation::Remove { .. } => summary.entries_removed += 1,
                Operation::Rename { .. } => summary.entries_renamed += 1,
            }
        }
        summary
    }

    /// Returns the number of journaled operations that were committed.
    pub fn operations(&self) -> usize {
        self.entries_put + self.entries_removed + self.entries_renamed
    }
}
