/// Result of an insert guarded by a unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    Duplicate,
}

impl<T> InsertOutcome<T> {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertOutcome::Duplicate)
    }

    pub fn inserted(self) -> Option<T> {
        match self {
            InsertOutcome::Inserted(value) => Some(value),
            InsertOutcome::Duplicate => None,
        }
    }
}
