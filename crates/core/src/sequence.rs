#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceValue(i64);

impl SequenceValue {
    /// Initialization value for a store that has never persisted a sequence.
    pub const FIRST: SequenceValue = SequenceValue(1);

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn try_new(value: i64) -> Result<Self, SequenceError> {
        if value < 1 {
            return Err(SequenceError::NotPositive);
        }
        Ok(Self(value))
    }

    pub fn next(self) -> Result<Self, SequenceError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(SequenceError::Overflow)
    }
}

impl std::fmt::Display for SequenceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceError {
    NotPositive,
    Overflow,
}

impl SequenceError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotPositive => "sequence value must be a positive integer",
            Self::Overflow => "sequence value overflow",
        }
    }
}
