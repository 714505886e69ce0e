use thiserror::Error;

/// A raw slot record that cannot be turned into a [`Slot`](crate::Slot).
///
/// The slot is skipped: logged, never notified, never stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSlotError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unparseable {field}: {value:?}")]
    Unparseable { field: &'static str, value: String },
}

impl InvalidSlotError {
    pub(crate) fn unparseable(field: &'static str, value: impl Into<String>) -> Self {
        Self::Unparseable {
            field,
            value: value.into(),
        }
    }
}
