use crate::error::QuickAddError;

pub type QuickAddResult<T> = Result<T, QuickAddError>;
