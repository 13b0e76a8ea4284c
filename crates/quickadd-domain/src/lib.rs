pub mod autocomplete;
pub mod directory;
pub mod draft;
pub mod field;
pub mod field_update;
pub mod matcher;
pub mod parsed;
pub mod parser;
pub mod priority;
pub mod reconcile;
pub mod recurrence;
pub mod resolver;
pub mod token;

pub use autocomplete::{complete, suggest, Suggestion};
pub use directory::{Directory, DirectoryEntry, EntryId, ResolvedName};
pub use draft::TaskDraft;
pub use field::{Field, FieldValue};
pub use field_update::FieldUpdate;
pub use matcher::{match_text, match_text_at};
pub use parsed::ParsedResult;
pub use parser::{parse, parse_at};
pub use priority::Priority;
pub use reconcile::{FieldState, ParseOrigin, Provenance, ReconciliationEngine};
pub use recurrence::{Frequency, RecurrenceRule};
pub use resolver::{resolve, ResolvedValue};
pub use token::{Match, TokenKind, TokenKindSet};
