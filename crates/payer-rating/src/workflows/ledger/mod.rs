//! Schema-less tables and the header discovery that turns them into column maps.

mod locator;
mod normalizer;
mod profiles;
mod table;

pub use locator::{
    build_column_map, locate_headers, ColumnMap, FieldSpec, HeaderCandidate, HeaderLocation,
    MatchMode,
};
pub(crate) use normalizer::{clean_text, normalize_header};
pub use profiles::{HeaderProfiles, LedgerField, TableProfile};
pub use table::{cell_at, row_has_data, Cell, Table, Workbook};
