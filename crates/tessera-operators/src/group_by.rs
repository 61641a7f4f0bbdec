//! Sort-based grouping with map/reduce aggregation.

use tessera_core::{Result, SortKey};
use tessera_tds::{RowView, Table};

use crate::specs::{typed_column, AggregationSpec};

/// Group `table` by the named columns and compute one output row per group.
///
/// Groups are the contiguous equal-key ranges of a stable all-ascending sort,
/// so group order is ascending key order and, within a group, rows keep
/// their original relative order for the map phase. For each spec, each
/// group's rows are mapped in order and the mapped values reduced into the
/// spec's output column, positionally aligned with the groups.
pub fn group_by(table: &Table, keys: &[&str], specs: &[AggregationSpec]) -> Result<Table> {
    let sort_keys: Vec<SortKey> = keys.iter().map(|k| SortKey::asc(*k)).collect();
    let (sorted, ranges) = table.sort_by(&sort_keys)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(rows = table.row_count(), groups = ranges.len(), "grouped table");

    let mut out = sorted.distinct_on(keys)?.select_columns(keys)?;
    for spec in specs {
        let mut results = Vec::with_capacity(ranges.len());
        for range in &ranges {
            let mut mapped = Vec::with_capacity(range.len());
            for r in range.clone() {
                mapped.push(spec.eval_map(&RowView::new(&sorted, r))?);
            }
            results.push(spec.eval_reduce(&mapped)?);
        }
        let data = typed_column(&spec.name, spec.column_type, results)?;
        out = out.with_column(spec.name.clone(), data)?;
    }
    Ok(out)
}
