use crate::domain::model::{OrderRow, Resolution};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

/// Broadcasts the resolved mapping back onto every row by wilaya lookup.
/// Pure over its inputs, so re-running against the same mapping yields the
/// same output. A row whose wilaya has no entry is an integrity violation:
/// the resolver must have visited every distinct wilaya in the input.
pub fn assign(
    rows: &[OrderRow],
    resolutions: &HashMap<String, Resolution>,
) -> Result<Vec<OrderRow>> {
    rows.iter()
        .map(|row| {
            let resolution =
                resolutions
                    .get(&row.wilaya)
                    .ok_or_else(|| EtlError::IntegrityError {
                        wilaya: row.wilaya.clone(),
                    })?;

            let mut enriched = row.clone();
            enriched.code_wilaya = coerce_code(resolution.code.as_deref());
            enriched.commune = resolution.commune.clone();
            Ok(enriched)
        })
        .collect()
}

/// Non-numeric or absent codes become a missing value, never zero.
fn coerce_code(code: Option<&str>) -> Option<u8> {
    code.and_then(|c| c.trim().parse().ok())
}
