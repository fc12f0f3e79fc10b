//! Arranges button captions into a keyboard grid.

/// Groups captions into rows of `columns` items.
///
/// Every row except the last holds exactly `columns` captions; the last row
/// holds the remainder and is never padded. Input order is preserved. A
/// column count of zero is treated as one.
pub fn paginate<I, S>(captions: I, columns: usize) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let columns = columns.max(1);
    let captions: Vec<String> = captions.into_iter().map(Into::into).collect();
    captions
        .chunks(columns)
        .map(|row| row.to_vec())
        .collect()
}
