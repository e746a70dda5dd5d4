use crate::comparison::table::ComparisonTable;
use crate::error::TableError;

/// Largest number of mutation descriptions reported for one node before the
/// list is summarized.
pub const DEFAULT_MUTATION_LIMIT: usize = 20;

/// Mutations found in every one of `samples` and in no other sample.
///
/// A site qualifies when each requested sample differs from `ref` and
/// `presentIn` equals the number of requested samples. Descriptions are
/// returned in table order, missing and empty ones dropped. More than
/// [`DEFAULT_MUTATION_LIMIT`] results are cut down to the first entries plus
/// a `"+N more"` summary.
pub fn get_common_mutations<S: AsRef<str>>(
    table: &ComparisonTable,
    samples: &[S],
) -> Result<Vec<String>, TableError> {
    get_common_mutations_with_limit(table, samples, DEFAULT_MUTATION_LIMIT)
}

pub fn get_common_mutations_with_limit<S: AsRef<str>>(
    table: &ComparisonTable,
    samples: &[S],
    limit: usize,
) -> Result<Vec<String>, TableError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let columns = samples
        .iter()
        .map(|s| table.sample_column(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mutations = table
        .sites()
        .iter()
        .filter(|site| columns.iter().all(|&c| site.differs_from_reference(c)))
        .filter(|site| site.present_in() == Some(samples.len()))
        .filter_map(|site| site.description())
        .filter(|description| !description.is_empty())
        .map(str::to_string)
        .collect();

    Ok(summarize(mutations, limit))
}

fn summarize(mut mutations: Vec<String>, limit: usize) -> Vec<String> {
    if mutations.len() > limit {
        let dropped = mutations.len() - limit;
        mutations.truncate(limit);
        mutations.push(format!("+{} more", dropped));
    }
    mutations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::table::{Cell, SampleSelection};

    fn table(rows: &[[&str; 5]]) -> ComparisonTable {
        let headers = ["ref", "presentIn", "description", "sample-1", "sample-2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows.iter().map(|row| {
            row.iter()
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect::<Vec<Cell>>()
        });
        ComparisonTable::from_rows(headers, rows, &SampleSelection::default()).unwrap()
    }

    #[test]
    fn test_shared_mutation() {
        let table = table(&[["A", "2", "X1", "T", "T"]]);
        let result = get_common_mutations(&table, &["sample-1", "sample-2"]).unwrap();
        assert_eq!(result, vec!["X1"]);
    }

    #[test]
    fn test_present_in_must_match_sample_count() {
        let table = table(&[
            ["A", "2", "shared", "T", "T"],
            ["A", "1", "only-one", "T", "A"],
            ["A", "3", "shared-with-others", "T", "T"],
        ]);
        assert_eq!(
            get_common_mutations(&table, &["sample-1", "sample-2"]).unwrap(),
            vec!["shared"]
        );
        assert_eq!(
            get_common_mutations(&table, &["sample-1"]).unwrap(),
            vec!["only-one"]
        );
    }

    #[test]
    fn test_every_sample_must_differ() {
        let table = table(&[["A", "2", "X1", "T", "A"], ["A", "2", "X2", "G", "C"]]);
        let result = get_common_mutations(&table, &["sample-1", "sample-2"]).unwrap();
        assert_eq!(result, vec!["X2"]);
    }

    #[test]
    fn test_missing_and_empty_descriptions_dropped() {
        let table = table(&[["A", "1", "", "T", "A"], ["A", "1", " ", "T", "A"]]);
        let result = get_common_mutations(&table, &["sample-1"]).unwrap();
        // Whitespace-only survives here; the annotator drops it.
        assert_eq!(result, vec![" "]);
    }

    #[test]
    fn test_truncation_keeps_row_order() {
        let descriptions: Vec<String> = (0..25).map(|i| format!("M{}", i)).collect();
        let rows: Vec<[&str; 5]> = descriptions
            .iter()
            .map(|d| ["A", "1", d.as_str(), "T", "A"])
            .collect();
        let table = table(&rows);

        let result = get_common_mutations(&table, &["sample-1"]).unwrap();
        assert_eq!(result.len(), 21);
        assert_eq!(&result[..20], &descriptions[..20]);
        assert_eq!(result[20], "+5 more");

        let again = get_common_mutations(&table, &["sample-1"]).unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_exactly_at_limit_is_not_summarized() {
        let descriptions: Vec<String> = (0..20).map(|i| format!("M{}", i)).collect();
        let rows: Vec<[&str; 5]> = descriptions
            .iter()
            .map(|d| ["A", "1", d.as_str(), "T", "A"])
            .collect();
        let result = get_common_mutations(&table(&rows), &["sample-1"]).unwrap();
        assert_eq!(result, descriptions);
    }

    #[test]
    fn test_custom_limit() {
        let table = table(&[
            ["A", "1", "a", "T", "A"],
            ["A", "1", "b", "T", "A"],
            ["A", "1", "c", "T", "A"],
        ]);
        let result = get_common_mutations_with_limit(&table, &["sample-1"], 1).unwrap();
        assert_eq!(result, vec!["a", "+2 more"]);
    }

    #[test]
    fn test_unknown_sample_is_an_error() {
        let table = table(&[["A", "1", "X", "T", "A"]]);
        let err = get_common_mutations(&table, &["sample-9"]).unwrap_err();
        assert!(matches!(err, TableError::UnknownSample(ref s) if s == "sample-9"));
    }

    #[test]
    fn test_empty_sample_list() {
        let table = table(&[["A", "0", "X", "A", "A"]]);
        let empty: [&str; 0] = [];
        assert!(get_common_mutations(&table, &empty).unwrap().is_empty());
    }
}
