//! Caller-controlled document selection for a packet build session.

use serde::{Deserialize, Serialize};

use super::Document;

/// A stored document together with its inclusion flag and packet position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedDocument {
    /// The referenced document.
    pub document: Document,
    /// Whether the document goes into the packet.
    pub selected: bool,
    /// Packet position; lower comes first.
    pub order: i32,
}

impl SelectedDocument {
    /// Creates a selection entry.
    pub fn new(document: Document, selected: bool, order: i32) -> Self {
        Self {
            document,
            selected,
            order,
        }
    }

    /// Filters a selection down to included entries in packet order.
    ///
    /// Entries sharing an `order` keep their original relative sequence.
    pub fn arrange(selection: &[SelectedDocument]) -> Vec<&SelectedDocument> {
        let mut arranged: Vec<_> = selection.iter().filter(|entry| entry.selected).collect();
        arranged.sort_by_key(|entry| entry.order);
        arranged
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;
    use crate::types::{DocumentType, ProductType};

    fn entry(name: &str, selected: bool, order: i32) -> SelectedDocument {
        let document = Document {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            description: None,
            file_name: format!("{name}.pdf"),
            url: None,
            size: 0,
            document_type: DocumentType::Warranty,
            required: false,
            product_type: ProductType::new("underlayment"),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        SelectedDocument::new(document, selected, order)
    }

    fn names(arranged: &[&SelectedDocument]) -> Vec<String> {
        arranged.iter().map(|e| e.document.name.clone()).collect()
    }

    #[test]
    fn test_arrange_filters_and_sorts() {
        let selection = vec![
            entry("c", true, 3),
            entry("skip", false, 0),
            entry("a", true, 1),
            entry("b", true, 2),
        ];

        let arranged = SelectedDocument::arrange(&selection);
        assert_eq!(names(&arranged), ["a", "b", "c"]);
    }

    #[test]
    fn test_arrange_ties_keep_original_sequence() {
        let selection = vec![
            entry("first", true, 1),
            entry("zero", true, 0),
            entry("second", true, 1),
            entry("third", true, 1),
        ];

        let arranged = SelectedDocument::arrange(&selection);
        assert_eq!(names(&arranged), ["zero", "first", "second", "third"]);
    }

    #[test]
    fn test_arrange_unselected_is_empty() {
        let selection = vec![entry("a", false, 1), entry("b", false, 2)];
        assert!(SelectedDocument::arrange(&selection).is_empty());
        assert!(SelectedDocument::arrange(&[]).is_empty());
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]
            #[test]
            fn test_arrange_orders_and_filters(
                flags in prop::collection::vec((any::<bool>(), -8..8_i32), 0..24)
            ) {
                let selection: Vec<_> = flags
                    .iter()
                    .enumerate()
                    .map(|(index, (selected, order))| entry(&index.to_string(), *selected, *order))
                    .collect();

                let arranged = SelectedDocument::arrange(&selection);

                let expected = flags.iter().filter(|(selected, _)| *selected).count();
                prop_assert_eq!(arranged.len(), expected);
                prop_assert!(arranged.iter().all(|entry| entry.selected));

                for pair in arranged.windows(2) {
                    prop_assert!(pair[0].order <= pair[1].order);
                    if pair[0].order == pair[1].order {
                        let first: usize = pair[0].document.name.parse().unwrap();
                        let second: usize = pair[1].document.name.parse().unwrap();
                        prop_assert!(first < second);
                    }
                }
            }

            #[test]
            fn test_arrange_distinct_orders_strictly_ascend(
                orders in prop::collection::hash_set(any::<i32>(), 1..24),
                skipped in any::<prop::sample::Index>()
            ) {
                let orders: Vec<_> = orders.into_iter().collect();
                let skip = skipped.index(orders.len());
                let selection: Vec<_> = orders
                    .iter()
                    .enumerate()
                    .map(|(index, order)| entry("doc", index != skip, *order))
                    .collect();

                let arranged = SelectedDocument::arrange(&selection);

                prop_assert_eq!(arranged.len(), orders.len() - 1);
                prop_assert!(arranged.iter().all(|entry| entry.order != orders[skip]));
                prop_assert!(arranged.windows(2).all(|pair| pair[0].order < pair[1].order));
            }
        }
    }
}
