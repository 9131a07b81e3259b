// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the extraction key-set guarantee.

use std::collections::BTreeSet;

use marketlens_chains::ExtractionSchema;
use marketlens_chains::parse::parse_extraction;
use proptest::prelude::*;

fn field_names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z][a-z_]{0,8}", 1..8)
}

proptest! {
    /// Whatever subset of the schema the model returns, the result holds every schema key.
    #[test]
    fn result_keys_equal_schema_keys(
        names in field_names(),
        mask in prop::collection::vec(any::<bool>(), 8),
        fenced in any::<bool>(),
    ) {
        let schema: ExtractionSchema = names.iter().map(|n| (n.as_str(), "string")).collect();
        let body = names
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(n, _)| format!("\"{n}\": \"v\""))
            .collect::<Vec<_>>()
            .join(", ");
        let completion = if fenced {
            format!("```json\n{{{body}}}\n```")
        } else {
            format!("Here you go: {{{body}}}")
        };

        let result = parse_extraction(&completion, &schema).unwrap();
        let got: BTreeSet<String> = result.keys().map(str::to_string).collect();
        prop_assert_eq!(got, names);
    }

    /// Keys the model invents are kept next to the schema keys.
    #[test]
    fn extra_keys_are_superset(names in field_names(), extra in "[A-Z]{3,6}") {
        let schema: ExtractionSchema = names.iter().map(|n| (n.as_str(), "number")).collect();
        let completion = format!("{{\"{extra}\": 1}}");

        let result = parse_extraction(&completion, &schema).unwrap();
        prop_assert!(result.contains_key(&extra));
        prop_assert_eq!(result.len(), names.len() + 1);
        for name in &names {
            prop_assert!(result.get(name).unwrap().is_null());
        }
    }
}
