//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;
    use proptest::sample::Index;

    use crate::core::walker::SourceFile;

    /// Generate a dotted symbol name (e.g. `app.ui.Widget`)
    pub fn symbol() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,6}(\\.[A-Za-z][a-zA-Z0-9]{0,6}){0,3}"
    }

    /// Build a source file from its declarations
    pub fn source(path: &str, provides: &[&str], requires: &[&str]) -> SourceFile {
        let mut text = String::new();
        for symbol in provides {
            text.push_str(&format!("goog.provide('{symbol}');\n"));
        }
        text.push('\n');
        for symbol in requires {
            text.push_str(&format!("goog.require('{symbol}');\n"));
        }
        SourceFile::from_text(path, text)
    }

    /// Generate an acyclic, duplicate-free set of files in shuffled discovery order
    ///
    /// File `i` provides `ns.F{i}` and may only require symbols of files
    /// with a lower number, which keeps the graph acyclic.
    pub fn dag_sources(max_files: usize) -> impl Strategy<Value = Vec<SourceFile>> {
        (1..=max_files)
            .prop_flat_map(|count| {
                let deps = proptest::collection::vec(
                    proptest::collection::vec(any::<Index>(), 0..4),
                    count,
                );
                let order = Just((0..count).collect::<Vec<usize>>()).prop_shuffle();
                (deps, order)
            })
            .prop_map(|(deps, order)| {
                order
                    .into_iter()
                    .map(|i| {
                        let provide = format!("ns.F{i}");
                        let requires: Vec<String> = if i == 0 {
                            Vec::new()
                        } else {
                            deps[i].iter().map(|ix| format!("ns.F{}", ix.index(i))).collect()
                        };
                        let requires: Vec<&str> = requires.iter().map(String::as_str).collect();
                        source(&format!("f{i}.js"), &[provide.as_str()], &requires)
                    })
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_symbol_generator(name in symbol()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.split('.').all(|part| !part.is_empty()));
        }

        #[test]
        fn test_dag_sources_provide_once(files in dag_sources(16)) {
            let mut provides: Vec<&String> = files.iter().flat_map(|f| &f.provides).collect();
            let total = provides.len();
            provides.sort();
            provides.dedup();
            prop_assert_eq!(provides.len(), total);
            prop_assert_eq!(total, files.len());
        }
    }
}
