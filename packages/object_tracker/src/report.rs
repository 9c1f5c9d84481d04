use std::collections::BTreeMap;
use std::fmt;

use crate::ReferenceEntry;

/// Human-readable leak report: one line per live tracked entry, followed by
/// a per-type count summary.
///
/// The rendered shape is a stable contract consumed by external tooling:
///
/// ```text
/// [0]: Active object: [0x1000] Class: [Device] Time: [1724889600]
/// [1]: Active object: [0x2000] Class: [Texture] Time: [1724889601]
///
/// Count per Type:
/// Device : 1
/// Texture : 1
/// ```
///
/// Entry lines appear in registry enumeration order (handles ascending,
/// insertion order within a handle); type names appear in ascending
/// lexicographic order. Entries whose wrapper was collected between the
/// snapshot and rendering are skipped silently - that is an expected race,
/// not an error.
#[derive(Clone, Debug)]
pub struct LeakReport {
    lines: Vec<String>,
    count_per_type: BTreeMap<&'static str, usize>,
}

impl LeakReport {
    /// Builds a report from a snapshot of live entries.
    ///
    /// Each entry's owner is resolved exactly once; the same resolution
    /// feeds both the entry line and the type count, so the counts always
    /// sum to the number of listed lines.
    pub(crate) fn from_entries(entries: &[ReferenceEntry]) -> Self {
        let mut lines = Vec::new();
        let mut count_per_type: BTreeMap<&'static str, usize> = BTreeMap::new();

        for entry in entries {
            // Collected between snapshot and render; skip.
            let Some(owner) = entry.owner() else { continue };

            let description = entry.describe(owner.as_ref());
            if description.is_empty() {
                continue;
            }

            lines.push(description);

            let slot = count_per_type.entry(owner.type_name()).or_insert(0);
            *slot = slot
                .checked_add(1)
                .expect("live entry count overflows usize - this indicates an unrealistic scenario");
        }

        Self {
            lines,
            count_per_type,
        }
    }

    /// Whether the report lists any live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of live entries listed in the report.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lines.len()
    }

    /// The rendered entry lines, in enumeration order, without their
    /// `[index]: ` prefixes.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The per-type live counts, type names in ascending lexicographic
    /// order.
    pub fn counts_per_type(&self) -> impl Iterator<Item = (&'static str, usize)> {
        self.count_per_type.iter().map(|(name, count)| (*name, *count))
    }

    /// Prints the report to stdout.
    ///
    /// Prints nothing if no live entries were found, so a clean shutdown
    /// produces no output.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }

        print!("{self}");
    }
}

impl fmt::Display for LeakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            writeln!(f, "[{index}]: {line}")?;
        }

        writeln!(f)?;
        writeln!(f, "Count per Type:")?;

        for (name, count) in &self.count_per_type {
            writeln!(f, "{name} : {count}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Handle, NativeObject, TrackedObject};

    struct Buffer {
        handle: Handle,
    }

    impl NativeObject for Buffer {
        fn handle(&self) -> Handle {
            self.handle
        }
    }

    struct Shader {
        handle: Handle,
    }

    impl NativeObject for Shader {
        fn handle(&self) -> Handle {
            self.handle
        }
    }

    fn entry_for<W: NativeObject>(wrapper: &Arc<W>) -> ReferenceEntry {
        let owner: Arc<dyn TrackedObject> = Arc::clone(wrapper) as _;
        ReferenceEntry::new(
            NativeObject::handle(wrapper.as_ref()),
            Arc::downgrade(&owner),
            String::new(),
        )
    }

    #[test]
    fn empty_report_has_summary_skeleton() {
        let report = LeakReport::from_entries(&[]);

        assert!(report.is_empty());
        assert_eq!(report.live_count(), 0);
        assert_eq!(report.to_string(), "\nCount per Type:\n");
    }

    #[test]
    fn lines_are_indexed_in_order() {
        let buffer = Arc::new(Buffer {
            handle: Handle::new(0x10),
        });
        let shader = Arc::new(Shader {
            handle: Handle::new(0x20),
        });

        let report = LeakReport::from_entries(&[entry_for(&buffer), entry_for(&shader)]);

        let text = report.to_string();
        assert!(text.contains("[0]: Active object: [0x10] Class: [Buffer]"));
        assert!(text.contains("[1]: Active object: [0x20] Class: [Shader]"));
    }

    #[test]
    fn type_names_are_sorted_ascending() {
        let shader = Arc::new(Shader {
            handle: Handle::new(0x10),
        });
        let buffer_a = Arc::new(Buffer {
            handle: Handle::new(0x20),
        });
        let buffer_b = Arc::new(Buffer {
            handle: Handle::new(0x30),
        });

        let report = LeakReport::from_entries(&[
            entry_for(&shader),
            entry_for(&buffer_a),
            entry_for(&buffer_b),
        ]);

        let counts: Vec<_> = report.counts_per_type().collect();
        assert_eq!(counts, vec![("Buffer", 2), ("Shader", 1)]);

        let text = report.to_string();
        assert!(text.ends_with("Count per Type:\nBuffer : 2\nShader : 1\n"));
    }

    #[test]
    fn counts_sum_to_listed_lines() {
        let buffer = Arc::new(Buffer {
            handle: Handle::new(0x10),
        });
        let shader = Arc::new(Shader {
            handle: Handle::new(0x20),
        });

        let report = LeakReport::from_entries(&[entry_for(&buffer), entry_for(&shader)]);

        let total: usize = report.counts_per_type().map(|(_, count)| count).sum();
        assert_eq!(total, report.live_count());
    }

    #[test]
    fn collected_entries_are_skipped() {
        let buffer = Arc::new(Buffer {
            handle: Handle::new(0x10),
        });
        let shader = Arc::new(Shader {
            handle: Handle::new(0x20),
        });

        let entries = vec![entry_for(&buffer), entry_for(&shader)];
        drop(shader);

        let report = LeakReport::from_entries(&entries);

        assert_eq!(report.live_count(), 1);
        let counts: Vec<_> = report.counts_per_type().collect();
        assert_eq!(counts, vec![("Buffer", 1)]);
    }

    // Reports are snapshots that travel to whatever thread renders them.
    static_assertions::assert_impl_all!(LeakReport: Send, Sync);
}
