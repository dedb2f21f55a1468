//! Plain-text rendering of a diff result for reports and snapshot tests.

use std::fmt::{self, Write};

use crate::diff_result::{ConfigurationSet, DiffResult};

/// Renders one block per configuration set:
///
/// ```text
/// #0 POS[4-9]  complete  DIFF
///   alice a1 PosValue=VBZ
///   bob a1 PosValue=NNS
/// ```
///
/// Stacked instances carry their stack rank as `^n`, slot configurations
/// their role.
pub struct DiffDisplay<'a> {
    result: &'a DiffResult,
    only_differing: bool,
    only_incomplete: bool,
}

impl<'a> DiffDisplay<'a> {
    pub fn new(result: &'a DiffResult) -> Self {
        Self {
            result,
            only_differing: false,
            only_incomplete: false,
        }
    }

    /// Show only sets whose labels differ.
    pub fn only_differing(mut self) -> Self {
        self.only_differing = true;
        self
    }

    /// Show only incomplete sets.
    pub fn only_incomplete(mut self) -> Self {
        self.only_incomplete = true;
        self
    }

    fn included(&self, set: &ConfigurationSet) -> bool {
        (!self.only_differing || !set.is_agreement())
            && (!self.only_incomplete || !self.result.is_complete(set))
    }

    fn write_set(&self, f: &mut fmt::Formatter<'_>, set: &ConfigurationSet) -> fmt::Result {
        write!(f, "{}", set.position())?;
        f.write_str(if self.result.is_complete(set) {
            "  complete"
        } else {
            "  incomplete"
        })?;
        f.write_str(if set.is_agreement() { "  agree" } else { "  DIFF" })?;
        if set.has_stacking() {
            f.write_str("  stacked")?;
        }

        for cfg in set.configurations() {
            let mut line = String::new();
            write!(line, "  {} {}", cfg.annotator, cfg.source.id)?;
            if cfg.stack_rank > 0 {
                write!(line, " ^{}", cfg.stack_rank)?;
            }
            for (feature, label) in &cfg.labels {
                write!(line, " {}={}", feature, label)?;
            }
            if let Some(slot) = &cfg.slot {
                write!(line, " role={}", slot.role)?;
            }
            f.write_char('\n')?;
            f.write_str(&line)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for DiffDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for set in self
            .result
            .configuration_sets()
            .iter()
            .filter(|set| self.included(set))
        {
            if !first {
                f.write_char('\n')?;
            }
            first = false;
            self.write_set(f, set)?;
        }
        Ok(())
    }
}
