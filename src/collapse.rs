//! Collapsed-stack text output
//!
//! The `<frames-joined-by-semicolons> <count>` line format consumed by
//! speedscope, inferno and the original flamegraph.pl scripts.

use crate::clickhouse::StackSample;

/// Render samples as collapsed-stack lines, newline-separated with no
/// trailing newline.
pub fn collapse(samples: &[StackSample]) -> String {
    samples
        .iter()
        .map(|row| format!("{} {}", row.stack, row.samples))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(stack: &str, samples: u64) -> StackSample {
        StackSample {
            stack: stack.to_string(),
            samples,
        }
    }

    #[test]
    fn formats_one_line_per_stack() {
        let text = collapse(&[sample("a;b;c", 5), sample("a;b;d", 2)]);
        assert_eq!(text, "a;b;c 5\na;b;d 2");
    }

    #[test]
    fn no_samples_produce_an_empty_body() {
        assert_eq!(collapse(&[]), "");
    }

    #[test]
    fn single_stack_has_no_newline() {
        assert_eq!(collapse(&[sample("main", 17)]), "main 17");
    }
}
