/// Estimates how much of the acceptance criteria the uploaded cases cover.
///
/// Each non-blank line of `acceptance_criteria` counts as one criterion and
/// each test case is assumed to cover at most one of them. The percentage is
/// rounded half to even.
pub fn compute_coverage(test_case_count: usize, acceptance_criteria: &str) -> u32 {
    let criteria_count = acceptance_criteria
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
        .max(1);
    let covered = test_case_count.min(criteria_count);
    let percent = (covered as f64 / criteria_count as f64) * 100.0;
    percent.round_ties_even() as u32
}

const MAX_LEAVES: u32 = 10;

pub fn render_tree(coverage: u32) -> String {
    let leaf_count = (coverage / 10).clamp(1, MAX_LEAVES) as usize;
    let leaves = "🍃".repeat(leaf_count);
    let fruit = if coverage == 100 { " 🍎" } else { "" };
    format!("    |||\n  {leaves}{fruit}\n    |||\n    |||")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_counts_non_blank_criteria_lines() {
        let criteria = "- user can log in\n\n- user can log out\n   \n• admin can reset";
        assert_eq!(compute_coverage(1, criteria), 33);
        assert_eq!(compute_coverage(2, criteria), 67);
        assert_eq!(compute_coverage(9, criteria), 100);
    }

    #[test]
    fn empty_criteria_count_as_one() {
        assert_eq!(compute_coverage(0, ""), 0);
        assert_eq!(compute_coverage(4, "   \n"), 100);
    }

    #[test]
    fn coverage_rounds_half_to_even() {
        let eight = "a\nb\nc\nd\ne\nf\ng\nh";
        assert_eq!(compute_coverage(1, eight), 12);
        assert_eq!(compute_coverage(3, eight), 38);
    }

    #[test]
    fn tree_has_at_least_one_leaf() {
        assert_eq!(render_tree(0), "    |||\n  🍃\n    |||\n    |||");
        assert_eq!(render_tree(9), "    |||\n  🍃\n    |||\n    |||");
    }

    #[test]
    fn tree_grows_a_leaf_per_ten_percent() {
        let tree = render_tree(57);
        assert_eq!(tree.lines().nth(1), Some("  🍃🍃🍃🍃🍃"));
    }

    #[test]
    fn full_coverage_bears_fruit() {
        assert_eq!(
            render_tree(100),
            format!("    |||\n  {} 🍎\n    |||\n    |||", "🍃".repeat(10))
        );
        assert!(!render_tree(99).contains('🍎'));
    }
}
