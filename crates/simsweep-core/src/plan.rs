//! Sweep plan - the validated (widths × pipeline depths × modules) matrix

use crate::error::{HarnessError, HarnessResult};
use crate::model::ConfigKey;
use std::fmt;
use std::str::FromStr;

/// A comma-separated list of non-negative integers, e.g. `8,16`
///
/// Entries are trimmed; empty input, empty entries and non-numeric entries are
/// rejected. Order and duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueList(Vec<u32>);

impl ValueList {
    /// The parsed values in input order
    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

impl FromStr for ValueList {
    type Err = HarnessError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(HarnessError::invalid_list(
                input,
                "at least one value is required",
            ));
        }

        let mut values = Vec::new();
        for entry in input.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(HarnessError::invalid_list(input, "empty entry"));
            }
            let value = entry.parse::<u32>().map_err(|_| {
                HarnessError::invalid_list(
                    input,
                    format!("'{}' is not a non-negative integer", entry),
                )
            })?;
            values.push(value);
        }

        Ok(Self(values))
    }
}

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl From<Vec<u32>> for ValueList {
    fn from(values: Vec<u32>) -> Self {
        Self(values)
    }
}

/// Validated sweep matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    widths: Vec<u32>,
    pipe_stages: Vec<u32>,
    modules: u32,
}

impl SweepPlan {
    /// Build a plan, rejecting empty axes and a module count below 1
    pub fn new(widths: Vec<u32>, pipe_stages: Vec<u32>, modules: u32) -> HarnessResult<Self> {
        if widths.is_empty() {
            return Err(HarnessError::InvalidPlan(
                "at least one width value must be specified".to_string(),
            ));
        }
        if pipe_stages.is_empty() {
            return Err(HarnessError::InvalidPlan(
                "at least one pipeline-depth value must be specified".to_string(),
            ));
        }
        if modules < 1 {
            return Err(HarnessError::InvalidPlan(
                "module count must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            widths,
            pipe_stages,
            modules,
        })
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn pipe_stages(&self) -> &[u32] {
        &self.pipe_stages
    }

    pub fn modules(&self) -> u32 {
        self.modules
    }

    /// Number of (width, depth) pairs that will run, duplicates included
    pub fn configuration_count(&self) -> usize {
        self.widths.len() * self.pipe_stages.len()
    }

    /// Number of module runs the whole sweep performs
    pub fn total_tests(&self) -> usize {
        self.configuration_count() * self.modules as usize
    }

    /// Configurations in execution order: widths outer, depths inner
    pub fn configurations(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        self.widths.iter().flat_map(move |&width| {
            self.pipe_stages
                .iter()
                .map(move |&pipe_stages| ConfigKey::new(width, pipe_stages))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("8,16", vec![8, 16])]
    #[case("2", vec![2])]
    #[case(" 2 , 3,4 ", vec![2, 3, 4])]
    #[case("8,8", vec![8, 8])]
    fn test_value_list_parses(#[case] input: &str, #[case] expected: Vec<u32>) {
        let list: ValueList = input.parse().unwrap();
        assert_eq!(list.values(), expected.as_slice());
    }

    #[rstest]
    #[case("8,x")]
    #[case("")]
    #[case("   ")]
    #[case("8,,16")]
    #[case("8,")]
    #[case("-4")]
    #[case("1.5")]
    fn test_value_list_rejects(#[case] input: &str) {
        let result = input.parse::<ValueList>();
        assert!(matches!(result, Err(HarnessError::InvalidList { .. })));
    }

    #[test]
    fn test_value_list_error_names_entry() {
        let err = "8,x".parse::<ValueList>().unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_value_list_display() {
        let list = ValueList::from(vec![2, 3, 4]);
        assert_eq!(list.to_string(), "2,3,4");
    }

    #[test]
    fn test_plan_rejects_empty_widths() {
        let result = SweepPlan::new(vec![], vec![2], 3);
        assert!(matches!(result, Err(HarnessError::InvalidPlan(_))));
    }

    #[test]
    fn test_plan_rejects_empty_pipe_stages() {
        let result = SweepPlan::new(vec![8], vec![], 3);
        assert!(matches!(result, Err(HarnessError::InvalidPlan(_))));
    }

    #[test]
    fn test_plan_rejects_zero_modules() {
        let result = SweepPlan::new(vec![8], vec![2], 0);
        assert!(matches!(result, Err(HarnessError::InvalidPlan(_))));
    }

    #[test]
    fn test_plan_configuration_order() {
        let plan = SweepPlan::new(vec![16, 8], vec![4, 2], 1).unwrap();
        let keys: Vec<ConfigKey> = plan.configurations().collect();
        assert_eq!(
            keys,
            vec![
                ConfigKey::new(16, 4),
                ConfigKey::new(16, 2),
                ConfigKey::new(8, 4),
                ConfigKey::new(8, 2),
            ]
        );
    }

    #[test]
    fn test_plan_keeps_duplicates() {
        let plan = SweepPlan::new(vec![8, 8], vec![2], 5).unwrap();
        assert_eq!(plan.configuration_count(), 2);
        assert_eq!(plan.total_tests(), 10);
        assert_eq!(plan.configurations().count(), 2);
    }
}
