//! Condition evaluation
//!
//! The leaf predicate of a classification: one condition against one event
//! value. Membership comparators test equality; ordered comparators compare
//! typed instants and hit when any operand satisfies the inequality.

use accord_core::{Comparator, Condition, ConditionValues, EventValue};

/// Evaluate a condition against an event's value.
///
/// The unconditional form matches everything that reaches its bucket. Every
/// comparator form requires a value: create, delete, rename, and move events
/// carry none and can only be flagged unconditionally. Ordered comparators
/// are defined over instants only; string operands never order-compare.
pub fn condition_matches(condition: &Condition, value: Option<&EventValue>) -> bool {
    let Some(comparator) = condition.comparator else {
        return true;
    };
    let Some(value) = value else {
        return false;
    };

    match comparator {
        Comparator::In => is_member(value, &condition.values),
        Comparator::NotIn => !is_member(value, &condition.values),
        Comparator::GreaterThan => exceeds_any(value, &condition.values),
        Comparator::LessThan => precedes_any(value, &condition.values),
    }
}

/// Membership by typed equality. A value of one type is never a member of
/// operands of the other.
fn is_member(value: &EventValue, operands: &ConditionValues) -> bool {
    match (value, operands) {
        (EventValue::User(user), ConditionValues::Users(users)) => {
            users.iter().any(|u| u == user)
        }
        (EventValue::Instant(instant), ConditionValues::Instants(instants)) => {
            instants.contains(instant)
        }
        _ => false,
    }
}

fn exceeds_any(value: &EventValue, operands: &ConditionValues) -> bool {
    match (value, operands) {
        (EventValue::Instant(instant), ConditionValues::Instants(instants)) => {
            instants.iter().any(|operand| instant > operand)
        }
        _ => false,
    }
}

fn precedes_any(value: &EventValue, operands: &ConditionValues) -> bool {
    match (value, operands) {
        (EventValue::Instant(instant), ConditionValues::Instants(instants)) => {
            instants.iter().any(|operand| instant < operand)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_core::Timestamp;

    fn instant(value: &str) -> Timestamp {
        value.parse().unwrap()
    }

    fn users(values: &[&str]) -> ConditionValues {
        ConditionValues::Users(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn unconditional_matches_with_and_without_value() {
        let condition = Condition::unconditional();
        assert!(condition_matches(&condition, None));
        assert!(condition_matches(
            &condition,
            Some(&EventValue::User("bob@x".to_string()))
        ));
    }

    #[test]
    fn comparators_never_match_an_absent_value() {
        for comparator in [
            Comparator::In,
            Comparator::NotIn,
            Comparator::GreaterThan,
            Comparator::LessThan,
        ] {
            let condition = Condition::new(Some(comparator), users(&[]));
            assert!(!condition_matches(&condition, None));
        }
    }

    #[test]
    fn membership_is_string_equality() {
        let condition = Condition::new(Some(Comparator::In), users(&["bob@x", "carol@x"]));
        assert!(condition_matches(
            &condition,
            Some(&EventValue::User("carol@x".to_string()))
        ));
        assert!(!condition_matches(
            &condition,
            Some(&EventValue::User("drew@x".to_string()))
        ));
    }

    #[test]
    fn not_in_with_empty_operands_matches_any_value() {
        let condition = Condition::new(Some(Comparator::NotIn), users(&[]));
        assert!(condition_matches(
            &condition,
            Some(&EventValue::User("drew@x".to_string()))
        ));
    }

    #[test]
    fn ordered_comparators_use_instants() {
        let operands = ConditionValues::Instants(vec![instant("2024-04-22T15:57:06Z")]);
        let later = EventValue::Instant(instant("2024-04-22T15:57:06.275Z"));

        let gt = Condition::new(Some(Comparator::GreaterThan), operands.clone());
        assert!(condition_matches(&gt, Some(&later)));

        let lt = Condition::new(Some(Comparator::LessThan), operands);
        assert!(!condition_matches(&lt, Some(&later)));
    }

    #[test]
    fn ordered_comparators_reject_string_operands() {
        let condition = Condition::new(Some(Comparator::GreaterThan), users(&["zzz"]));
        assert!(!condition_matches(
            &condition,
            Some(&EventValue::User("aaa".to_string()))
        ));
        assert!(!condition_matches(
            &condition,
            Some(&EventValue::Instant(instant("2024-04-22T15:57:06Z")))
        ));
    }

    #[test]
    fn mismatched_types_behave_as_non_membership() {
        let instants = ConditionValues::Instants(vec![instant("2024-04-22T15:57:06Z")]);
        let user = EventValue::User("bob@x".to_string());

        let is_in = Condition::new(Some(Comparator::In), instants.clone());
        assert!(!condition_matches(&is_in, Some(&user)));

        let not_in = Condition::new(Some(Comparator::NotIn), instants);
        assert!(condition_matches(&not_in, Some(&user)));
    }
}
