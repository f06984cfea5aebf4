//! Self-validation hooks and field annotation across nested records.

use constraints_core::{BoxError, Error, Field, Inspect, SelfCheck, Value};
use constraints_validator::validate;
use pretty_assertions::assert_eq;
use std::borrow::Cow;

struct Account {
    balance: i64,
}

impl SelfCheck for Account {
    fn check(&self) -> Result<(), BoxError> {
        if self.balance % 2 != 0 {
            return Err("balance must be even".into());
        }
        Ok(())
    }
}

impl Inspect for Account {
    fn inspect(&self) -> Value<'_> {
        Value::record([Field::new("balance", "lte=1000", &self.balance)])
    }

    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed("Account")
    }

    fn self_check(&self) -> Option<&dyn SelfCheck> {
        Some(self)
    }
}

/// Only offers its hook on an owned duplicate.
#[derive(Clone)]
struct Ticket {
    code: String,
}

struct TicketCheck(Ticket);

impl SelfCheck for TicketCheck {
    fn check(&self) -> Result<(), BoxError> {
        if self.0.code.starts_with('x') {
            return Err(format!("ticket {} is void", self.0.code).into());
        }
        Ok(())
    }
}

impl Inspect for Ticket {
    fn inspect(&self) -> Value<'_> {
        self.code.inspect()
    }

    fn to_self_check(&self) -> Option<Box<dyn SelfCheck>> {
        Some(Box::new(TicketCheck(self.clone())))
    }
}

struct Order {
    account: Account,
    tickets: Vec<Ticket>,
}

impl Inspect for Order {
    fn inspect(&self) -> Value<'_> {
        Value::record([
            Field::new("account", "", &self.account),
            Field::new("tickets", "empty=false > format=alpha", &self.tickets),
        ])
    }
}

fn order(balance: i64, codes: &[&str]) -> Order {
    Order {
        account: Account { balance },
        tickets: codes
            .iter()
            .map(|code| Ticket {
                code: code.to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_borrowed_self_check_error_is_returned_untouched() {
    let err = validate(&order(3, &["abc"])).unwrap_err();

    assert!(matches!(err, Error::Custom(_)));
    assert_eq!(err.to_string(), "balance must be even");
    assert_eq!(err.field_name(), None);
}

#[test]
fn test_rules_run_after_a_passing_self_check() {
    let err = validate(&order(2000, &["abc"])).unwrap_err();

    let Error::Validation(err) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(err.field, "balance");
    assert_eq!(err.type_name, "i64");
    assert_eq!(err.rule_text(), "lte=1000");
}

#[test]
fn test_owned_self_check_runs_before_rules() {
    // "x1" would also fail format=alpha; the hook is consulted first.
    let err = validate(&order(2, &["abc", "x1"])).unwrap_err();

    assert!(matches!(err, Error::Custom(_)));
    assert_eq!(err.to_string(), "ticket x1 is void");
}

#[test]
fn test_rule_failure_inside_sequence_of_hooked_values() {
    let err = validate(&order(2, &["abc", "a1"])).unwrap_err();

    assert_eq!(err.field_name(), Some("tickets"));
    assert!(err.is_validation());
    assert!(validate(&order(2, &["abc", "def"])).is_ok());
}

#[test]
fn test_root_self_check_runs() {
    // A root record with a failing hook fails even without expressions.
    let account = Account { balance: 1 };
    assert_eq!(
        validate(&account).unwrap_err().to_string(),
        "balance must be even"
    );
}

struct Inner {
    count: u8,
}

impl Inspect for Inner {
    fn inspect(&self) -> Value<'_> {
        Value::record([Field::new("count", "lte=3", &self.count)])
    }
}

struct Outer {
    inner: Option<Inner>,
}

impl Inspect for Outer {
    fn inspect(&self) -> Value<'_> {
        Value::record([Field::new("inner", "nil=false", &self.inner)])
    }
}

#[test]
fn test_innermost_record_names_the_field() {
    let outer = Outer {
        inner: Some(Inner { count: 9 }),
    };
    let err = validate(&outer).unwrap_err();
    assert_eq!(err.field_name(), Some("count"));

    let outer = Outer { inner: None };
    let err = validate(&outer).unwrap_err();
    assert_eq!(err.field_name(), Some("inner"));

    let outer = Outer {
        inner: Some(Inner { count: 1 }),
    };
    assert!(validate(&outer).is_ok());
}
