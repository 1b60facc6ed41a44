use std::cell::RefCell as StdRefCell;
use std::rc::Rc;
use velox_core::signal::effect;
use velox_core::{Observed, Value};

fn counter(n: i32) -> Observed {
    Observed::new(Value::from(vec![("count", Value::from(n))]))
}

#[test]
fn test_observed_and_effect() {
    let count = counter(0);
    // Mirror must be Rc<RefCell> to mutate inside the closure
    let mirror = Rc::new(StdRefCell::new(Value::Null));

    {
        let count = count.clone();
        let mirror = mirror.clone();
        effect(move || {
            *mirror.borrow_mut() = count.get("count");
        });
    }

    // Initial effect run should have written 0
    assert_eq!(*mirror.borrow(), Value::from(0));

    // This set should notify the effect again
    count.set("count", 42);
    assert_eq!(*mirror.borrow(), Value::from(42));
}

#[test]
fn nested_effects_track_independently() {
    let outer = counter(0);
    let inner = counter(0);
    let outer_runs = Rc::new(StdRefCell::new(0));

    {
        let outer = outer.clone();
        let inner = inner.clone();
        let outer_runs = outer_runs.clone();
        effect(move || {
            *outer_runs.borrow_mut() += 1;
            let inner = inner.clone();
            effect(move || {
                inner.get("count");
            });
            // Read after the nested effect finished: must still count for the outer one.
            outer.get("count");
        });
    }

    assert_eq!(*outer_runs.borrow(), 1);
    outer.set("count", 1);
    assert_eq!(*outer_runs.borrow(), 2);
}

#[test]
fn observed_property_writes_notify() {
    let state = counter(0);
    let seen = Rc::new(StdRefCell::new(Vec::new()));
    {
        let state = state.clone();
        let seen = seen.clone();
        effect(move || {
            seen.borrow_mut().push(state.get("count"));
        });
    }
    state.set("count", 5);
    assert_eq!(&*seen.borrow(), &vec![Value::from(0), Value::from(5)]);
}

#[test]
fn array_pushes_notify() {
    let list = Observed::new(Vec::<Value>::new());
    let lengths = Rc::new(StdRefCell::new(Vec::new()));
    {
        let list = list.clone();
        let lengths = lengths.clone();
        effect(move || {
            let len = list.with(|v| match v {
                Value::Array(items) => items.len(),
                _ => 0,
            });
            lengths.borrow_mut().push(len);
        });
    }
    list.push("a");
    list.push(2);
    assert_eq!(&*lengths.borrow(), &vec![0, 1, 2]);
}
