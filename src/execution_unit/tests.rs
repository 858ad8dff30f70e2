use {crate::execution_unit::ExecutionUnit, std::thread};

#[test]
fn eu() {
    assert_eq!(ExecutionUnit::current(), ExecutionUnit::current());
    assert!(ExecutionUnit::current().is_current());
    let other = thread::spawn(ExecutionUnit::current).join().unwrap();
    assert_ne!(ExecutionUnit::current(), other);
    assert!(!other.is_current());
}

#[test]
fn display() {
    let eu = ExecutionUnit::current();
    assert!(eu.to_string().starts_with("0x"));
    assert!(format!("{eu:?}").starts_with("ExecutionUnit(0x"));
}
