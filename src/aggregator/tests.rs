use crate::{
    SlotError,
    aggregator::{Aggregator, InstanceSlot, MAX_INSTANCES},
};

#[test]
fn slot_range() {
    assert_eq!(InstanceSlot::new(0), Err(SlotError::OutOfRange(0)));
    assert_eq!(InstanceSlot::new(1).unwrap().mask_bit(), 1);
    assert_eq!(
        InstanceSlot::new(MAX_INSTANCES).unwrap().mask_bit(),
        1 << (MAX_INSTANCES - 1),
    );
    assert_eq!(
        InstanceSlot::new(MAX_INSTANCES + 1),
        Err(SlotError::OutOfRange(MAX_INSTANCES + 1)),
    );
}

#[test]
fn allocate_lowest_free() {
    let agg = Aggregator::new();
    let a = agg.allocate_slot().unwrap();
    let b = agg.allocate_slot().unwrap();
    let c = agg.allocate_slot().unwrap();
    assert_eq!((a.get(), b.get(), c.get()), (1, 2, 3));
    agg.release_slot(b);
    assert_eq!(agg.allocate_slot().unwrap().get(), 2);
}

#[test]
fn exhausted() {
    let agg = Aggregator::new();
    for i in 1..=MAX_INSTANCES {
        assert_eq!(agg.allocate_slot().unwrap().get(), i);
    }
    assert_eq!(
        agg.allocate_slot(),
        Err(SlotError::Exhausted {
            capacity: MAX_INSTANCES
        }),
    );
}

#[test]
fn notify_and_take() {
    let agg = Aggregator::new();
    let a = InstanceSlot::new(1).unwrap();
    let b = InstanceSlot::new(5).unwrap();
    assert_eq!(agg.changed_mask(), 0);
    agg.notify(b);
    agg.notify(a);
    agg.notify(b);
    assert!(agg.is_changed(a));
    assert!(agg.is_changed(b));
    assert_eq!(agg.changed_mask(), 0b1_0001);
    assert_eq!(agg.take_changed(), 0b1_0001);
    assert_eq!(agg.changed_mask(), 0);
    assert_eq!(agg.take_changed(), 0);
}

#[test]
fn release_clears_changed() {
    let agg = Aggregator::new();
    let slot = agg.allocate_slot().unwrap();
    agg.notify(slot);
    agg.release_slot(slot);
    assert!(!agg.is_changed(slot));
}

#[test]
fn debug() {
    let agg = Aggregator::new();
    agg.notify(InstanceSlot::new(2).unwrap());
    assert!(format!("{agg:?}").contains("changed: 0x2"));
    let _guard = agg.state.lock();
    assert!(format!("{agg:?}").contains("<locked>"));
}
