use super::table::KeyTable;
use super::*;

fn contents<T: Clone>(deque: &IndexedDeque<T>) -> Vec<T> {
    deque.to_vec()
}

#[test]
fn indexed_deque_basic_operations() {
    let mut deque: IndexedDeque<u32> = IndexedDeque::bounded(4).unwrap();

    assert!(deque.is_empty());
    assert_eq!(deque.count(), 0);
    assert_eq!(deque.capacity().limit(), Some(4));

    deque.push_tail(1).unwrap();
    deque.push_tail(2).unwrap();
    deque.push_head(0).unwrap();

    assert_eq!(deque.count(), 3);
    assert_eq!(*deque.peek_head().unwrap(), 0);
    assert_eq!(*deque.peek_tail().unwrap(), 2);
    assert_eq!(*deque.at(0).unwrap(), 0);
    assert_eq!(*deque.at(1).unwrap(), 1);
    assert_eq!(*deque.at(2).unwrap(), 2);

    *deque.at_mut(1).unwrap() += 10;
    assert_eq!(deque[1], 11);

    assert_eq!(deque.pop_head(), Ok(0));
    assert_eq!(deque.pop_tail(), Ok(2));
    assert_eq!(deque.pop_head(), Ok(11));
    assert!(deque.is_empty());
}

#[test]
fn bounded_capacity_scenario() {
    let mut deque = IndexedDeque::bounded(3).unwrap();
    deque.push_head('A').unwrap();
    deque.push_tail('B').unwrap();
    deque.push_tail('C').unwrap();
    assert_eq!(deque.push_tail('D'), Err(DequeError::Full { capacity: 3 }));
    assert_eq!(contents(&deque), vec!['A', 'B', 'C']);

    assert_eq!(deque.pop_tail(), Ok('C'));
    deque.push_tail('D').unwrap();
    assert_eq!(contents(&deque), vec!['A', 'B', 'D']);
}

#[test]
fn full_push_leaves_deque_unchanged() {
    let mut deque = IndexedDeque::bounded(2).unwrap();
    deque.push_tail(1).unwrap();
    deque.push_head(0).unwrap();
    let keys: Vec<_> = (0..2).map(|i| deque.physical_key(i).unwrap()).collect();

    assert_eq!(deque.push_head(9), Err(DequeError::Full { capacity: 2 }));
    assert_eq!(deque.push_tail(9), Err(DequeError::Full { capacity: 2 }));
    assert_eq!(deque.try_push_tail(7), Err(7));
    assert_eq!(deque.try_push_head(8), Err(8));

    assert_eq!(contents(&deque), vec![0, 1]);
    let after: Vec<_> = (0..2).map(|i| deque.physical_key(i).unwrap()).collect();
    assert_eq!(keys, after);
    assert!(deque.is_full());
    assert_eq!(deque.remaining(), Some(0));
}

#[test]
fn empty_deque_failures() {
    let mut deque: IndexedDeque<i32> = IndexedDeque::unbounded();
    assert_eq!(deque.pop_head(), Err(DequeError::Empty));
    assert_eq!(deque.pop_tail(), Err(DequeError::Empty));
    assert_eq!(deque.peek_head(), Err(DequeError::Empty));
    assert_eq!(deque.peek_tail(), Err(DequeError::Empty));
    assert_eq!(deque.at(0), Err(DequeError::OutOfBounds { index: 0, count: 0 }));
    assert!(!deque.is_full());
    assert_eq!(deque.remaining(), None);
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(matches!(
        IndexedDeque::<u8>::bounded(0),
        Err(DequeError::ZeroCapacity)
    ));
}

#[test]
fn unbounded_key_arithmetic() {
    let mut deque = IndexedDeque::unbounded();
    deque.push_tail("b").unwrap();
    let head = deque.physical_key(0).unwrap();

    deque.push_head("a").unwrap();
    deque.push_tail("c").unwrap();

    assert_eq!(deque.physical_key(0), Ok(head + 1));
    assert_eq!(deque.physical_key(1), Ok(head));
    assert_eq!(deque.physical_key(2), Ok(head - 1));
}

#[test]
fn bounded_keys_wrap_modulo_capacity() {
    let mut deque = IndexedDeque::bounded(3).unwrap();
    for round in 0..10 {
        deque.push_head(round).unwrap();
        deque.push_head(round + 100).unwrap();
        assert_eq!(deque.pop_tail(), Ok(round));
        assert_eq!(deque.pop_tail(), Ok(round + 100));
    }
    deque.push_tail(1).unwrap();
    deque.push_tail(2).unwrap();
    deque.push_tail(3).unwrap();
    for i in 0..3 {
        let key = deque.physical_key(i).unwrap();
        assert!((0..3).contains(&key), "key {key} escaped the slot range");
    }
    assert_eq!(contents(&deque), vec![1, 2, 3]);
}

#[test]
fn popped_entries_are_deleted() {
    let mut deque = IndexedDeque::unbounded();
    for i in 0..10 {
        deque.push_tail(i).unwrap();
    }
    for _ in 0..4 {
        deque.pop_head().unwrap();
        deque.pop_tail().unwrap();
    }
    assert_eq!(deque.table.len(), 2);
    assert_eq!(deque.count(), 2);
}

#[test]
fn push_tail_into_emptied_deque_resets_head() {
    let mut deque = IndexedDeque::bounded(2).unwrap();
    deque.push_head(1).unwrap();
    deque.push_head(2).unwrap();
    deque.pop_head().unwrap();
    deque.pop_head().unwrap();

    deque.push_tail(5).unwrap();
    assert_eq!(deque.peek_head(), Ok(&5));
    assert_eq!(deque.peek_tail(), Ok(&5));
    assert_eq!(deque.physical_key(0).unwrap(), deque.head_key);
}

#[test]
fn replace_at_touches_only_its_index() {
    let mut deque: IndexedDeque<i32> = (0..5).collect();
    assert_eq!(deque.replace_at(2, 42), Ok(2));
    assert_eq!(contents(&deque), vec![0, 1, 42, 3, 4]);
    assert_eq!(
        deque.replace_at(5, 0),
        Err(DequeError::OutOfBounds { index: 5, count: 5 })
    );
}

#[test]
fn remove_at_only_at_the_ends() {
    let mut deque: IndexedDeque<i32> = (0..4).collect();
    assert_eq!(
        deque.remove_at(1),
        Err(DequeError::UnsupportedRemoval { index: 1, count: 4 })
    );
    assert_eq!(
        deque.remove_at(4),
        Err(DequeError::OutOfBounds { index: 4, count: 4 })
    );
    assert_eq!(deque.remove_at(3), Ok(3));
    assert_eq!(deque.remove_at(0), Ok(0));
    assert_eq!(contents(&deque), vec![1, 2]);

    let mut single: IndexedDeque<i32> = std::iter::once(9).collect();
    assert_eq!(single.remove_at(0), Ok(9));
    assert!(single.is_empty());
}

#[test]
fn drain_takes_from_head_and_clears_on_drop() {
    let mut deque: IndexedDeque<i32> = (1..=5).collect();
    {
        let mut drain = deque.drain();
        assert_eq!(drain.len(), 5);
        assert_eq!(drain.next(), Some(1));
        assert_eq!(drain.next_back(), Some(5));
    }
    assert!(deque.is_empty());
    assert_eq!(deque.table.len(), 0);

    deque.extend([7, 8]);
    assert_eq!(deque.drain().collect::<Vec<_>>(), vec![7, 8]);
}

#[test]
fn iterators_walk_head_to_tail() {
    let mut deque = IndexedDeque::unbounded();
    deque.push_head(2).unwrap();
    deque.push_head(1).unwrap();
    deque.push_tail(3).unwrap();

    assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(deque.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    assert_eq!(deque.iter().nth(1), Some(&2));
    assert_eq!((&deque).into_iter().len(), 3);
    assert_eq!(deque.into_iter().rev().collect::<Vec<_>>(), vec![3, 2, 1]);
}

#[test]
fn equality_ignores_physical_keys() {
    let mut a = IndexedDeque::unbounded();
    a.push_tail(1).unwrap();
    a.push_tail(2).unwrap();

    let mut b = IndexedDeque::unbounded();
    b.push_head(2).unwrap();
    b.push_head(1).unwrap();
    b.push_head(0).unwrap();
    b.pop_head().unwrap();

    assert_ne!(a.physical_key(0), b.physical_key(0));
    assert_eq!(a, b);

    let c: IndexedDeque<i32> = IndexedDeque::bounded(2).unwrap();
    assert_ne!(c, IndexedDeque::unbounded());
    assert_eq!(format!("{a:?}"), "[1, 2]");
}

#[test]
#[should_panic(expected = "index 3 out of bounds")]
fn index_panics_out_of_bounds() {
    let deque: IndexedDeque<i32> = (0..3).collect();
    let _value = deque[3];
}

#[test]
#[should_panic(expected = "deque is full")]
fn extend_panics_when_bounded_deque_fills() {
    let mut deque = IndexedDeque::bounded(2).unwrap();
    deque.extend(0..3);
}

#[test]
fn clear_releases_items() {
    use std::rc::Rc;

    let marker = Rc::new(());
    let mut deque = IndexedDeque::bounded(4).unwrap();
    for _ in 0..4 {
        deque.push_tail(Rc::clone(&marker)).unwrap();
    }
    assert_eq!(Rc::strong_count(&marker), 5);
    deque.clear();
    assert_eq!(Rc::strong_count(&marker), 1);
    deque.push_tail(Rc::clone(&marker)).unwrap();
    drop(deque);
    assert_eq!(Rc::strong_count(&marker), 1);
}

#[test]
fn serde_round_trip_preserves_order_and_capacity() {
    let mut deque = IndexedDeque::bounded(4).unwrap();
    deque.push_head(2).unwrap();
    deque.push_head(1).unwrap();
    deque.push_tail(3).unwrap();

    let json = serde_json::to_string(&deque).unwrap();
    assert_eq!(json, r#"{"capacity":{"bounded":4},"items":[1,2,3]}"#);

    let back: IndexedDeque<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, deque);
}

#[test]
fn serde_rejects_overfull_input() {
    let err = serde_json::from_str::<IndexedDeque<i32>>(
        r#"{"capacity":{"bounded":2},"items":[1,2,3]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("deque is full"));
}

#[test]
fn huge_bounded_capacity_allocates_lazily() {
    let mut deque = IndexedDeque::bounded(usize::MAX).unwrap();
    assert_eq!(deque.remaining(), Some(usize::MAX));

    deque.push_tail('b').unwrap();
    deque.push_head('a').unwrap();
    // The tail wraps below key 0, to the top of the ring.
    deque.push_tail('c').unwrap();
    assert_eq!(contents(&deque), vec!['a', 'b', 'c']);
    assert_eq!(deque.physical_key(0), Ok(1));
    assert_eq!(deque.physical_key(1), Ok(0));
    assert_eq!(deque.physical_key(2), Ok(ring_key(usize::MAX - 1)));

    assert_eq!(deque.pop_head(), Ok('a'));
    assert_eq!(deque.pop_head(), Ok('b'));
    assert_eq!(deque.pop_head(), Ok('c'));
    assert!(deque.is_empty());
    assert_eq!(deque.table.len(), 0);
}

#[test]
fn capacity_past_i64_max_wraps_at_capacity() {
    let capacity = usize::try_from(i64::MAX).unwrap() + 2;
    let mut deque = IndexedDeque::bounded(capacity).unwrap();
    deque.push_tail(0).unwrap();
    deque.push_tail(1).unwrap();

    let tail = ring_slot(deque.physical_key(1).unwrap());
    assert_eq!(tail, capacity - 1);
    assert_eq!(deque.pop_tail(), Ok(1));
    assert_eq!(deque.pop_tail(), Ok(0));
}

#[test]
fn serde_round_trips_huge_bounded_capacity() {
    let json = format!(r#"{{"capacity":{{"bounded":{}}},"items":[]}}"#, usize::MAX);
    let mut deque: IndexedDeque<u8> = serde_json::from_str(&json).unwrap();
    assert_eq!(deque.capacity().limit(), Some(usize::MAX));

    deque.push_head(7).unwrap();
    deque.push_tail(8).unwrap();
    let back: IndexedDeque<u8> =
        serde_json::from_str(&serde_json::to_string(&deque).unwrap()).unwrap();
    assert_eq!(back, deque);
    assert_eq!(contents(&back), vec![7, 8]);
}
