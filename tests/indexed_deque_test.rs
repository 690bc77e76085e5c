use keyed_deque::{Capacity, DequeError, IndexedDeque};

#[test]
fn test_capacity_three_scenario() -> anyhow::Result<()> {
    let mut deque = IndexedDeque::new(Capacity::new(Some(3))?);
    deque.push_head("A")?;
    deque.push_tail("B")?;
    deque.push_tail("C")?;

    let err = deque.push_tail("D").unwrap_err();
    assert_eq!(err, DequeError::Full { capacity: 3 });
    assert_eq!(err.to_string(), "deque is full (capacity 3)");

    assert_eq!(deque.pop_tail()?, "C");
    deque.push_tail("D")?;
    assert_eq!(deque.to_vec(), vec!["A", "B", "D"]);
    Ok(())
}

#[test]
fn test_errors_compose_with_question_mark() {
    fn take_two(deque: &mut IndexedDeque<u8>) -> anyhow::Result<(u8, u8)> {
        Ok((deque.pop_head()?, deque.pop_tail()?))
    }

    let mut deque: IndexedDeque<u8> = [1, 2, 3].into_iter().collect();
    assert_eq!(take_two(&mut deque).unwrap(), (1, 3));

    let err = take_two(&mut deque).unwrap_err();
    assert_eq!(err.downcast_ref::<DequeError>(), Some(&DequeError::Empty));
}

#[test]
fn test_long_lived_unbounded_deque_drifts_keys() -> anyhow::Result<()> {
    let mut deque = IndexedDeque::unbounded();
    // Walk the head far away from where it started.
    for i in 0..10_000 {
        deque.push_head(i)?;
        if i % 2 == 1 {
            deque.pop_tail()?;
        }
    }
    assert_eq!(deque.count(), 5_000);
    assert_eq!(*deque.peek_head()?, 9_999);
    assert_eq!(*deque.peek_tail()?, 5_000);
    assert_eq!(deque.physical_key(0)? - deque.physical_key(4_999)?, 4_999);
    Ok(())
}

#[test]
fn test_bounded_ring_reuses_keys_indefinitely() -> anyhow::Result<()> {
    let mut deque = IndexedDeque::bounded(4)?;
    deque.extend([0, 1, 2, 3]);
    for next in 4..1_000 {
        assert_eq!(deque.pop_head()?, next - 4);
        deque.push_tail(next)?;
        for i in 0..4 {
            assert!((0..4).contains(&deque.physical_key(i)?));
        }
    }
    assert_eq!(deque.to_vec(), vec![996, 997, 998, 999]);
    Ok(())
}

#[test]
fn test_drain_collects_everything_in_order() {
    let mut deque = IndexedDeque::unbounded();
    deque.push_head(2).unwrap();
    deque.push_head(1).unwrap();
    deque.push_tail(3).unwrap();

    let taken: Vec<_> = deque.drain().collect();
    assert_eq!(taken, vec![1, 2, 3]);
    assert!(deque.is_empty());
    assert_eq!(deque.pop_head(), Err(DequeError::Empty));
}

#[test]
fn test_index_operators() {
    let mut deque: IndexedDeque<String> = ["x", "y"].into_iter().map(String::from).collect();
    deque[1].push('!');
    assert_eq!(deque[0], "x");
    assert_eq!(deque[1], "y!");
}

#[test]
fn test_serialized_form_is_key_free() -> anyhow::Result<()> {
    let mut deque = IndexedDeque::unbounded();
    for i in 0..3 {
        deque.push_head(i)?;
    }
    let value = serde_json::to_value(&deque)?;
    assert_eq!(
        value,
        serde_json::json!({ "capacity": "unbounded", "items": [2, 1, 0] })
    );

    let restored: IndexedDeque<i32> = serde_json::from_value(value)?;
    assert_eq!(restored, deque);
    Ok(())
}

#[test]
fn test_any_positive_capacity_is_accepted() -> anyhow::Result<()> {
    let mut deque = IndexedDeque::<u8>::bounded(usize::MAX)?;
    deque.push_tail(1)?;
    deque.push_tail(2)?;
    assert_eq!(deque.remaining(), Some(usize::MAX - 2));

    let restored: IndexedDeque<u8> = serde_json::from_str(&serde_json::to_string(&deque)?)?;
    assert_eq!(restored.to_vec(), vec![1, 2]);

    let empty: IndexedDeque<u8> =
        serde_json::from_str(r#"{"capacity":{"bounded":18446744073709551615},"items":[]}"#)?;
    assert!(empty.is_empty());
    Ok(())
}
